//! # morsel-exec: a columnar, vectorized SQL execution runtime
//!
//! This crate implements the data-plane of a SQL engine: typed columnar
//! vectors, row-batch morsels, a compiled predicate evaluator, and a
//! pull-based physical operator pipeline. It does not parse SQL, plan
//! queries, or decode file formats — it is the layer a planner hands
//! physical operators to, and the only external collaborator it knows
//! about is Apache Arrow, used purely as a zero-copy interchange format at
//! the pipeline's edges.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Muda elimination**: the compiled-expression cache avoids recompiling
//!   the same predicate shape on every morsel
//! - **Poka-Yoke safety**: builders (`vector::builder`) reject writes after
//!   `finish()`; morsels reject mismatched column lengths at construction
//! - **Genchi Genbutsu**: comparison semantics defer to Rust's own
//!   `PartialOrd`/`PartialEq` for floats rather than reimplementing
//!   IEEE-754 edge cases by hand
//! - **Jidoka**: every kernel is covered by both example-based and
//!   property-based tests, so a broken invariant fails loudly at the
//!   kernel, not three operators downstream
//!
//! ## Example
//!
//! ```rust
//! use morsel_exec::expr::Expr;
//! use morsel_exec::morsel::Morsel;
//! use morsel_exec::operator::{selection::Selection, MorselSource, Operator};
//! use morsel_exec::vector::primitive::PrimitiveVector;
//! use morsel_exec::vector::{Scalar, Vector};
//!
//! # fn main() -> morsel_exec::Result<()> {
//! let morsel = Morsel::new(
//!     vec!["id".into()],
//!     vec![Vector::Int32(PrimitiveVector::from_values(vec![1, 2, 3]))],
//! )?;
//! let mut pipeline = Selection::new(
//!     Box::new(MorselSource::new(vec![morsel])),
//!     Expr::column("id").eq(Expr::lit(Scalar::Int64(2))),
//! );
//! let result = pipeline.next()?.unwrap();
//! assert_eq!(result.num_rows(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod agg;
pub mod bitmap;
pub mod error;
pub mod expr;
pub mod join;
pub mod morsel;
pub mod operator;
pub mod topk;
pub mod vector;

pub use error::{Error, Result};
