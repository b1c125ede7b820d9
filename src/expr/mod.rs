//! C3: the expression AST. `Expr` trees are built once per query and
//! compiled by `evaluator` into closures cached across calls.

pub mod evaluator;

use std::hash::{Hash, Hasher};

use crate::vector::Scalar;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    IsNull,
    IsNotNull,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    And,
    Or,
    Xor,
}

/// A predicate/projection expression tree over a single `Morsel`.
///
/// Structural equality and `Hash` are derived rather than computed from a
/// string representation, matching the canonical-repr hashing the
/// evaluator's pattern cache otherwise needs but without the string
/// allocation on every lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Scalar),
    Column(String),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(name.into())
    }

    pub fn lit(scalar: Scalar) -> Self {
        Expr::Literal(scalar)
    }

    pub fn eq(self, other: Expr) -> Self {
        Expr::Binary(BinaryOp::Eq, Box::new(self), Box::new(other))
    }

    pub fn gt_eq(self, other: Expr) -> Self {
        Expr::Binary(BinaryOp::GtEq, Box::new(self), Box::new(other))
    }

    pub fn and(self, other: Expr) -> Self {
        Expr::Binary(BinaryOp::And, Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Expr) -> Self {
        Expr::Binary(BinaryOp::Or, Box::new(self), Box::new(other))
    }

    pub fn not(self) -> Self {
        Expr::Unary(UnaryOp::Not, Box::new(self))
    }

    pub fn is_null(self) -> Self {
        Expr::Unary(UnaryOp::IsNull, Box::new(self))
    }

    /// True if this expression is a top-level conjunction of disjunctions
    /// (or any shape that reduces to one), the shape the evaluator's DNF
    /// fast path recognizes.
    pub fn is_dnf_shape(&self) -> bool {
        fn is_or_chain(e: &Expr) -> bool {
            match e {
                Expr::Binary(BinaryOp::Or, l, r) => is_or_chain(l) && is_or_chain(r),
                Expr::Binary(BinaryOp::And, ..) => false,
                _ => true,
            }
        }
        match self {
            Expr::Binary(BinaryOp::And, l, r) => l.is_dnf_shape() && r.is_dnf_shape(),
            other => is_or_chain(other),
        }
    }
}

/// Scalar-literal `f64`/`f32` fields break `Eq`/`Hash` derivation on
/// `Scalar` directly (`NaN != NaN`); expressions hash by bit pattern
/// instead, which only needs to be internally consistent for cache lookups,
/// not to agree with numeric equality.
impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Expr::Literal(s) => {
                0u8.hash(state);
                match s {
                    Scalar::Null => 0u8.hash(state),
                    Scalar::Bool(b) => b.hash(state),
                    Scalar::Int64(v) => v.hash(state),
                    Scalar::Float64(v) => v.to_bits().hash(state),
                    Scalar::Bytes(b) => b.hash(state),
                }
            }
            Expr::Column(name) => {
                1u8.hash(state);
                name.hash(state);
            }
            Expr::Unary(op, e) => {
                2u8.hash(state);
                op.hash(state);
                e.hash(state);
            }
            Expr::Binary(op, l, r) => {
                3u8.hash(state);
                op.hash(state);
                l.hash(state);
                r.hash(state);
            }
        }
    }
}

impl Eq for Expr {}
