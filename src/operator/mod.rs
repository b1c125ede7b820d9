//! C4: the pull-based physical operator pipeline (spec §4.4/§5).
//!
//! Operators are single-threaded and cooperative: `execute` pulls one
//! morsel at a time from its upstream producer(s) and returns one morsel
//! (or `None` at end-of-stream) — there is no operator-spawned thread or
//! async runtime inside this module. Parallelism is the host's concern:
//! run independent `Operator` trees on separate OS threads if you want
//! pipeline-level parallelism.

pub mod aggregate;
pub mod cross_join;
pub mod distinct;
pub mod explain;
pub mod hash_join;
pub mod limit_offset;
pub mod nonequi_join;
pub mod order_by;
pub mod projection;
pub mod selection;
pub mod show_columns;
pub mod unnest;

use crate::error::Result;
use crate::morsel::Morsel;

/// A pull-based physical operator: call `next()` until it returns `None`
/// (end-of-stream, `EOS`).
pub trait Operator: std::fmt::Debug {
    /// Pull the next morsel, or `None` at end-of-stream.
    fn next(&mut self) -> Result<Option<Morsel>>;

    /// Operator name as it should appear in `EXPLAIN` output.
    fn name(&self) -> &'static str;

    /// A short, single-line description of this operator's configuration
    /// (e.g. the predicate text, the join keys) for `EXPLAIN`.
    fn config(&self) -> String {
        String::new()
    }
}

/// Sentinel returned by `Operator::next` at end-of-stream; kept as a named
/// constant purely for readability at call sites (`Ok(None)` already means
/// this, the type carries no information).
pub const EOS: Option<Morsel> = None;

/// Drain an operator to completion, collecting every morsel it produces.
/// Mainly useful in tests and `EXPLAIN ANALYZE`-style tooling.
pub fn collect(op: &mut dyn Operator) -> Result<Vec<Morsel>> {
    let mut out = Vec::new();
    while let Some(m) = op.next()? {
        out.push(m);
    }
    Ok(out)
}

/// Drain an operator and concatenate every morsel it produces into one.
/// The shared blocking-materialize step every blocking operator (hash join
/// build side, cross/non-equi join's right side, order-by's whole input)
/// needs before it can do its real work.
pub(crate) fn materialize_all(op: &mut dyn Operator) -> Result<Morsel> {
    let mut rows = Vec::new();
    while let Some(m) = op.next()? {
        rows.push(m);
    }
    let names = rows.first().map(|m| m.column_names().to_vec()).unwrap_or_default();
    Ok(rows
        .into_iter()
        .reduce(|acc, m| {
            let cols = acc.columns().iter().zip(m.columns()).map(|(a, b)| a.concat(b)).collect();
            Morsel::new(names.clone(), cols).unwrap()
        })
        .unwrap_or_else(|| Morsel::new(Vec::new(), Vec::new()).unwrap()))
}

/// A leaf producer that replays a fixed list of morsels, for wiring
/// pipelines in tests and for hosts that already have materialized morsels.
#[derive(Debug)]
pub struct MorselSource {
    morsels: std::vec::IntoIter<Morsel>,
}

impl MorselSource {
    pub fn new(morsels: Vec<Morsel>) -> Self {
        Self {
            morsels: morsels.into_iter(),
        }
    }
}

impl Operator for MorselSource {
    fn next(&mut self) -> Result<Option<Morsel>> {
        Ok(self.morsels.next())
    }

    fn name(&self) -> &'static str {
        "MorselSource"
    }
}
