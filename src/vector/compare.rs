//! Comparison operators shared by every vector kernel.

/// Closed set of binary comparison operators (spec §3.3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
}

impl CompareOp {
    /// Apply the operator to a pre-computed `Ordering`, honoring `Equal` as
    /// a distinct outcome rather than chaining `Less`/`Greater`.
    #[inline]
    pub fn apply_ordering(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match (self, ord) {
            (CompareOp::Equals, Equal) => true,
            (CompareOp::NotEquals, Equal) => false,
            (CompareOp::NotEquals, _) => true,
            (CompareOp::GreaterThan, Greater) => true,
            (CompareOp::GreaterThanOrEquals, Greater | Equal) => true,
            (CompareOp::LessThan, Less) => true,
            (CompareOp::LessThanOrEquals, Less | Equal) => true,
            _ => false,
        }
    }

    /// Apply directly to two `PartialOrd` values. This is what gives us the
    /// IEEE-754 floating point semantics spec §4.1 asks for "for free": Rust's
    /// `f64`/`f32` `PartialOrd`/`PartialEq` already treat `NaN` as unordered
    /// (so every comparison against `NaN` is `false`, including `Equals`) and
    /// already treats `+0.0 == -0.0`, matching the spec's null/NaN policy
    /// without any special-casing here.
    #[inline]
    pub fn apply<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            CompareOp::Equals => a == b,
            CompareOp::NotEquals => a != b,
            CompareOp::GreaterThan => a > b,
            CompareOp::GreaterThanOrEquals => a >= b,
            CompareOp::LessThan => a < b,
            CompareOp::LessThanOrEquals => a <= b,
        }
    }
}
