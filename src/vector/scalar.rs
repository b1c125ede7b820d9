//! Literal values carried by `Expr::Literal` and produced by scalar aggregates.

use std::cmp::Ordering;

/// A single typed, possibly-null value outside of any vector.
///
/// This is intentionally a small closed set rather than one variant per
/// `Vector` type: integer and floating literals widen to `Int64`/`Float64`
/// and kernels narrow back to the vector's native width at comparison time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Scalar {
    /// SQL NULL
    Null,
    /// Boolean literal
    Bool(bool),
    /// Any integer literal (narrowed to the column's width at compare time)
    Int64(i64),
    /// Any floating-point literal
    Float64(f64),
    /// String/binary literal (UTF-8 not validated, matching `Vector::String`)
    Bytes(Vec<u8>),
}

impl Scalar {
    /// True if this scalar is SQL NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Best-effort widen to `f64`, used by numeric comparison kernels.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int64(v) => Some(*v as f64),
            Scalar::Float64(v) => Some(*v),
            Scalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Best-effort narrow to `i64`, used by integer comparison kernels.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int64(v) => Some(*v),
            Scalar::Float64(v) if v.fract() == 0.0 => Some(*v as i64),
            Scalar::Bool(b) => Some(if *b { 1 } else { 0 }),
            _ => None,
        }
    }

    /// Best-effort view as raw bytes, used by `String`/`Binary` comparisons.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Scalar::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Best-effort view as bool.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Int64(v) => Some(*v != 0),
            _ => None,
        }
    }
}

/// Total order over scalars for `ORDER BY` key comparison: NULL sorts
/// separately (see `operator::order_by` for NULLS FIRST/LAST placement),
/// everything else compares by numeric/byte value.
pub fn compare_scalars(a: &Scalar, b: &Scalar) -> Option<Ordering> {
    match (a, b) {
        (Scalar::Null, Scalar::Null) => Some(Ordering::Equal),
        (Scalar::Null, _) | (_, Scalar::Null) => None,
        (Scalar::Bytes(x), Scalar::Bytes(y)) => Some(x.cmp(y)),
        (Scalar::Bool(x), Scalar::Bool(y)) => Some(x.cmp(y)),
        _ => a.as_f64().and_then(|x| b.as_f64().map(|y| x.partial_cmp(&y))).flatten(),
    }
}
