//! Fixed-width primitive vectors: `Int8..64`, `UInt8..64`, `Float32/64`, and
//! the day/microsecond-count primitives that `Date32`/`Time32`/`Time64`
//! reuse directly.

use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::vector::compare::CompareOp;
use crate::vector::hash::{hash_bytes, mix, NULL_HASH};
use crate::vector::scalar::Scalar;
use crate::vector::BoolMask;

/// Types usable as the backing store of a `PrimitiveVector`.
///
/// `PartialOrd` is all comparison kernels need (spec §4.1's IEEE-754 note
/// falls out of `f32`/`f64`'s own `PartialOrd` impl, not special-casing
/// here).
pub trait Numeric: Copy + PartialOrd + Default + Send + Sync + std::fmt::Debug + 'static {
    /// Widen to `f64` for cross-type and floating comparisons.
    fn to_f64(self) -> f64;
    /// Narrow a literal scalar to this type, when it represents this domain exactly.
    fn from_scalar(s: &Scalar) -> Option<Self>;
    /// Canonical little-endian byte representation for hashing.
    fn canonical_bytes(self) -> [u8; 8];
    /// Checked add used for overflow-safe integer `sum` fallback.
    fn checked_widen_add(acc: i128, self_: Self) -> i128;
    fn zero() -> Self;
}

macro_rules! impl_numeric_int {
    ($t:ty, $as_i64:path) => {
        impl Numeric for $t {
            fn to_f64(self) -> f64 {
                self as f64
            }
            fn from_scalar(s: &Scalar) -> Option<Self> {
                s.as_i64().and_then(|v| <$t>::try_from(v).ok())
            }
            fn canonical_bytes(self) -> [u8; 8] {
                (self as i64).to_le_bytes()
            }
            fn checked_widen_add(acc: i128, self_: Self) -> i128 {
                acc + self_ as i128
            }
            fn zero() -> Self {
                0
            }
        }
    };
}

impl_numeric_int!(i8, i64);
impl_numeric_int!(i16, i64);
impl_numeric_int!(i32, i64);
impl_numeric_int!(i64, i64);
impl_numeric_int!(u8, i64);
impl_numeric_int!(u16, i64);
impl_numeric_int!(u32, i64);
impl_numeric_int!(u64, i64);

impl Numeric for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_scalar(s: &Scalar) -> Option<Self> {
        s.as_f64().map(|v| v as f32)
    }
    fn canonical_bytes(self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.to_bits().to_le_bytes());
        out
    }
    fn checked_widen_add(acc: i128, self_: Self) -> i128 {
        acc + (self_ as f64 * 1_000_000.0) as i128
    }
    fn zero() -> Self {
        0.0
    }
}

impl Numeric for f64 {
    fn to_f64(self) -> f64 {
        self
    }
    fn from_scalar(s: &Scalar) -> Option<Self> {
        s.as_f64()
    }
    fn canonical_bytes(self) -> [u8; 8] {
        self.to_bits().to_le_bytes()
    }
    fn checked_widen_add(acc: i128, self_: Self) -> i128 {
        acc + (self_ * 1_000_000.0) as i128
    }
    fn zero() -> Self {
        0.0
    }
}

/// A fixed-width column of `T` with an optional validity bitmap.
#[derive(Clone, Debug)]
pub struct PrimitiveVector<T: Numeric> {
    pub data: Arc<[T]>,
    pub validity: Option<Bitmap>,
    pub null_count: u32,
}

impl<T: Numeric> PrimitiveVector<T> {
    /// Build from raw data with no nulls.
    pub fn from_values(values: Vec<T>) -> Self {
        Self {
            data: Arc::from(values.into_boxed_slice()),
            validity: None,
            null_count: 0,
        }
    }

    /// Build from `(value, is_valid)` pairs.
    pub fn from_options(values: impl IntoIterator<Item = Option<T>>) -> Self {
        let mut data = Vec::new();
        let mut valid = Vec::new();
        let mut null_count = 0u32;
        for v in values {
            match v {
                Some(x) => {
                    data.push(x);
                    valid.push(true);
                }
                None => {
                    data.push(T::default());
                    valid.push(false);
                    null_count += 1;
                }
            }
        }
        let validity = (null_count > 0).then(|| Bitmap::from_bools(valid.into_iter()));
        Self {
            data: Arc::from(data.into_boxed_slice()),
            validity,
            null_count,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_valid(&self, i: usize) -> bool {
        self.validity.as_ref().map_or(true, |v| v.get(i))
    }

    pub fn is_null(&self, i: usize) -> BoolMask {
        BoolMask::from_bools([!self.is_valid(i)])
    }

    pub fn is_null_mask(&self) -> BoolMask {
        BoolMask::from_bools((0..self.len()).map(|i| !self.is_valid(i)))
    }

    pub fn slice(&self, offset: usize, length: usize) -> Self {
        let length = length.min(self.len().saturating_sub(offset));
        let data: Arc<[T]> = Arc::from(&self.data[offset..offset + length]);
        let validity = self.validity.as_ref().map(|v| v.slice(offset, length));
        let null_count = validity.as_ref().map_or(0, Bitmap::null_count) as u32;
        Self {
            data,
            validity,
            null_count,
        }
    }

    pub fn take(&self, indices: &[i32]) -> Self {
        let mut out = Vec::with_capacity(indices.len());
        let mut valid = Vec::with_capacity(indices.len());
        for &idx in indices {
            if idx < 0 || idx as usize >= self.len() {
                out.push(T::default());
                valid.push(false);
            } else {
                let i = idx as usize;
                out.push(self.data[i]);
                valid.push(self.is_valid(i));
            }
        }
        let null_count = valid.iter().filter(|v| !**v).count() as u32;
        let validity = (null_count > 0).then(|| Bitmap::from_bools(valid.into_iter()));
        Self {
            data: Arc::from(out.into_boxed_slice()),
            validity,
            null_count,
        }
    }

    pub fn hash_into(&self, out: &mut [u64], offset: usize) {
        for i in 0..self.len() {
            let h = if self.is_valid(i) {
                hash_bytes(&self.data[i].canonical_bytes())
            } else {
                NULL_HASH
            };
            out[offset + i] = mix(out[offset + i], h);
        }
    }

    pub fn cmp_scalar(&self, scalar: &Scalar, op: CompareOp) -> Result<BoolMask> {
        if scalar.is_null() {
            return Ok(BoolMask::new_false(self.len()));
        }
        let rhs = T::from_scalar(scalar);
        let bytes = (0..self.len())
            .map(|i| {
                self.is_valid(i)
                    && rhs.map_or(false, |r| op.apply(self.data[i].to_f64(), r.to_f64()))
            })
            .collect::<Vec<_>>();
        Ok(BoolMask::from_bools(bytes))
    }

    pub fn cmp_vector(&self, other: &Self, op: CompareOp) -> Result<BoolMask> {
        if self.len() != other.len() {
            return Err(Error::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        let bytes = (0..self.len())
            .map(|i| {
                self.is_valid(i)
                    && other.is_valid(i)
                    && op.apply(self.data[i].to_f64(), other.data[i].to_f64())
            })
            .collect::<Vec<_>>();
        Ok(BoolMask::from_bools(bytes))
    }

    /// `sum(vec)`: nulls ignored, empty/all-null sums to the additive
    /// identity. Accumulates in `i128` (integers) to avoid overflow at the
    /// spec's test sizes, per spec §4.1/§9.
    pub fn sum(&self) -> Result<Scalar> {
        let mut acc: i128 = 0;
        for i in 0..self.len() {
            if self.is_valid(i) {
                acc = T::checked_widen_add(acc, self.data[i]);
            }
        }
        if i64::try_from(acc).is_err() {
            return Err(Error::CapacityExceeded(format!(
                "sum {acc} does not fit in the widened accumulator"
            )));
        }
        Ok(Scalar::Int64(acc as i64))
    }

    /// Float-specific sum (kept exact rather than routed through the
    /// integer-widening accumulator above).
    pub fn sum_f64(&self) -> f64 {
        (0..self.len())
            .filter(|&i| self.is_valid(i))
            .map(|i| self.data[i].to_f64())
            .sum()
    }

    /// `min(vec)`: known quirk carried from the source system (§9) — null
    /// cells are treated as zero rather than skipped. Fails on empty input.
    pub fn min_quirky(&self) -> Result<T> {
        if self.is_empty() {
            return Err(Error::EmptyVector);
        }
        let mut best = if self.is_valid(0) { self.data[0] } else { T::zero() };
        for i in 1..self.len() {
            let v = if self.is_valid(i) { self.data[i] } else { T::zero() };
            if v.to_f64() < best.to_f64() {
                best = v;
            }
        }
        Ok(best)
    }

    /// `max(vec)`: nulls skipped. Fails on empty input.
    pub fn max_skip_nulls(&self) -> Result<Option<T>> {
        if self.is_empty() {
            return Err(Error::EmptyVector);
        }
        let mut best: Option<T> = None;
        for i in 0..self.len() {
            if self.is_valid(i) {
                best = Some(match best {
                    Some(b) if b.to_f64() >= self.data[i].to_f64() => b,
                    _ => self.data[i],
                });
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_compare_respects_nulls() {
        let v = PrimitiveVector::<i32>::from_options([Some(1), None, Some(3)]);
        let mask = v.cmp_scalar(&Scalar::Int64(3), CompareOp::Equals).unwrap();
        assert_eq!(mask.as_bytes(), &[0, 0, 1]);
    }

    #[test]
    fn nan_never_equals_including_itself() {
        let v = PrimitiveVector::<f64>::from_values(vec![f64::NAN, 1.0]);
        let mask = v.cmp_scalar(&Scalar::Float64(f64::NAN), CompareOp::Equals).unwrap();
        assert_eq!(mask.as_bytes(), &[0, 0]);
        let self_cmp = v.cmp_vector(&v, CompareOp::Equals).unwrap();
        assert_eq!(self_cmp.as_bytes(), &[0, 1]);
    }

    #[test]
    fn positive_and_negative_zero_are_equal() {
        let v = PrimitiveVector::<f64>::from_values(vec![0.0, -0.0]);
        let mask = v.cmp_scalar(&Scalar::Float64(-0.0), CompareOp::Equals).unwrap();
        assert_eq!(mask.as_bytes(), &[1, 1]);
    }

    #[test]
    fn sum_ignores_nulls_empty_is_additive_identity() {
        let v = PrimitiveVector::<i64>::from_options([Some(10), None, Some(20)]);
        assert_eq!(v.sum().unwrap(), Scalar::Int64(30));
        let empty = PrimitiveVector::<i64>::from_values(vec![]);
        assert_eq!(empty.sum().unwrap(), Scalar::Int64(0));
    }

    #[test]
    fn min_treats_null_as_zero_max_skips() {
        let v = PrimitiveVector::<i64>::from_options([Some(5), None, Some(-3)]);
        assert_eq!(v.min_quirky().unwrap(), -3);
        let v2 = PrimitiveVector::<i64>::from_options([Some(5), None]);
        assert_eq!(v2.min_quirky().unwrap(), 0);
        assert_eq!(v2.max_skip_nulls().unwrap(), Some(5));
    }

    #[test]
    fn take_out_of_range_is_null() {
        let v = PrimitiveVector::<i32>::from_values(vec![10, 20, 30]);
        let taken = v.take(&[0, -1, 99, 2]);
        assert_eq!(taken.len(), 4);
        assert!(taken.is_valid(0));
        assert!(!taken.is_valid(1));
        assert!(!taken.is_valid(2));
        assert!(taken.is_valid(3));
        assert_eq!(taken.data[3], 30);
    }
}
