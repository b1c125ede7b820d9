//! Fallback wrapper around an Arrow array, used for column types this crate
//! does not give a native kernel-optimized representation (e.g. decimal,
//! struct, dictionary-encoded columns arriving from upstream readers).
//! Comparisons and hashing route through Arrow's own compute kernels rather
//! than duplicating per-type logic here.

use arrow::array::{Array, ArrayRef};
use arrow::compute::kernels::cmp;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::vector::compare::CompareOp;
use crate::vector::BoolMask;

#[derive(Clone, Debug)]
pub struct ArrowVector {
    pub array: ArrayRef,
}

impl ArrowVector {
    pub fn new(array: ArrayRef) -> Self {
        Self { array }
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.array.null_count()
    }

    pub fn is_valid(&self, i: usize) -> bool {
        self.array.is_valid(i)
    }

    pub fn validity(&self) -> Option<Bitmap> {
        (self.null_count() > 0)
            .then(|| Bitmap::from_bools((0..self.len()).map(|i| self.array.is_valid(i))))
    }

    pub fn slice(&self, offset: usize, length: usize) -> Self {
        Self::new(self.array.slice(offset, length.min(self.len().saturating_sub(offset))))
    }

    pub fn take(&self, indices: &[i32]) -> Result<Self> {
        // Same out-of-range-is-null contract every other vector kernel
        // honors: `arrow::compute::take` errors on an out-of-bounds index
        // rather than nulling it, so positive indices past `len()` must be
        // turned into `None` here too.
        let len = self.len();
        let idx = arrow::array::Int32Array::from(
            indices
                .iter()
                .map(|&i| if i < 0 || i as usize >= len { None } else { Some(i) })
                .collect::<Vec<_>>(),
        );
        let taken = arrow::compute::take(self.array.as_ref(), &idx, None)
            .map_err(Error::from)?;
        Ok(Self::new(taken))
    }

    fn cmp_arrays(&self, other: &ArrayRef, op: CompareOp) -> Result<BoolMask> {
        let result = match op {
            CompareOp::Equals => cmp::eq(&self.array, other),
            CompareOp::NotEquals => cmp::neq(&self.array, other),
            CompareOp::GreaterThan => cmp::gt(&self.array, other),
            CompareOp::GreaterThanOrEquals => cmp::gt_eq(&self.array, other),
            CompareOp::LessThan => cmp::lt(&self.array, other),
            CompareOp::LessThanOrEquals => cmp::lt_eq(&self.array, other),
        }
        .map_err(Error::from)?;
        let bytes = (0..result.len())
            .map(|i| result.is_valid(i) && result.value(i))
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
        self.cmp_arrays(&other.array, op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;

    #[test]
    fn take_out_of_range_is_null_not_an_error() {
        let array: ArrayRef = StdArc::new(arrow::array::Int64Array::from(vec![1, 2, 3]));
        let v = ArrowVector::new(array);
        let taken = v.take(&[0, -1, 99, 2]).unwrap();
        assert!(taken.is_valid(0));
        assert!(!taken.is_valid(1));
        assert!(!taken.is_valid(2));
        assert!(taken.is_valid(3));
    }
}
