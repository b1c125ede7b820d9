//! `FixedSizeBinary`: every row occupies exactly `width` bytes.

use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::vector::compare::CompareOp;
use crate::vector::hash::{hash_bytes, mix, NULL_HASH};
use crate::vector::scalar::Scalar;
use crate::vector::BoolMask;

#[derive(Clone, Debug)]
pub struct FixedBinaryVector {
    pub width: usize,
    pub data: Arc<[u8]>,
    pub validity: Option<Bitmap>,
}

impl FixedBinaryVector {
    pub fn from_options<I>(width: usize, values: I) -> Self
    where
        I: IntoIterator<Item = Option<Vec<u8>>>,
    {
        let mut data = Vec::new();
        let mut valid = Vec::new();
        for v in values {
            match v {
                Some(bytes) => {
                    assert_eq!(bytes.len(), width, "FixedSizeBinary row width mismatch");
                    data.extend_from_slice(&bytes);
                    valid.push(true);
                }
                None => {
                    data.extend(std::iter::repeat(0u8).take(width));
                    valid.push(false);
                }
            }
        }
        let null_count = valid.iter().filter(|v| !**v).count();
        let validity = (null_count > 0).then(|| Bitmap::from_bools(valid.into_iter()));
        Self {
            width,
            data: Arc::from(data.into_boxed_slice()),
            validity,
        }
    }

    pub fn len(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, i: usize) -> bool {
        self.validity.as_ref().map_or(true, |v| v.get(i))
    }

    pub fn value(&self, i: usize) -> &[u8] {
        &self.data[i * self.width..(i + 1) * self.width]
    }

    pub fn take(&self, indices: &[i32]) -> Self {
        let values: Vec<Option<Vec<u8>>> = indices
            .iter()
            .map(|&idx| {
                if idx < 0 || idx as usize >= self.len() {
                    None
                } else {
                    let i = idx as usize;
                    self.is_valid(i).then(|| self.value(i).to_vec())
                }
            })
            .collect();
        Self::from_options(self.width, values)
    }

    pub fn hash_into(&self, out: &mut [u64], offset: usize) {
        for i in 0..self.len() {
            let h = if self.is_valid(i) {
                hash_bytes(self.value(i))
            } else {
                NULL_HASH
            };
            out[offset + i] = mix(out[offset + i], h);
        }
    }

    pub fn cmp_scalar(&self, scalar: &Scalar, op: CompareOp) -> Result<BoolMask> {
        let Some(rhs) = scalar.as_bytes() else {
            return Ok(BoolMask::new_false(self.len()));
        };
        let bytes = (0..self.len())
            .map(|i| self.is_valid(i) && op.apply(self.value(i), rhs))
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
                self.is_valid(i) && other.is_valid(i) && op.apply(self.value(i), other.value(i))
            })
            .collect::<Vec<_>>();
        Ok(BoolMask::from_bools(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_roundtrip() {
        let v = FixedBinaryVector::from_options(3, [Some(vec![1, 2, 3]), None, Some(vec![4, 5, 6])]);
        assert_eq!(v.value(0), &[1, 2, 3]);
        assert!(!v.is_valid(1));
        assert_eq!(v.value(2), &[4, 5, 6]);
    }
}
