//! `String`/`Binary`: Arrow-style offset + data buffers.

use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::error::{Error, Result};
use crate::vector::compare::CompareOp;
use crate::vector::hash::{hash_bytes, mix, NULL_HASH};
use crate::vector::scalar::Scalar;
use crate::vector::BoolMask;

/// Variable-width column: `i32` offsets into a shared byte buffer, one more
/// offset than row (Arrow convention: row `i` spans `data[offsets[i]..offsets[i+1]]`).
#[derive(Clone, Debug)]
pub struct VarWidthVector {
    pub offsets: Arc<[i32]>,
    pub data: Arc<[u8]>,
    pub validity: Option<Bitmap>,
}

impl VarWidthVector {
    pub fn from_options<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<[u8]>,
    {
        let mut offsets = vec![0i32];
        let mut data = Vec::new();
        let mut valid = Vec::new();
        for v in values {
            match v {
                Some(bytes) => {
                    data.extend_from_slice(bytes.as_ref());
                    valid.push(true);
                }
                None => valid.push(false),
            }
            offsets.push(data.len() as i32);
        }
        let null_count = valid.iter().filter(|v| !**v).count();
        let validity = (null_count > 0).then(|| Bitmap::from_bools(valid.into_iter()));
        Self {
            offsets: Arc::from(offsets.into_boxed_slice()),
            data: Arc::from(data.into_boxed_slice()),
            validity,
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, i: usize) -> bool {
        self.validity.as_ref().map_or(true, |v| v.get(i))
    }

    pub fn value(&self, i: usize) -> &[u8] {
        let start = self.offsets[i] as usize;
        let end = self.offsets[i + 1] as usize;
        &self.data[start..end]
    }

    pub fn null_count(&self) -> usize {
        self.validity.as_ref().map_or(0, Bitmap::null_count)
    }

    pub fn slice(&self, offset: usize, length: usize) -> Self {
        let length = length.min(self.len().saturating_sub(offset));
        let values: Vec<Option<Vec<u8>>> = (offset..offset + length)
            .map(|i| self.is_valid(i).then(|| self.value(i).to_vec()))
            .collect();
        Self::from_options(values)
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
        Self::from_options(values)
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
    fn value_and_null_roundtrip() {
        let v = VarWidthVector::from_options([Some("hi"), None, Some("there")]);
        assert_eq!(v.value(0), b"hi");
        assert!(!v.is_valid(1));
        assert_eq!(v.value(2), b"there");
    }

    #[test]
    fn take_out_of_range_is_null() {
        let v = VarWidthVector::from_options([Some("a"), Some("b")]);
        let taken = v.take(&[1, -1, 99]);
        assert_eq!(taken.value(0), b"b");
        assert!(!taken.is_valid(1));
        assert!(!taken.is_valid(2));
    }

    #[test]
    fn equals_compares_bytes() {
        let v = VarWidthVector::from_options([Some("a"), Some("b")]);
        let mask = v
            .cmp_scalar(&Scalar::Bytes(b"b".to_vec()), CompareOp::Equals)
            .unwrap();
        assert_eq!(mask.as_bytes(), &[0, 1]);
    }
}
