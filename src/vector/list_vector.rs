//! `List`: each row is a variable-length run of a child `Vector`.

use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::vector::hash::{mix, NULL_HASH};
use crate::vector::Vector;

#[derive(Clone, Debug)]
pub struct ListVector {
    pub offsets: Arc<[i32]>,
    pub child: Box<Vector>,
    pub validity: Option<Bitmap>,
}

impl ListVector {
    pub fn new(offsets: Vec<i32>, child: Vector, validity: Option<Bitmap>) -> Self {
        Self {
            offsets: Arc::from(offsets.into_boxed_slice()),
            child: Box::new(child),
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

    /// The child-vector slice backing row `i` (used by `UNNEST`).
    pub fn row(&self, i: usize) -> Vector {
        let start = self.offsets[i] as usize;
        let end = self.offsets[i + 1] as usize;
        self.child.slice(start, end - start)
    }

    pub fn take(&self, indices: &[i32]) -> Self {
        let mut offsets = vec![0i32];
        let mut child = self.child.slice(0, 0);
        let mut valid = Vec::with_capacity(indices.len());
        for &idx in indices {
            if idx < 0 || idx as usize >= self.len() || !self.is_valid(idx as usize) {
                valid.push(false);
            } else {
                let row = self.row(idx as usize);
                child = child.concat(&row);
                valid.push(true);
            }
            offsets.push(child.length() as i32);
        }
        Self::new(offsets, child, Some(Bitmap::from_bools(valid.into_iter())))
    }

    /// Row hash is the combined hash of every element in the row, mixed with
    /// a distinguishing seed so an empty list and a null list hash differently.
    pub fn hash_into(&self, out: &mut [u64], offset: usize) {
        for i in 0..self.len() {
            if !self.is_valid(i) {
                out[offset + i] = mix(out[offset + i], NULL_HASH);
                continue;
            }
            let row = self.row(i);
            let mut row_hash = vec![0u64; row.length()];
            row.hash_into(&mut row_hash, 0);
            let combined = row_hash.into_iter().fold(0u64, mix);
            out[offset + i] = mix(out[offset + i], combined);
        }
    }
}
