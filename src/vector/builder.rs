//! Incremental vector construction.
//!
//! `GrowableBuilder` grows like a `Vec` (amortized reallocation, good for
//! pipeline stages that don't know their output cardinality up front, e.g.
//! a filter). `StrictBuilder` preallocates an exact row count and writes by
//! index (good for operators that know cardinality ahead of time, e.g. a
//! hash-join probe phase writing one output row per match). Both panic on
//! any write after `finish()`, matching the one-shot nature of a morsel's
//! column buffers once handed downstream.

use crate::bitmap::Bitmap;
use crate::vector::primitive::{Numeric, PrimitiveVector};

/// Append-only builder with no known final length ahead of time.
pub struct GrowableBuilder<T: Numeric> {
    data: Vec<T>,
    valid: Vec<bool>,
    finished: bool,
}

impl<T: Numeric> GrowableBuilder<T> {
    pub fn with_estimate(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            valid: Vec::with_capacity(capacity),
            finished: false,
        }
    }

    pub fn append(&mut self, value: T) {
        assert!(!self.finished, "append after finish()");
        self.data.push(value);
        self.valid.push(true);
    }

    pub fn append_null(&mut self) {
        assert!(!self.finished, "append after finish()");
        self.data.push(T::default());
        self.valid.push(false);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn finish(mut self) -> PrimitiveVector<T> {
        self.finished = true;
        let null_count = self.valid.iter().filter(|v| !**v).count() as u32;
        let validity = (null_count > 0).then(|| Bitmap::from_bools(self.valid.into_iter()));
        PrimitiveVector {
            data: std::sync::Arc::from(std::mem::take(&mut self.data).into_boxed_slice()),
            validity,
            null_count,
        }
    }
}

/// Preallocated, random-access builder for a known final row count.
pub struct StrictBuilder<T: Numeric> {
    data: Vec<T>,
    valid: Vec<bool>,
    finished: bool,
}

impl<T: Numeric> StrictBuilder<T> {
    pub fn with_counts(rows: usize) -> Self {
        Self {
            data: vec![T::default(); rows],
            valid: vec![true; rows],
            finished: false,
        }
    }

    pub fn set(&mut self, i: usize, value: T) {
        assert!(!self.finished, "set after finish()");
        self.data[i] = value;
        self.valid[i] = true;
    }

    pub fn set_null(&mut self, i: usize) {
        assert!(!self.finished, "set_null after finish()");
        self.data[i] = T::default();
        self.valid[i] = false;
    }

    pub fn set_validity_mask(&mut self, mask: &[bool]) {
        assert!(!self.finished, "set_validity_mask after finish()");
        assert_eq!(mask.len(), self.valid.len());
        self.valid.copy_from_slice(mask);
    }

    pub fn finish(mut self) -> PrimitiveVector<T> {
        self.finished = true;
        let null_count = self.valid.iter().filter(|v| !**v).count() as u32;
        let validity = (null_count > 0).then(|| Bitmap::from_bools(self.valid.into_iter()));
        PrimitiveVector {
            data: std::sync::Arc::from(std::mem::take(&mut self.data).into_boxed_slice()),
            validity,
            null_count,
        }
    }
}
