//! `BoolMask`: a dense byte-per-row predicate result (spec §3.3/§4.1).
//!
//! Stored one byte per row (value 0 or 1) rather than bit-packed, so
//! comparison kernels can write results with plain scalar stores and the
//! boolean combinators below can run word-at-a-time over `u64` chunks, which
//! auto-vectorizes cleanly on AVX2/NEON targets without hand-written
//! intrinsics. A byte mask trades memory for branch-free, SIMD-friendly
//! combination; see `BoolMask::to_bitmap` for the bit-packed form used once a
//! mask is promoted to a `Vector::Bool`.

use crate::bitmap::Bitmap;

/// One byte per row, value in `{0, 1}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoolMask {
    bytes: Vec<u8>,
}

impl BoolMask {
    /// New mask of `len` rows, all `false`.
    pub fn new_false(len: usize) -> Self {
        Self { bytes: vec![0; len] }
    }

    /// Build from an iterator of bools.
    pub fn from_bools(bools: impl IntoIterator<Item = bool>) -> Self {
        Self {
            bytes: bools.into_iter().map(|b| u8::from(b)).collect(),
        }
    }

    /// Build directly from pre-computed 0/1 bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        self.bytes[i] != 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Indices of rows where the predicate holds, for feeding into `take`.
    pub fn true_indices(&self) -> Vec<i32> {
        self.bytes
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| (b != 0).then_some(i as i32))
            .collect()
    }

    /// Number of `true` rows.
    pub fn popcount(&self) -> usize {
        self.bytes.iter().filter(|&&b| b != 0).count()
    }

    /// Promote to a packed validity-shaped `Bitmap` (used when a mask becomes
    /// the backing data of a `Vector::Bool`).
    pub fn to_bitmap(&self) -> Bitmap {
        Bitmap::from_bools(self.bytes.iter().map(|&b| b != 0))
    }

    fn word_at(&self, word_idx: usize) -> u64 {
        let start = word_idx * 8;
        let mut buf = [0u8; 8];
        let end = (start + 8).min(self.bytes.len());
        buf[..end - start].copy_from_slice(&self.bytes[start..end]);
        u64::from_ne_bytes(buf)
    }

    fn combine(a: &Self, b: &Self, word_op: impl Fn(u64, u64) -> u64, byte_op: impl Fn(u8, u8) -> u8) -> Self {
        assert_eq!(a.len(), b.len(), "BoolMask combine length mismatch");
        let n = a.len();
        let mut out = vec![0u8; n];
        let full_words = n / 8;
        for w in 0..full_words {
            let combined = word_op(a.word_at(w), b.word_at(w));
            out[w * 8..w * 8 + 8].copy_from_slice(&combined.to_ne_bytes());
        }
        for i in full_words * 8..n {
            out[i] = byte_op(a.bytes[i], b.bytes[i]);
        }
        Self { bytes: out }
    }

    /// Elementwise AND.
    pub fn and(&self, other: &Self) -> Self {
        Self::combine(self, other, |a, b| a & b, |a, b| u8::from(a != 0 && b != 0))
    }

    /// Elementwise OR.
    pub fn or(&self, other: &Self) -> Self {
        Self::combine(self, other, |a, b| a | b, |a, b| u8::from(a != 0 || b != 0))
    }

    /// Elementwise XOR.
    pub fn xor(&self, other: &Self) -> Self {
        Self::combine(
            self,
            other,
            |a, b| a ^ b,
            |a, b| u8::from((a != 0) != (b != 0)),
        )
    }

    /// Elementwise NOT. Bytes are normalized back to exactly `{0, 1}`.
    pub fn not(&self) -> Self {
        Self {
            bytes: self.bytes.iter().map(|&b| u8::from(b == 0)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn and_or_xor_not_small() {
        let a = BoolMask::from_bools([true, false, true, false]);
        let b = BoolMask::from_bools([true, true, false, false]);
        assert_eq!(a.and(&b), BoolMask::from_bools([true, false, false, false]));
        assert_eq!(a.or(&b), BoolMask::from_bools([true, true, true, false]));
        assert_eq!(a.xor(&b), BoolMask::from_bools([false, true, true, false]));
        assert_eq!(a.not(), BoolMask::from_bools([false, true, false, true]));
    }

    #[test]
    fn word_boundary_combine() {
        let n = 37; // deliberately not a multiple of 8
        let a = BoolMask::from_bools((0..n).map(|i| i % 2 == 0));
        let b = BoolMask::from_bools((0..n).map(|i| i % 3 == 0));
        let and = a.and(&b);
        for i in 0..n {
            assert_eq!(and.get(i), i % 2 == 0 && i % 3 == 0);
        }
    }

    proptest! {
        #[test]
        fn boolean_algebra_distributive(
            bits in prop::collection::vec(any::<bool>(), 1..200)
        ) {
            let len = bits.len();
            let a = BoolMask::from_bools(bits.clone());
            let b = BoolMask::from_bools((0..len).map(|i| (i * 7 + 3) % 5 == 0));
            let c = BoolMask::from_bools((0..len).map(|i| (i * 11 + 1) % 4 == 0));

            let lhs = a.and(&b.or(&c));
            let rhs = a.and(&b).or(&a.and(&c));
            prop_assert_eq!(lhs, rhs);

            prop_assert_eq!(a.not().not(), a.clone());

            let zeros = BoolMask::new_false(len);
            prop_assert_eq!(a.xor(&a), zeros);
        }
    }
}
