//! Top-K row selection: `ORDER BY <col> LIMIT k` is `O(n log n)` as a full
//! sort but only needs `O(n log k)` via a bounded heap. `operator::order_by`
//! still does the general multi-key sort; this is the single-key fast path
//! a query planner can choose once it recognizes the `ORDER BY ... LIMIT`
//! shape.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::morsel::Morsel;
use crate::operator::order_by::SortDirection;
use crate::vector::scalar::compare_scalars;
use crate::vector::Scalar;

struct HeapEntry {
    key: Scalar,
    row: usize,
    /// Ascending heap needs a max-heap of "worst kept" on top to evict;
    /// descending needs the opposite. Flip the comparison direction here so
    /// `BinaryHeap` (always a max-heap) can serve both.
    want_descending: bool,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        let ord = compare_scalars(&self.key, &other.key).unwrap_or(Ordering::Equal);
        if self.want_descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

/// Row indices of the top `k` rows of `morsel` by `column`, in the
/// requested order. Ties break by first-seen row order.
pub fn top_k(morsel: &Morsel, column: &str, k: usize, direction: SortDirection) -> Result<Vec<i32>> {
    if k == 0 {
        return Err(Error::InvalidState("top_k requires k > 0".into()));
    }
    let col = morsel.column(column)?;
    let want_descending = direction == SortDirection::Descending;
    // The heap always keeps the *worst* of the currently-kept rows on top so
    // it can be evicted in O(log k); "worst" for a descending top-k is the
    // smallest value, so the heap ordering is inverted relative to `want_descending`.
    let mut heap: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(k + 1);
    for row in 0..morsel.num_rows() {
        let key = col.scalar_at(row);
        if key.is_null() {
            continue;
        }
        let entry = HeapEntry {
            key,
            row,
            want_descending: !want_descending,
        };
        if heap.len() < k {
            heap.push(entry);
        } else if let Some(worst) = heap.peek() {
            if entry.cmp(worst) == Ordering::Greater {
                heap.pop();
                heap.push(entry);
            }
        }
    }
    let mut kept: Vec<HeapEntry> = heap.into_vec();
    kept.sort_by(|a, b| {
        let ord = compare_scalars(&a.key, &b.key).unwrap_or(Ordering::Equal);
        if want_descending {
            ord.reverse()
        } else {
            ord
        }
    });
    Ok(kept.into_iter().map(|e| e.row as i32).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::primitive::PrimitiveVector;
    use crate::vector::Vector;

    #[test]
    fn top_k_descending_picks_largest() {
        let m = Morsel::new(
            vec!["score".into()],
            vec![Vector::Float64(PrimitiveVector::from_values(vec![1.0, 9.0, 3.0, 7.0, 2.0]))],
        )
        .unwrap();
        let idx = top_k(&m, "score", 2, SortDirection::Descending).unwrap();
        assert_eq!(idx, vec![1, 3]);
    }

    #[test]
    fn top_k_ascending_picks_smallest() {
        let m = Morsel::new(
            vec!["score".into()],
            vec![Vector::Float64(PrimitiveVector::from_values(vec![5.0, 1.0, 4.0, 2.0]))],
        )
        .unwrap();
        let idx = top_k(&m, "score", 2, SortDirection::Ascending).unwrap();
        assert_eq!(idx, vec![1, 3]);
    }

    /// The bounded-heap fast path must agree with a full sort-and-truncate on
    /// random data, for both directions and a range of `k`.
    #[test]
    fn top_k_matches_full_sort_on_random_data() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let n = rng.gen_range(1..200);
            let values: Vec<f64> = (0..n).map(|_| rng.gen_range(-1000.0..1000.0)).collect();
            let k = rng.gen_range(1..=n);
            let m = Morsel::new(
                vec!["v".into()],
                vec![Vector::Float64(PrimitiveVector::from_values(values.clone()))],
            )
            .unwrap();
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let idx = top_k(&m, "v", k, direction).unwrap();
                let mut sorted: Vec<f64> = values.clone();
                sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
                if direction == SortDirection::Descending {
                    sorted.reverse();
                }
                let expected: Vec<f64> = sorted.into_iter().take(k).collect();
                let got: Vec<f64> = idx.iter().map(|&r| values[r as usize]).collect();
                assert_eq!(got, expected);
            }
        }
    }
}
