//! C5/C7: join kernels and the `align_tables` row-alignment primitive they
//! (and `UNNEST`) are built on.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::error::Result;
use crate::morsel::Morsel;
use crate::vector::scalar::compare_scalars;
use crate::vector::Vector;

/// Gather rows from `left`/`right` by parallel index arrays into one output
/// morsel. A negative index produces an all-null row for that side. When a
/// column name exists on both sides, the left copy wins (spec §4.7,
/// grounded on the source system's `align_tables` duplicate-name rule).
pub fn align_tables(left: &Morsel, right: &Morsel, left_indices: &[i32], right_indices: &[i32]) -> Result<Morsel> {
    debug_assert_eq!(left_indices.len(), right_indices.len());
    let left_taken = left.take(left_indices);
    let right_taken = right.take(right_indices);

    let mut names: Vec<String> = left_taken.column_names().to_vec();
    let mut columns: Vec<crate::vector::Vector> = left_taken.columns().to_vec();
    for (name, col) in right_taken.column_names().iter().zip(right_taken.columns()) {
        if names.contains(name) {
            continue;
        }
        names.push(name.clone());
        columns.push(col.clone());
    }
    Morsel::new(names, columns)
}

/// Whether NULL key values are considered equal to each other (non-standard
/// SQL, but required by some `UNNEST`/dedup call sites upstream).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullMode {
    NullsNeverMatch,
    NullsMatch,
}

/// A hash table over one side's join-key rows, bucketed by row hash with a
/// `SmallVec` per bucket (most buckets hold very few matches). Keeps its own
/// copy of the key columns (cheap: `Vector`'s backing storage is `Arc`-shared)
/// so a bucket hit can be re-verified against the actual key cells rather
/// than trusted on the hash alone.
#[derive(Debug)]
pub struct HashBuildSide {
    buckets: HashMap<u64, SmallVec<[u32; 4]>>,
    validity: Vec<bool>,
    key_columns: Vec<Vector>,
    null_mode: NullMode,
}

impl HashBuildSide {
    pub fn build(morsel: &Morsel, key_columns: &[&str], null_mode: NullMode) -> Result<Self> {
        let hashes = morsel.hash(Some(key_columns))?;
        let mut validity = vec![true; morsel.num_rows()];
        if null_mode == NullMode::NullsNeverMatch {
            for &name in key_columns {
                let col = morsel.column(name)?;
                for row in 0..morsel.num_rows() {
                    if !col.is_valid(row) {
                        validity[row] = false;
                    }
                }
            }
        }
        let mut buckets: HashMap<u64, SmallVec<[u32; 4]>> = HashMap::new();
        for (row, &h) in hashes.iter().enumerate() {
            if validity[row] {
                buckets.entry(h).or_default().push(row as u32);
            }
        }
        let owned_key_columns = key_columns
            .iter()
            .map(|&name| morsel.column(name).map(Vector::clone))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            buckets,
            validity,
            key_columns: owned_key_columns,
            null_mode,
        })
    }

    fn candidates(&self, hash: u64) -> &[u32] {
        self.buckets.get(&hash).map_or(&[], |v| v.as_slice())
    }

    /// True if `probe`'s key cells at `probe_row` equal this build row's key
    /// cells, column by column — the re-comparison a hash-bucket hit still
    /// needs since two distinct keys can collide in the 64-bit row hash.
    fn keys_match(&self, build_row: u32, probe: &Morsel, probe_key_columns: &[&str], probe_row: usize) -> Result<bool> {
        for (build_col, &probe_name) in self.key_columns.iter().zip(probe_key_columns) {
            let build_scalar = build_col.scalar_at(build_row as usize);
            let probe_scalar = probe.column(probe_name)?.scalar_at(probe_row);
            let equal = match self.null_mode {
                NullMode::NullsMatch => compare_scalars(&build_scalar, &probe_scalar) == Some(std::cmp::Ordering::Equal),
                NullMode::NullsNeverMatch => {
                    !build_scalar.is_null()
                        && !probe_scalar.is_null()
                        && compare_scalars(&build_scalar, &probe_scalar) == Some(std::cmp::Ordering::Equal)
                }
            };
            if !equal {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// INNER/LEFT OUTER hash-join probe: matches `probe`'s rows into `build`'s
/// hash table, producing parallel `(build_index, probe_index)` arrays ready
/// for `align_tables`. `build_index == -1` marks an unmatched LEFT OUTER row.
/// Every bucket hit is re-verified against the actual key cells before being
/// counted as a match, since a bucket only guarantees equal hashes, not equal
/// keys.
pub fn hash_probe(
    build: &HashBuildSide,
    probe: &Morsel,
    probe_key_columns: &[&str],
    outer: bool,
) -> Result<(Vec<i32>, Vec<i32>)> {
    let hashes = probe.hash(Some(probe_key_columns))?;
    let mut build_out = Vec::new();
    let mut probe_out = Vec::new();
    for (row, &h) in hashes.iter().enumerate() {
        let mut matched = false;
        for &m in build.candidates(h) {
            if build.keys_match(m, probe, probe_key_columns, row)? {
                build_out.push(m as i32);
                probe_out.push(row as i32);
                matched = true;
            }
        }
        if !matched && outer {
            build_out.push(-1);
            probe_out.push(row as i32);
        }
    }
    Ok((build_out, probe_out))
}

/// Cross join: every left row against every right row.
pub fn cross_indices(left_rows: usize, right_rows: usize) -> (Vec<i32>, Vec<i32>) {
    let mut left_out = Vec::with_capacity(left_rows * right_rows);
    let mut right_out = Vec::with_capacity(left_rows * right_rows);
    for l in 0..left_rows {
        for r in 0..right_rows {
            left_out.push(l as i32);
            right_out.push(r as i32);
        }
    }
    (left_out, right_out)
}

/// Non-equi join: evaluate an arbitrary predicate over every `(left, right)`
/// pair. Quadratic by construction (spec §4.5's accepted cost for non-equi
/// predicates, which can't be hash-bucketed).
pub fn nonequi_indices(
    left: &Morsel,
    right: &Morsel,
    predicate: &crate::expr::Expr,
) -> Result<(Vec<i32>, Vec<i32>)> {
    let mut left_out = Vec::new();
    let mut right_out = Vec::new();
    for l in 0..left.num_rows() {
        let left_row = left.slice(l, 1);
        for r in 0..right.num_rows() {
            let right_row = right.slice(r, 1);
            let candidate = align_tables(&left_row, &right_row, &[0], &[0])?;
            let mask = crate::expr::evaluator::evaluate(&candidate, predicate)?;
            if mask.get(0) {
                left_out.push(l as i32);
                right_out.push(r as i32);
            }
        }
    }
    Ok((left_out, right_out))
}
