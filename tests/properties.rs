use proptest::prelude::*;

use morsel_exec::join::{align_tables, hash_probe, HashBuildSide, NullMode};
use morsel_exec::morsel::Morsel;
use morsel_exec::vector::primitive::PrimitiveVector;
use morsel_exec::vector::Vector;

fn keyed_morsel(keys: &[i32]) -> Morsel {
    Morsel::new(
        vec!["key".into()],
        vec![Vector::Int32(PrimitiveVector::from_values(keys.to_vec()))],
    )
    .unwrap()
}

proptest! {
    /// Hashing the same row twice always produces the same hash (required
    /// for hash-join/group-by correctness).
    #[test]
    fn row_hash_is_stable(values in prop::collection::vec(any::<i32>(), 1..50)) {
        let m = keyed_morsel(&values);
        let h1 = m.hash(Some(&["key"])).unwrap();
        let h2 = m.hash(Some(&["key"])).unwrap();
        prop_assert_eq!(h1, h2);
    }

    /// Every probe row with a matching build key appears at least once in
    /// an inner join's output (join completeness).
    #[test]
    fn inner_join_is_complete(
        build_keys in prop::collection::vec(0i32..10, 1..40),
        probe_keys in prop::collection::vec(0i32..10, 1..40),
    ) {
        let build_morsel = keyed_morsel(&build_keys);
        let probe_morsel = keyed_morsel(&probe_keys);
        let build = HashBuildSide::build(&build_morsel, &["key"], NullMode::NullsNeverMatch).unwrap();
        let (_, probe_idx) = hash_probe(&build, &probe_morsel, &["key"], false).unwrap();

        let build_set: std::collections::HashSet<i32> = build_keys.iter().copied().collect();
        for (row, &k) in probe_keys.iter().enumerate() {
            if build_set.contains(&k) {
                prop_assert!(probe_idx.contains(&(row as i32)));
            } else {
                prop_assert!(!probe_idx.contains(&(row as i32)));
            }
        }
    }

    /// LEFT OUTER join never drops a probe row, matched or not.
    #[test]
    fn left_outer_join_never_drops_probe_rows(
        build_keys in prop::collection::vec(0i32..5, 0..20),
        probe_keys in prop::collection::vec(0i32..5, 1..20),
    ) {
        let build_morsel = keyed_morsel(&build_keys);
        let probe_morsel = keyed_morsel(&probe_keys);
        let build = HashBuildSide::build(&build_morsel, &["key"], NullMode::NullsNeverMatch).unwrap();
        let (_, probe_idx) = hash_probe(&build, &probe_morsel, &["key"], true).unwrap();

        let mut seen: Vec<i32> = probe_idx.clone();
        seen.sort_unstable();
        seen.dedup();
        let mut expected: Vec<i32> = (0..probe_keys.len() as i32).collect();
        expected.sort_unstable();
        prop_assert_eq!(seen, expected);
    }

    /// Every `Int32` column survives a `to_arrow`/`from_arrow` round trip
    /// with its values and validity intact.
    #[test]
    fn int32_vector_round_trips_through_arrow(
        values in prop::collection::vec(any::<Option<i32>>(), 0..50)
    ) {
        let mut b = morsel_exec::vector::builder::GrowableBuilder::<i32>::with_estimate(values.len());
        for v in &values {
            match v {
                Some(x) => b.append(*x),
                None => b.append_null(),
            }
        }
        let original = Vector::Int32(b.finish());
        let array = original.to_arrow().unwrap();
        let restored = Vector::from_arrow(&array).unwrap();
        prop_assert_eq!(original.length(), restored.length());
        for i in 0..values.len() {
            prop_assert_eq!(original.is_valid(i), restored.is_valid(i));
        }
    }

    /// `null_count` always agrees with counting `is_valid` by hand —
    /// validity bookkeeping can't silently drift from the bitmap itself.
    #[test]
    fn null_count_matches_is_valid_tally(
        values in prop::collection::vec(any::<Option<i64>>(), 0..50)
    ) {
        let mut b = morsel_exec::vector::builder::GrowableBuilder::<i64>::with_estimate(values.len());
        for v in &values {
            match v {
                Some(x) => b.append(*x),
                None => b.append_null(),
            }
        }
        let v = Vector::Int64(b.finish());
        let tallied = (0..v.length()).filter(|&i| !v.is_valid(i)).count();
        prop_assert_eq!(v.null_count(), tallied);
    }

    /// `take` always produces exactly as many rows as indices given, however
    /// many of those indices are out of range.
    #[test]
    fn take_preserves_requested_length(
        values in prop::collection::vec(any::<i32>(), 1..20),
        indices in prop::collection::vec(-5i32..25, 0..30),
    ) {
        let v = Vector::Int32(PrimitiveVector::from_values(values));
        let taken = v.take(&indices);
        prop_assert_eq!(taken.length(), indices.len());
    }

    /// `align_tables` with no indices at all produces a zero-row morsel that
    /// still carries the union of both sides' schemas.
    #[test]
    fn align_tables_with_no_indices_is_empty_but_keeps_schema(
        left_vals in prop::collection::vec(any::<i32>(), 1..10),
        right_vals in prop::collection::vec(any::<i32>(), 1..10),
    ) {
        let left = Morsel::new(vec!["a".into()], vec![Vector::Int32(PrimitiveVector::from_values(left_vals))]).unwrap();
        let right = Morsel::new(vec!["b".into()], vec![Vector::Int32(PrimitiveVector::from_values(right_vals))]).unwrap();
        let aligned = align_tables(&left, &right, &[], &[]).unwrap();
        prop_assert_eq!(aligned.num_rows(), 0);
        prop_assert_eq!(aligned.num_columns(), 2);
    }
}
