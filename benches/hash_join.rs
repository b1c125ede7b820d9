use criterion::{black_box, criterion_group, criterion_main, Criterion};

use morsel_exec::join::{hash_probe, HashBuildSide, NullMode};
use morsel_exec::morsel::Morsel;
use morsel_exec::vector::primitive::PrimitiveVector;
use morsel_exec::vector::Vector;

fn keyed_morsel(n: usize, modulus: i32) -> Morsel {
    let keys: Vec<i32> = (0..n as i32).map(|i| i % modulus).collect();
    Morsel::new(vec!["key".into()], vec![Vector::Int32(PrimitiveVector::from_values(keys))]).unwrap()
}

fn bench_hash_join_probe(c: &mut Criterion) {
    let build_morsel = keyed_morsel(100_000, 100_000);
    let probe_morsel = keyed_morsel(100_000, 100_000);
    let build = HashBuildSide::build(&build_morsel, &["key"], NullMode::NullsNeverMatch).unwrap();

    c.bench_function("hash_join_probe_100k_unique_keys", |b| {
        b.iter(|| {
            let result = hash_probe(black_box(&build), black_box(&probe_morsel), &["key"], false).unwrap();
            black_box(result);
        })
    });
}

criterion_group!(benches, bench_hash_join_probe);
criterion_main!(benches);
