use criterion::{black_box, criterion_group, criterion_main, Criterion};

use morsel_exec::vector::primitive::PrimitiveVector;
use morsel_exec::vector::{CompareOp, Scalar};

fn bench_compare(c: &mut Criterion) {
    let data: Vec<i64> = (0..1_000_000).collect();
    let v = PrimitiveVector::from_values(data);
    c.bench_function("primitive_cmp_scalar_eq_1m", |b| {
        b.iter(|| v.cmp_scalar(black_box(&Scalar::Int64(500_000)), CompareOp::Equals).unwrap())
    });
}

fn bench_hash(c: &mut Criterion) {
    let data: Vec<i64> = (0..1_000_000).collect();
    let v = PrimitiveVector::from_values(data);
    c.bench_function("primitive_hash_into_1m", |b| {
        b.iter(|| {
            let mut out = vec![0u64; v.len()];
            v.hash_into(&mut out, 0);
            black_box(out);
        })
    });
}

criterion_group!(benches, bench_compare, bench_hash);
criterion_main!(benches);
