use criterion::{black_box, criterion_group, criterion_main, Criterion};

use morsel_exec::agg::{AggExpr, AggFunc, GroupState};
use morsel_exec::morsel::Morsel;
use morsel_exec::vector::primitive::PrimitiveVector;
use morsel_exec::vector::Vector;

fn sample(rows: usize, groups: i32) -> Morsel {
    let keys: Vec<i32> = (0..rows as i32).map(|i| i % groups).collect();
    let vals: Vec<i64> = (0..rows as i64).collect();
    Morsel::new(
        vec!["grp".into(), "val".into()],
        vec![
            Vector::Int32(PrimitiveVector::from_values(keys)),
            Vector::Int64(PrimitiveVector::from_values(vals)),
        ],
    )
    .unwrap()
}

fn bench_group_by_sum(c: &mut Criterion) {
    let morsel = sample(200_000, 1_000);
    c.bench_function("group_by_sum_200k_rows_1k_groups", |b| {
        b.iter(|| {
            let mut state = GroupState::new(vec![AggExpr {
                func: AggFunc::Sum,
                column: Some("val".into()),
                output_name: "sum_val".into(),
            }]);
            state.consume(black_box(&morsel), &["grp"]).unwrap();
            black_box(state.finish(&["grp".to_string()]).unwrap());
        })
    });
}

criterion_group!(benches, bench_group_by_sum);
criterion_main!(benches);
