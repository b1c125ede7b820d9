use morsel_exec::agg::{AggExpr, AggFunc};
use morsel_exec::expr::Expr;
use morsel_exec::join::NullMode;
use morsel_exec::morsel::Morsel;
use morsel_exec::operator::aggregate::Aggregate;
use morsel_exec::operator::hash_join::{HashJoin, JoinKind};
use morsel_exec::operator::limit_offset::LimitOffset;
use morsel_exec::operator::order_by::{NullsOrder, OrderBy, SortDirection, SortKey};
use morsel_exec::operator::projection::Projection;
use morsel_exec::operator::selection::Selection;
use morsel_exec::operator::{collect, MorselSource, Operator};
use morsel_exec::vector::primitive::PrimitiveVector;
use morsel_exec::vector::{Scalar, Vector};

fn orders() -> Morsel {
    Morsel::new(
        vec!["order_id".into(), "customer_id".into(), "amount".into()],
        vec![
            Vector::Int32(PrimitiveVector::from_values(vec![1, 2, 3, 4, 5])),
            Vector::Int32(PrimitiveVector::from_values(vec![10, 20, 10, 30, 20])),
            Vector::Int64(PrimitiveVector::from_values(vec![100, 50, 75, 200, 25])),
        ],
    )
    .unwrap()
}

fn customers() -> Morsel {
    Morsel::new(
        vec!["customer_id".into(), "name".into()],
        vec![
            Vector::Int32(PrimitiveVector::from_values(vec![10, 20, 30])),
            Vector::String(morsel_exec::vector::varwidth::VarWidthVector::from_options([
                Some("alice"),
                Some("bob"),
                Some("carol"),
            ])),
        ],
    )
    .unwrap()
}

/// S1-equivalent: filter then project keeps only the matching rows and the
/// requested columns.
#[test]
fn filter_then_project() {
    let mut pipeline = Projection::select(
        Box::new(Selection::new(
            Box::new(MorselSource::new(vec![orders()])),
            Expr::column("amount").eq(Expr::lit(Scalar::Int64(75))).or(
                Expr::column("amount").eq(Expr::lit(Scalar::Int64(200))),
            ),
        )),
        vec!["order_id".into()],
    );
    let out = collect(&mut pipeline).unwrap();
    let total_rows: usize = out.iter().map(Morsel::num_rows).sum();
    assert_eq!(total_rows, 2);
}

/// S2-equivalent: inner join on customer_id matches every order to its
/// customer and drops nothing since every customer_id exists on both sides.
#[test]
fn inner_join_matches_every_row() {
    let mut join = HashJoin::new(
        Box::new(MorselSource::new(vec![orders()])),
        Box::new(MorselSource::new(vec![customers()])),
        vec!["customer_id".into()],
        vec!["customer_id".into()],
        JoinKind::Inner,
        NullMode::NullsNeverMatch,
    );
    let out = collect(&mut join).unwrap();
    let total_rows: usize = out.iter().map(Morsel::num_rows).sum();
    assert_eq!(total_rows, 5);
    assert!(out[0].column("name").is_ok());
}

/// S3-equivalent: grouped SUM/COUNT per customer.
#[test]
fn group_by_sum_and_count() {
    let mut agg = Aggregate::new(
        Box::new(MorselSource::new(vec![orders()])),
        vec!["customer_id".into()],
        vec![
            AggExpr { func: AggFunc::Sum, column: Some("amount".into()), output_name: "total".into() },
            AggExpr { func: AggFunc::Count, column: Some("amount".into()), output_name: "n".into() },
        ],
    );
    let out = agg.next().unwrap().unwrap();
    assert_eq!(out.num_rows(), 3);
}

/// S4-equivalent: ORDER BY amount DESC LIMIT 2 returns the two largest
/// amounts in descending order.
#[test]
fn order_by_desc_then_limit() {
    let mut pipeline = LimitOffset::new(
        Box::new(OrderBy::new(
            Box::new(MorselSource::new(vec![orders()])),
            vec![SortKey {
                column: "amount".into(),
                direction: SortDirection::Descending,
                nulls: NullsOrder::Last,
            }],
        )),
        0,
        Some(2),
    );
    let out = pipeline.next().unwrap().unwrap();
    let Vector::Int64(v) = out.column("amount").unwrap() else { panic!() };
    assert_eq!(&*v.data, &[200, 100]);
}

/// S5-equivalent: a predicate matching no rows produces an empty stream,
/// not an error.
#[test]
fn filter_matching_nothing_is_empty_not_error() {
    let mut sel = Selection::new(
        Box::new(MorselSource::new(vec![orders()])),
        Expr::column("amount").eq(Expr::lit(Scalar::Int64(-1))),
    );
    assert!(sel.next().unwrap().is_none());
}

/// S6-equivalent: a column referenced by name that does not exist is a
/// typed error, not a panic.
#[test]
fn missing_column_is_a_typed_error() {
    let m = orders();
    let err = m.column("does_not_exist").unwrap_err();
    assert!(matches!(err, morsel_exec::Error::ColumnNotFound(_)));
}
