//! `GROUP BY` / scalar aggregation: a blocking operator, like `OrderBy` —
//! the first output row can't be produced before every input row has fed
//! the accumulators.

use crate::agg::{scalar_aggregate, AggExpr, GroupState};
use crate::error::Result;
use crate::morsel::Morsel;
use crate::operator::Operator;

#[derive(Debug)]
pub struct Aggregate {
    input: Box<dyn Operator>,
    group_by: Vec<String>,
    exprs: Vec<AggExpr>,
    output: Option<std::vec::IntoIter<Morsel>>,
}

impl Aggregate {
    pub fn new(input: Box<dyn Operator>, group_by: Vec<String>, exprs: Vec<AggExpr>) -> Self {
        Self {
            input,
            group_by,
            exprs,
            output: None,
        }
    }
}

impl Operator for Aggregate {
    fn next(&mut self) -> Result<Option<Morsel>> {
        if self.output.is_none() {
            // With no GROUP BY clause there's a single implicit group, which
            // must produce exactly one output row even over zero input rows
            // (e.g. `SELECT COUNT(*) FROM t WHERE false` is 0, not no rows).
            // `GroupState` alone can't express that: with nothing ever
            // consumed it never creates a slot, so it must be bypassed via
            // `scalar_aggregate` rather than driven directly.
            let result = if self.group_by.is_empty() {
                scalar_aggregate(&mut || self.input.next(), self.exprs.clone())?
            } else {
                let mut state = GroupState::new(self.exprs.clone());
                let keys: Vec<&str> = self.group_by.iter().map(String::as_str).collect();
                while let Some(m) = self.input.next()? {
                    state.consume(&m, &keys)?;
                }
                state.finish(&self.group_by)?
            };
            tracing::debug!(groups = result.num_rows(), keys = ?self.group_by, "aggregate finalized");
            self.output = Some(vec![result].into_iter());
        }
        Ok(self.output.as_mut().unwrap().next())
    }

    fn name(&self) -> &'static str {
        "Aggregate"
    }

    fn config(&self) -> String {
        format!("GROUP BY {}", self.group_by.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agg::AggFunc;
    use crate::operator::MorselSource;
    use crate::vector::primitive::PrimitiveVector;
    use crate::vector::Vector;

    #[test]
    fn scalar_aggregate_over_empty_input_still_emits_one_row() {
        let mut agg = Aggregate::new(
            Box::new(MorselSource::new(vec![])),
            vec![],
            vec![
                AggExpr { func: AggFunc::Count, column: None, output_name: "n".into() },
                AggExpr { func: AggFunc::Sum, column: Some("v".into()), output_name: "total".into() },
            ],
        );
        let result = agg.next().unwrap().unwrap();
        assert_eq!(result.num_rows(), 1);
        let Vector::Int64(n) = result.column("n").unwrap() else { panic!() };
        assert_eq!(n.data[0], 0);
        assert!(!result.column("total").unwrap().is_valid(0));
        assert!(agg.next().unwrap().is_none());
    }

    #[test]
    fn scalar_aggregate_with_rows_produces_one_row() {
        let m = Morsel::new(
            vec!["v".into()],
            vec![Vector::Int64(PrimitiveVector::from_values(vec![10, 20, 30]))],
        )
        .unwrap();
        let mut agg = Aggregate::new(
            Box::new(MorselSource::new(vec![m])),
            vec![],
            vec![AggExpr { func: AggFunc::Sum, column: Some("v".into()), output_name: "total".into() }],
        );
        let result = agg.next().unwrap().unwrap();
        assert_eq!(result.num_rows(), 1);
        let Vector::Float64(total) = result.column("total").unwrap() else { panic!() };
        assert_eq!(total.data[0], 60.0);
    }
}
