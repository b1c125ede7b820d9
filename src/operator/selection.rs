//! `WHERE`: filters each pulled morsel down to the rows a predicate keeps.

use crate::error::Result;
use crate::expr::{evaluator, Expr};
use crate::morsel::Morsel;
use crate::operator::Operator;

#[derive(Debug)]
pub struct Selection {
    input: Box<dyn Operator>,
    predicate: Expr,
}

impl Selection {
    pub fn new(input: Box<dyn Operator>, predicate: Expr) -> Self {
        Self { input, predicate }
    }
}

impl Operator for Selection {
    fn next(&mut self) -> Result<Option<Morsel>> {
        loop {
            let Some(morsel) = self.input.next()? else {
                return Ok(None);
            };
            let mask = evaluator::evaluate(&morsel, &self.predicate)?;
            if mask.popcount() == 0 {
                continue;
            }
            return Ok(Some(morsel.filter(&mask)));
        }
    }

    fn name(&self) -> &'static str {
        "Selection"
    }

    fn config(&self) -> String {
        format!("{:?}", self.predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::MorselSource;
    use crate::vector::primitive::PrimitiveVector;
    use crate::vector::{Scalar, Vector};

    #[test]
    fn keeps_only_matching_rows_and_skips_empty_results() {
        let m1 = Morsel::new(
            vec!["a".into()],
            vec![Vector::Int32(PrimitiveVector::from_values(vec![1, 2, 3]))],
        )
        .unwrap();
        let m2 = Morsel::new(
            vec!["a".into()],
            vec![Vector::Int32(PrimitiveVector::from_values(vec![10, 11]))],
        )
        .unwrap();
        let source = MorselSource::new(vec![m1, m2]);
        let predicate = Expr::column("a").eq(Expr::lit(Scalar::Int64(2)));
        let mut sel = Selection::new(Box::new(source), predicate);

        let first = sel.next().unwrap().unwrap();
        assert_eq!(first.num_rows(), 1);
        assert!(sel.next().unwrap().is_none());
    }
}
