//! Non-equi join: a join predicate that isn't a simple key-equality
//! comparison (e.g. `a.start <= b.ts AND b.ts < a.end`), evaluated pairwise
//! since it can't be hash-bucketed.

use crate::error::Result;
use crate::expr::Expr;
use crate::join::{align_tables, nonequi_indices};
use crate::morsel::Morsel;
use crate::operator::{materialize_all, Operator};

#[derive(Debug)]
pub struct NonEquiJoin {
    left: Box<dyn Operator>,
    right: Box<dyn Operator>,
    predicate: Expr,
    right_materialized: Option<Morsel>,
}

impl NonEquiJoin {
    pub fn new(left: Box<dyn Operator>, right: Box<dyn Operator>, predicate: Expr) -> Self {
        Self {
            left,
            right,
            predicate,
            right_materialized: None,
        }
    }

    fn materialize_right(&mut self) -> Result<Morsel> {
        let combined = materialize_all(&mut *self.right)?;
        tracing::debug!(rows = combined.num_rows(), "non-equi join materialized right side");
        Ok(combined)
    }
}

impl Operator for NonEquiJoin {
    fn next(&mut self) -> Result<Option<Morsel>> {
        if self.right_materialized.is_none() {
            self.right_materialized = Some(self.materialize_right()?);
        }
        let Some(left_morsel) = self.left.next()? else {
            return Ok(None);
        };
        let right = self.right_materialized.as_ref().unwrap();
        let (l, r) = nonequi_indices(&left_morsel, right, &self.predicate)?;
        Ok(Some(align_tables(&left_morsel, right, &l, &r)?))
    }

    fn name(&self) -> &'static str {
        "NonEquiJoin"
    }

    fn config(&self) -> String {
        format!("{:?}", self.predicate)
    }
}
