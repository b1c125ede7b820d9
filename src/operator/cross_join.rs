//! `CROSS JOIN`: the Cartesian product of left and right. The right side is
//! materialized once; each left morsel is then expanded against it.

use crate::error::Result;
use crate::join::{align_tables, cross_indices};
use crate::morsel::Morsel;
use crate::operator::{materialize_all, Operator};

#[derive(Debug)]
pub struct CrossJoin {
    left: Box<dyn Operator>,
    right: Box<dyn Operator>,
    right_materialized: Option<Morsel>,
}

impl CrossJoin {
    pub fn new(left: Box<dyn Operator>, right: Box<dyn Operator>) -> Self {
        Self {
            left,
            right,
            right_materialized: None,
        }
    }

    fn materialize_right(&mut self) -> Result<Morsel> {
        let combined = materialize_all(&mut *self.right)?;
        tracing::debug!(rows = combined.num_rows(), "cross join materialized right side");
        Ok(combined)
    }
}

impl Operator for CrossJoin {
    fn next(&mut self) -> Result<Option<Morsel>> {
        if self.right_materialized.is_none() {
            self.right_materialized = Some(self.materialize_right()?);
        }
        let Some(left_morsel) = self.left.next()? else {
            return Ok(None);
        };
        let right = self.right_materialized.as_ref().unwrap();
        let (l, r) = cross_indices(left_morsel.num_rows(), right.num_rows());
        Ok(Some(align_tables(&left_morsel, right, &l, &r)?))
    }

    fn name(&self) -> &'static str {
        "CrossJoin"
    }
}
