//! `ORDER BY`: a blocking sort. Unlike the rest of the pipeline this
//! operator must see every input morsel before it can emit its first output
//! row, so it materializes the whole input on the first `next()` call.

use crate::error::Result;
use crate::morsel::Morsel;
use crate::operator::{materialize_all, Operator};
use crate::vector::scalar::compare_scalars;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Clone, Debug)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
    pub nulls: NullsOrder,
}

#[derive(Debug)]
pub struct OrderBy {
    input: Box<dyn Operator>,
    keys: Vec<SortKey>,
    materialized: Option<std::vec::IntoIter<Morsel>>,
}

impl OrderBy {
    pub fn new(input: Box<dyn Operator>, keys: Vec<SortKey>) -> Self {
        Self {
            input,
            keys,
            materialized: None,
        }
    }

    fn materialize(&mut self) -> Result<Morsel> {
        let combined = materialize_all(&mut *self.input)?;
        tracing::debug!(rows = combined.num_rows(), keys = ?self.keys, "order by materialized input");
        Ok(combined)
    }
}

impl Operator for OrderBy {
    fn next(&mut self) -> Result<Option<Morsel>> {
        if self.materialized.is_none() {
            let morsel = self.materialize()?;
            let rows = morsel.num_rows();
            let mut indices: Vec<usize> = (0..rows).collect();
            let key_cols: Vec<&crate::vector::Vector> = self
                .keys
                .iter()
                .map(|k| morsel.column(&k.column))
                .collect::<Result<Vec<_>>>()?;
            indices.sort_by(|&a, &b| {
                for (col, key) in key_cols.iter().zip(&self.keys) {
                    let sa = col.scalar_at(a);
                    let sb = col.scalar_at(b);
                    let ord = match (sa.is_null(), sb.is_null()) {
                        (true, true) => std::cmp::Ordering::Equal,
                        (true, false) => {
                            return if key.nulls == NullsOrder::First {
                                std::cmp::Ordering::Less
                            } else {
                                std::cmp::Ordering::Greater
                            }
                        }
                        (false, true) => {
                            return if key.nulls == NullsOrder::First {
                                std::cmp::Ordering::Greater
                            } else {
                                std::cmp::Ordering::Less
                            }
                        }
                        (false, false) => compare_scalars(&sa, &sb).unwrap_or(std::cmp::Ordering::Equal),
                    };
                    let ord = if key.direction == SortDirection::Descending {
                        ord.reverse()
                    } else {
                        ord
                    };
                    if ord != std::cmp::Ordering::Equal {
                        return ord;
                    }
                }
                std::cmp::Ordering::Equal
            });
            let sorted = morsel.take(&indices.into_iter().map(|i| i as i32).collect::<Vec<_>>());
            self.materialized = Some(vec![sorted].into_iter());
        }
        Ok(self.materialized.as_mut().unwrap().next())
    }

    fn name(&self) -> &'static str {
        "OrderBy"
    }
}
