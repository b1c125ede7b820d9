//! `SELECT <columns>`: projects/renames columns without touching row count.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::morsel::Morsel;
use crate::operator::Operator;

#[derive(Debug)]
pub struct Projection {
    input: Box<dyn Operator>,
    /// `(source column, output name)` pairs, in output order.
    columns: Vec<(String, String)>,
}

impl Projection {
    pub fn new(input: Box<dyn Operator>, columns: Vec<(String, String)>) -> Self {
        Self { input, columns }
    }

    /// Identity-named projection (no renames), the common case.
    pub fn select(input: Box<dyn Operator>, names: Vec<String>) -> Self {
        let columns = names.iter().map(|n| (n.clone(), n.clone())).collect();
        Self { input, columns }
    }

    /// Two differently-sourced columns resolving to the same output name
    /// (`SELECT a AS x, b AS x`) would silently shadow one another once
    /// looked up by name downstream (spec §4.4.2); reject it up front.
    fn check_output_names_unambiguous(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.columns.len());
        for (_, out) in &self.columns {
            if !seen.insert(out.as_str()) {
                return Err(Error::AmbiguousColumn(out.clone()));
            }
        }
        Ok(())
    }
}

impl Operator for Projection {
    fn next(&mut self) -> Result<Option<Morsel>> {
        self.check_output_names_unambiguous()?;
        let Some(morsel) = self.input.next()? else {
            return Ok(None);
        };
        let sources: Vec<&str> = self.columns.iter().map(|(s, _)| s.as_str()).collect();
        let selected = morsel.select(&sources)?;
        let out_names: Vec<String> = self.columns.iter().map(|(_, o)| o.clone()).collect();
        Ok(Some(selected.rename(out_names)?))
    }

    fn name(&self) -> &'static str {
        "Projection"
    }

    fn config(&self) -> String {
        self.columns
            .iter()
            .map(|(s, o)| if s == o { s.clone() } else { format!("{s} AS {o}") })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::MorselSource;
    use crate::vector::primitive::PrimitiveVector;
    use crate::vector::Vector;

    #[test]
    fn projects_and_renames() {
        let m = Morsel::new(
            vec!["a".into(), "b".into()],
            vec![
                Vector::Int32(PrimitiveVector::from_values(vec![1])),
                Vector::Int32(PrimitiveVector::from_values(vec![2])),
            ],
        )
        .unwrap();
        let mut proj = Projection::new(
            Box::new(MorselSource::new(vec![m])),
            vec![("b".into(), "renamed".into())],
        );
        let out = proj.next().unwrap().unwrap();
        assert_eq!(out.column_names(), &["renamed".to_string()]);
    }

    #[test]
    fn rejects_two_sources_renamed_to_the_same_output() {
        let m = Morsel::new(
            vec!["a".into(), "b".into()],
            vec![
                Vector::Int32(PrimitiveVector::from_values(vec![1])),
                Vector::Int32(PrimitiveVector::from_values(vec![2])),
            ],
        )
        .unwrap();
        let mut proj = Projection::new(
            Box::new(MorselSource::new(vec![m])),
            vec![("a".into(), "x".into()), ("b".into(), "x".into())],
        );
        assert!(matches!(proj.next(), Err(crate::error::Error::AmbiguousColumn(_))));
    }
}
