//! `SHOW COLUMNS`: reports name/type/nullability for one materialized
//! schema, with no underlying data pulled.

use crate::error::Result;
use crate::morsel::Morsel;
use crate::operator::Operator;
use crate::vector::varwidth::VarWidthVector;
use crate::vector::{BoolVector, Vector};

#[derive(Debug)]
pub struct ShowColumns {
    schema: Vec<(String, &'static str, bool)>,
    emitted: bool,
}

impl ShowColumns {
    pub fn from_morsel(morsel: &Morsel) -> Self {
        let schema = morsel
            .column_names()
            .iter()
            .zip(morsel.columns())
            .map(|(n, c)| (n.clone(), c.data_type_name(), c.null_count() > 0))
            .collect();
        Self { schema, emitted: false }
    }
}

impl Operator for ShowColumns {
    fn next(&mut self) -> Result<Option<Morsel>> {
        if self.emitted {
            return Ok(None);
        }
        self.emitted = true;
        let names = VarWidthVector::from_options(self.schema.iter().map(|(n, _, _)| Some(n.as_bytes())));
        let types = VarWidthVector::from_options(self.schema.iter().map(|(_, t, _)| Some(t.as_bytes())));
        let nullable = BoolVector::from_options(self.schema.iter().map(|(_, _, n)| Some(*n)));
        Ok(Some(Morsel::new(
            vec!["column_name".into(), "column_type".into(), "nullable".into()],
            vec![Vector::String(names), Vector::String(types), Vector::Bool(nullable)],
        )?))
    }

    fn name(&self) -> &'static str {
        "ShowColumns"
    }
}
