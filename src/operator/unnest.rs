//! `CROSS JOIN UNNEST` / `LEFT JOIN UNNEST`: expands a `List` column into one
//! output row per element, duplicating the rest of the row alongside each
//! element (spec reference semantics, grounded on the source system's
//! `align_tables` unnest usage).

use crate::error::Result;
use crate::morsel::Morsel;
use crate::operator::Operator;
use crate::vector::Vector;

#[derive(Debug)]
pub struct Unnest {
    input: Box<dyn Operator>,
    list_column: String,
    output_name: String,
    /// LEFT UNNEST keeps a null-padded row for an empty/null list instead of
    /// dropping it.
    outer: bool,
}

impl Unnest {
    pub fn new(input: Box<dyn Operator>, list_column: String, output_name: String, outer: bool) -> Self {
        Self {
            input,
            list_column,
            output_name,
            outer,
        }
    }
}

impl Operator for Unnest {
    fn next(&mut self) -> Result<Option<Morsel>> {
        loop {
            let Some(morsel) = self.input.next()? else {
                return Ok(None);
            };
            let Vector::List(list) = morsel.column(&self.list_column)? else {
                return Err(crate::error::Error::TypeMismatch(format!(
                    "{} is not a List column",
                    self.list_column
                )));
            };
            let mut source_rows = Vec::new();
            let mut pieces: Vec<Vector> = Vec::new();
            for row in 0..morsel.num_rows() {
                let empty_or_null = !list.is_valid(row) || list.offsets[row] == list.offsets[row + 1];
                if empty_or_null {
                    if self.outer {
                        // One null output row in place, not appended at the
                        // end, so it lines up with `base`'s row order.
                        source_rows.push(row as i32);
                        pieces.push(list.child.take(&[-1]));
                    }
                    continue;
                }
                let piece = list.row(row);
                for _ in 0..piece.length() {
                    source_rows.push(row as i32);
                }
                pieces.push(piece);
            }
            if source_rows.is_empty() {
                continue;
            }
            let base = morsel.take(&source_rows);
            let flattened = pieces.into_iter().reduce(|acc, p| acc.concat(&p)).unwrap();
            let out = base.with_column(self.output_name.clone(), flattened)?;
            return Ok(Some(out));
        }
    }

    fn name(&self) -> &'static str {
        "Unnest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Bitmap;
    use crate::operator::MorselSource;
    use crate::vector::list_vector::ListVector;
    use crate::vector::primitive::PrimitiveVector;

    /// Row 0: [1, 2], row 1: [] (empty), row 2: [3]. LEFT JOIN UNNEST must
    /// keep a null-padded row for row 1 in its original position, not at
    /// the end of the output.
    fn morsel_with_gap() -> Morsel {
        let child = Vector::Int32(PrimitiveVector::from_values(vec![1, 2, 3]));
        let list = ListVector::new(vec![0, 2, 2, 3], child, Some(Bitmap::from_bools([true, true, true].into_iter())));
        Morsel::new(
            vec!["id".into(), "items".into()],
            vec![
                Vector::Int32(PrimitiveVector::from_values(vec![10, 20, 30])),
                Vector::List(list),
            ],
        )
        .unwrap()
    }

    #[test]
    fn inner_unnest_drops_the_empty_row() {
        let mut unnest = Unnest::new(
            Box::new(MorselSource::new(vec![morsel_with_gap()])),
            "items".into(),
            "item".into(),
            false,
        );
        let out = unnest.next().unwrap().unwrap();
        let Vector::Int32(ids) = out.column("id").unwrap() else { panic!() };
        assert_eq!(&*ids.data, &[10, 10, 30]);
    }

    #[test]
    fn outer_unnest_keeps_the_empty_row_in_place_with_a_null() {
        let mut unnest = Unnest::new(
            Box::new(MorselSource::new(vec![morsel_with_gap()])),
            "items".into(),
            "item".into(),
            true,
        );
        let out = unnest.next().unwrap().unwrap();
        let Vector::Int32(ids) = out.column("id").unwrap() else { panic!() };
        assert_eq!(&*ids.data, &[10, 10, 20, 30]);
        let Vector::Int32(items) = out.column("item").unwrap() else { panic!() };
        assert!(!items.is_valid(2));
        assert_eq!(items.data[0], 1);
        assert_eq!(items.data[1], 2);
        assert_eq!(items.data[3], 3);
    }
}
