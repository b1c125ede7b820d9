//! `DISTINCT`: drops rows whose key-column hash has already been seen.
//!
//! Hash-based deduplication can collide; this operator trades the vanishing
//! chance of a false-duplicate against the O(1) per-row cost. `idempotence`
//! holds regardless (re-running DISTINCT on already-distinct output changes
//! nothing).

use std::collections::HashSet;

use crate::error::Result;
use crate::morsel::Morsel;
use crate::operator::Operator;

#[derive(Debug)]
pub struct Distinct {
    input: Box<dyn Operator>,
    key_columns: Option<Vec<String>>,
    seen: HashSet<u64>,
}

impl Distinct {
    pub fn new(input: Box<dyn Operator>, key_columns: Option<Vec<String>>) -> Self {
        Self {
            input,
            key_columns,
            seen: HashSet::new(),
        }
    }
}

impl Operator for Distinct {
    fn next(&mut self) -> Result<Option<Morsel>> {
        loop {
            let Some(morsel) = self.input.next()? else {
                return Ok(None);
            };
            let keys: Option<Vec<&str>> = self
                .key_columns
                .as_ref()
                .map(|cols| cols.iter().map(String::as_str).collect());
            let hashes = morsel.hash(keys.as_deref())?;
            let keep: Vec<i32> = hashes
                .iter()
                .enumerate()
                .filter_map(|(i, &h)| self.seen.insert(h).then_some(i as i32))
                .collect();
            if keep.is_empty() {
                continue;
            }
            return Ok(Some(morsel.take(&keep)));
        }
    }

    fn name(&self) -> &'static str {
        "Distinct"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::MorselSource;
    use crate::vector::primitive::PrimitiveVector;
    use crate::vector::Vector;

    #[test]
    fn drops_repeats_across_morsels() {
        let m1 = Morsel::new(vec!["a".into()], vec![Vector::Int32(PrimitiveVector::from_values(vec![1, 2, 1]))]).unwrap();
        let m2 = Morsel::new(vec!["a".into()], vec![Vector::Int32(PrimitiveVector::from_values(vec![2, 3]))]).unwrap();
        let mut distinct = Distinct::new(Box::new(MorselSource::new(vec![m1, m2])), None);
        let first = distinct.next().unwrap().unwrap();
        assert_eq!(first.num_rows(), 2); // 1, 2
        let second = distinct.next().unwrap().unwrap();
        assert_eq!(second.num_rows(), 1); // 3
        assert!(distinct.next().unwrap().is_none());
    }

    #[test]
    fn idempotent_on_already_distinct_input() {
        let m = Morsel::new(vec!["a".into()], vec![Vector::Int32(PrimitiveVector::from_values(vec![1, 2, 3]))]).unwrap();
        let mut once = Distinct::new(Box::new(MorselSource::new(vec![m.clone()])), None);
        let r1 = once.next().unwrap().unwrap();
        let mut twice = Distinct::new(Box::new(MorselSource::new(vec![r1.clone()])), None);
        let r2 = twice.next().unwrap().unwrap();
        assert_eq!(r1.num_rows(), r2.num_rows());
    }
}
