//! `OFFSET ... LIMIT ...`: truncates the stream at a row budget, skipping a
//! fixed number of leading rows first.

use crate::error::Result;
use crate::morsel::Morsel;
use crate::operator::Operator;

#[derive(Debug)]
pub struct LimitOffset {
    input: Box<dyn Operator>,
    offset: usize,
    limit: Option<usize>,
    seen: usize,
    emitted: usize,
}

impl LimitOffset {
    pub fn new(input: Box<dyn Operator>, offset: usize, limit: Option<usize>) -> Self {
        Self {
            input,
            offset,
            limit,
            seen: 0,
            emitted: 0,
        }
    }
}

impl Operator for LimitOffset {
    fn next(&mut self) -> Result<Option<Morsel>> {
        if let Some(limit) = self.limit {
            if self.emitted >= limit {
                return Ok(None);
            }
        }
        loop {
            let Some(morsel) = self.input.next()? else {
                return Ok(None);
            };
            let rows = morsel.num_rows();
            let window_start = self.seen;
            self.seen += rows;
            if self.seen <= self.offset {
                continue;
            }
            let local_offset = self.offset.saturating_sub(window_start);
            let mut remaining = rows - local_offset;
            if let Some(limit) = self.limit {
                remaining = remaining.min(limit - self.emitted);
            }
            if remaining == 0 {
                continue;
            }
            self.emitted += remaining;
            return Ok(Some(morsel.slice(local_offset, remaining)));
        }
    }

    fn name(&self) -> &'static str {
        "LimitOffset"
    }

    fn config(&self) -> String {
        match self.limit {
            Some(l) => format!("OFFSET {} LIMIT {l}", self.offset),
            None => format!("OFFSET {}", self.offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::MorselSource;
    use crate::vector::primitive::PrimitiveVector;
    use crate::vector::Vector;

    fn morsel(values: Vec<i32>) -> Morsel {
        Morsel::new(vec!["a".into()], vec![Vector::Int32(PrimitiveVector::from_values(values))]).unwrap()
    }

    #[test]
    fn offset_and_limit_span_multiple_morsels() {
        let source = MorselSource::new(vec![morsel(vec![1, 2, 3]), morsel(vec![4, 5, 6])]);
        let mut op = LimitOffset::new(Box::new(source), 2, Some(3));
        let mut total = 0;
        while let Some(m) = op.next().unwrap() {
            total += m.num_rows();
        }
        assert_eq!(total, 3);
    }

    #[test]
    fn offset_past_end_yields_nothing() {
        let source = MorselSource::new(vec![morsel(vec![1, 2])]);
        let mut op = LimitOffset::new(Box::new(source), 10, None);
        assert!(op.next().unwrap().is_none());
    }
}
