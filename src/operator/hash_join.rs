//! `INNER`/`LEFT OUTER`/`RIGHT OUTER`/`FULL OUTER` hash join. Blocking on its
//! build side only: the right input is fully consumed into a hash table on
//! the first `next()` call, after which the left input is probed and
//! streamed through. `RIGHT OUTER`/`FULL OUTER` additionally track which
//! build-side rows were ever matched, emitting the unmatched remainder as one
//! final morsel once the left input is exhausted.

use crate::error::Result;
use crate::join::{align_tables, hash_probe, HashBuildSide, NullMode};
use crate::morsel::Morsel;
use crate::operator::{materialize_all, Operator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl JoinKind {
    fn keeps_unmatched_probe_rows(self) -> bool {
        matches!(self, JoinKind::LeftOuter | JoinKind::FullOuter)
    }

    fn keeps_unmatched_build_rows(self) -> bool {
        matches!(self, JoinKind::RightOuter | JoinKind::FullOuter)
    }
}

#[derive(Debug)]
pub struct HashJoin {
    left: Box<dyn Operator>,
    right: Box<dyn Operator>,
    left_keys: Vec<String>,
    right_keys: Vec<String>,
    kind: JoinKind,
    null_mode: NullMode,
    build: Option<(Morsel, HashBuildSide)>,
    seen: Option<Vec<bool>>,
    left_schema: Option<Morsel>,
    left_exhausted: bool,
    tail_emitted: bool,
}

impl HashJoin {
    pub fn new(
        left: Box<dyn Operator>,
        right: Box<dyn Operator>,
        left_keys: Vec<String>,
        right_keys: Vec<String>,
        kind: JoinKind,
        null_mode: NullMode,
    ) -> Self {
        Self {
            left,
            right,
            left_keys,
            right_keys,
            kind,
            null_mode,
            build: None,
            seen: None,
            left_schema: None,
            left_exhausted: false,
            tail_emitted: false,
        }
    }

    fn build_right_side(&mut self) -> Result<()> {
        let combined = materialize_all(&mut *self.right)?;
        let keys: Vec<&str> = self.right_keys.iter().map(String::as_str).collect();
        let built = HashBuildSide::build(&combined, &keys, self.null_mode)?;
        tracing::debug!(rows = combined.num_rows(), keys = ?self.right_keys, "hash join build side materialized");
        if self.kind.keeps_unmatched_build_rows() {
            self.seen = Some(vec![false; combined.num_rows()]);
        }
        self.build = Some((combined, built));
        Ok(())
    }

    /// The one extra morsel `RIGHT OUTER`/`FULL OUTER` emit after the left
    /// input is exhausted: build-side rows no probe ever matched, paired
    /// with an all-null left side.
    fn unmatched_build_tail(&mut self) -> Option<Morsel> {
        let seen = self.seen.as_ref()?;
        let right_tail: Vec<i32> = seen
            .iter()
            .enumerate()
            .filter_map(|(i, &matched)| (!matched).then_some(i as i32))
            .collect();
        let (right_side, _) = self.build.as_ref().unwrap();
        let left_shape = self.left_schema.clone().unwrap_or_else(Morsel::empty);
        let left_tail = vec![-1i32; right_tail.len()];
        Some(align_tables(&left_shape, right_side, &left_tail, &right_tail).unwrap())
    }
}

impl Operator for HashJoin {
    fn next(&mut self) -> Result<Option<Morsel>> {
        if self.build.is_none() {
            self.build_right_side()?;
        }
        if self.left_exhausted {
            if self.tail_emitted {
                return Ok(None);
            }
            self.tail_emitted = true;
            return Ok(self.unmatched_build_tail());
        }
        let Some(left_morsel) = self.left.next()? else {
            self.left_exhausted = true;
            return self.next();
        };
        if self.left_schema.is_none() {
            self.left_schema = Some(left_morsel.slice(0, 0));
        }
        let (right_side, built) = self.build.as_ref().unwrap();
        let keys: Vec<&str> = self.left_keys.iter().map(String::as_str).collect();
        let (right_idx, left_idx) = hash_probe(built, &left_morsel, &keys, self.kind.keeps_unmatched_probe_rows())?;
        if let Some(seen) = self.seen.as_mut() {
            for &r in &right_idx {
                if r >= 0 {
                    seen[r as usize] = true;
                }
            }
        }
        Ok(Some(align_tables(&left_morsel, right_side, &left_idx, &right_idx)?))
    }

    fn name(&self) -> &'static str {
        "HashJoin"
    }

    fn config(&self) -> String {
        format!(
            "{:?} ON {} = {}",
            self.kind,
            self.left_keys.join(","),
            self.right_keys.join(",")
        )
    }
}
