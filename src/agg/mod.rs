//! C6: aggregation accumulators, shared by grouped and scalar (no `GROUP
//! BY`) aggregation.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::morsel::Morsel;
use crate::vector::builder::GrowableBuilder;
use crate::vector::primitive::PrimitiveVector;
use crate::vector::scalar::compare_scalars;
use crate::vector::{Scalar, Vector};

/// The closed set of supported aggregate functions (spec §4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggFunc {
    Count,
    CountDistinct,
    Sum,
    Min,
    Max,
    Avg,
    Any,
    All,
    /// Collects every non-null input value into one list per group.
    List,
    /// Like `List`, but deduplicated by row hash (`array_agg(DISTINCT x)`).
    Distinct,
}

/// One aggregate clause: `func(column)`, or `COUNT(*)` when `column` is `None`.
#[derive(Clone, Debug)]
pub struct AggExpr {
    pub func: AggFunc,
    pub column: Option<String>,
    pub output_name: String,
}

/// Running accumulator state for a single group and a single `AggExpr`.
#[derive(Debug)]
enum AccState {
    Count(i64),
    CountDistinct(std::collections::HashSet<u64>),
    Sum { total: f64, seen_any: bool },
    MinMax { best: Option<f64>, is_min: bool },
    BoolReduce { acc: bool, is_any: bool },
    Avg { sum: f64, count: i64 },
    List(Vec<Scalar>),
    Distinct { items: Vec<Scalar>, seen: std::collections::HashSet<u64> },
}

/// What `AccState::finish` produces: most aggregates collapse to one
/// `Scalar`, but `LIST` produces the group's whole collected value run.
enum AccResult {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl AccState {
    fn new(func: AggFunc) -> Self {
        match func {
            AggFunc::Count => AccState::Count(0),
            AggFunc::CountDistinct => AccState::CountDistinct(Default::default()),
            AggFunc::Sum => AccState::Sum { total: 0.0, seen_any: false },
            AggFunc::Min => AccState::MinMax { best: None, is_min: true },
            AggFunc::Max => AccState::MinMax { best: None, is_min: false },
            AggFunc::Avg => AccState::Avg { sum: 0.0, count: 0 },
            AggFunc::Any => AccState::BoolReduce { acc: false, is_any: true },
            AggFunc::All => AccState::BoolReduce { acc: true, is_any: false },
            AggFunc::List => AccState::List(Vec::new()),
            AggFunc::Distinct => AccState::Distinct { items: Vec::new(), seen: Default::default() },
        }
    }

    fn update(&mut self, scalar: &Scalar, row_hash: u64) {
        match self {
            AccState::Count(c) => {
                if !scalar.is_null() {
                    *c += 1;
                }
            }
            AccState::CountDistinct(seen) => {
                if !scalar.is_null() {
                    seen.insert(row_hash);
                }
            }
            AccState::Sum { total, seen_any } => {
                if let Some(v) = scalar.as_f64() {
                    *total += v;
                    *seen_any = true;
                }
            }
            AccState::MinMax { best, is_min } => {
                if let Some(v) = scalar.as_f64() {
                    *best = Some(match *best {
                        None => v,
                        Some(b) if *is_min => b.min(v),
                        Some(b) => b.max(v),
                    });
                }
            }
            AccState::Avg { sum, count } => {
                if let Some(v) = scalar.as_f64() {
                    *sum += v;
                    *count += 1;
                }
            }
            AccState::BoolReduce { acc, is_any } => {
                if let Some(b) = scalar.as_bool() {
                    *acc = if *is_any { *acc || b } else { *acc && b };
                }
            }
            AccState::List(items) => {
                if !scalar.is_null() {
                    items.push(scalar.clone());
                }
            }
            AccState::Distinct { items, seen } => {
                if !scalar.is_null() && seen.insert(row_hash) {
                    items.push(scalar.clone());
                }
            }
        }
    }

    fn finish(self) -> AccResult {
        match self {
            AccState::Count(c) => AccResult::Scalar(Scalar::Int64(c)),
            AccState::CountDistinct(seen) => AccResult::Scalar(Scalar::Int64(seen.len() as i64)),
            AccState::Sum { total, seen_any } => AccResult::Scalar(if seen_any {
                Scalar::Float64(total)
            } else {
                Scalar::Null
            }),
            AccState::MinMax { best, .. } => AccResult::Scalar(best.map_or(Scalar::Null, Scalar::Float64)),
            AccState::Avg { sum, count } => AccResult::Scalar(if count == 0 {
                Scalar::Null
            } else {
                Scalar::Float64(sum / count as f64)
            }),
            AccState::BoolReduce { acc, .. } => AccResult::Scalar(Scalar::Bool(acc)),
            AccState::List(items) => AccResult::List(items),
            AccState::Distinct { items, .. } => AccResult::List(items),
        }
    }
}

/// True if two group-key tuples are the same group, cell by cell. NULLs
/// group with each other (standard `GROUP BY` semantics), unlike a join's
/// configurable `NullMode`.
fn keys_equal(a: &[Scalar], b: &[Scalar]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| compare_scalars(x, y) == Some(std::cmp::Ordering::Equal))
}

/// Aggregation state keyed by group-key hash, for grouped `GROUP BY`
/// pipelines with no fixed final row count known ahead of time. Slots are
/// stored in first-seen order in `group_keys`/`accumulators`; `slots_by_hash`
/// maps a row hash to every slot that has ever hashed to it, so a hash
/// collision between two distinct key tuples chains a second slot onto the
/// same bucket instead of corrupting the first group's accumulators (spec
/// §4.6 step 3).
pub struct GroupState {
    slots_by_hash: HashMap<u64, Vec<usize>>,
    group_keys: Vec<Vec<Scalar>>,
    accumulators: Vec<Vec<AccState>>,
    exprs: Vec<AggExpr>,
}

impl GroupState {
    pub fn new(exprs: Vec<AggExpr>) -> Self {
        Self {
            slots_by_hash: HashMap::new(),
            group_keys: Vec::new(),
            accumulators: Vec::new(),
            exprs,
        }
    }

    /// Fold one morsel's rows into the running per-group accumulators.
    pub fn consume(&mut self, morsel: &Morsel, key_columns: &[&str]) -> Result<()> {
        let hashes = morsel.hash(Some(key_columns))?;
        let key_values: Vec<Vec<Scalar>> = (0..morsel.num_rows())
            .map(|row| {
                key_columns
                    .iter()
                    .map(|&name| morsel.column(name).unwrap().scalar_at(row))
                    .collect()
            })
            .collect();

        let columns: Vec<Option<&Vector>> = self
            .exprs
            .iter()
            .map(|e| e.column.as_deref().map(|n| morsel.column(n)).transpose())
            .collect::<Result<Vec<_>>>()?;

        for row in 0..morsel.num_rows() {
            let h = hashes[row];
            let key = &key_values[row];
            // A hash match only proves equal hashes; re-compare the actual
            // key tuple against every slot already chained onto this bucket
            // before trusting it's the same group.
            let existing = self
                .slots_by_hash
                .get(&h)
                .and_then(|candidates| candidates.iter().copied().find(|&s| keys_equal(&self.group_keys[s], key)));
            let slot = match existing {
                Some(s) => s,
                None => {
                    let s = self.group_keys.len();
                    self.group_keys.push(key.clone());
                    self.accumulators.push(self.exprs.iter().map(|e| AccState::new(e.func)).collect());
                    self.slots_by_hash.entry(h).or_default().push(s);
                    s
                }
            };
            let accs = &mut self.accumulators[slot];
            for (i, expr) in self.exprs.iter().enumerate() {
                let scalar = match expr.func {
                    AggFunc::Count if expr.column.is_none() => Scalar::Int64(1),
                    _ => columns[i].map_or(Scalar::Null, |c| c.scalar_at(row)),
                };
                let row_hash = columns[i].map_or(0, |c| {
                    let mut buf = vec![0u64; 1];
                    c.slice(row, 1).hash_into(&mut buf, 0);
                    buf[0]
                });
                accs[i].update(&scalar, row_hash);
            }
        }
        Ok(())
    }

    /// Materialize one output row per distinct group key, in first-seen order.
    pub fn finish(self, key_names: &[String]) -> Result<Morsel> {
        let mut names: Vec<String> = key_names.to_vec();
        names.extend(self.exprs.iter().map(|e| e.output_name.clone()));

        let n_groups = self.group_keys.len();
        let mut key_columns: Vec<Vec<Scalar>> = vec![Vec::with_capacity(n_groups); key_names.len()];
        let mut agg_columns: Vec<Vec<AccResult>> = (0..self.exprs.len()).map(|_| Vec::with_capacity(n_groups)).collect();

        for (key, accs) in self.group_keys.into_iter().zip(self.accumulators) {
            for (i, v) in key.into_iter().enumerate() {
                key_columns[i].push(v);
            }
            for (i, acc) in accs.into_iter().enumerate() {
                agg_columns[i].push(acc.finish());
            }
        }

        let mut vectors = Vec::with_capacity(names.len());
        for col in key_columns {
            vectors.push(scalars_to_vector(col)?);
        }
        for results in agg_columns {
            vectors.push(agg_results_to_vector(results)?);
        }
        Morsel::new(names, vectors)
    }
}

/// Builds either a flat scalar column (every non-`LIST` aggregate) or one
/// `List` column row per group (`LIST`), from the per-group finished
/// accumulator results.
fn agg_results_to_vector(results: Vec<AccResult>) -> Result<Vector> {
    let is_list = matches!(results.first(), Some(AccResult::List(_)));
    if !is_list {
        let scalars = results
            .into_iter()
            .map(|r| match r {
                AccResult::Scalar(s) => s,
                AccResult::List(_) => unreachable!("aggregate results must not mix List with scalar"),
            })
            .collect();
        return scalars_to_vector(scalars);
    }
    let mut offsets = vec![0i32];
    let mut valid = Vec::with_capacity(results.len());
    let mut all_values: Vec<Scalar> = Vec::new();
    for r in results {
        let AccResult::List(items) = r else {
            unreachable!("aggregate results must not mix List with scalar");
        };
        all_values.extend(items);
        offsets.push(all_values.len() as i32);
        valid.push(true);
    }
    let child = scalars_to_vector(all_values)?;
    Ok(Vector::List(crate::vector::list_vector::ListVector::new(
        offsets,
        child,
        Some(crate::bitmap::Bitmap::from_bools(valid.into_iter())),
    )))
}

/// Build a `Vector` from a materialized column of `Scalar`s, used only for
/// the small, already-aggregated result columns this module produces.
fn scalars_to_vector(values: Vec<Scalar>) -> Result<Vector> {
    if values.iter().all(|v| matches!(v, Scalar::Bool(_) | Scalar::Null)) {
        return Ok(Vector::Bool(crate::vector::BoolVector::from_options(
            values.into_iter().map(|v| v.as_bool()),
        )));
    }
    if values
        .iter()
        .all(|v| matches!(v, Scalar::Bytes(_) | Scalar::Null))
    {
        return Ok(Vector::String(crate::vector::varwidth::VarWidthVector::from_options(
            values.into_iter().map(|v| v.as_bytes().map(<[u8]>::to_vec)),
        )));
    }
    if values
        .iter()
        .any(|v| matches!(v, Scalar::Float64(_)))
    {
        let mut b: GrowableBuilder<f64> = GrowableBuilder::with_estimate(values.len());
        for v in values {
            match v.as_f64() {
                Some(x) => b.append(x),
                None => b.append_null(),
            }
        }
        return Ok(Vector::Float64(b.finish()));
    }
    let mut b: GrowableBuilder<i64> = GrowableBuilder::with_estimate(values.len());
    for v in values {
        match v {
            Scalar::Null => b.append_null(),
            _ => match v.as_i64() {
                Some(x) => b.append(x),
                None => return Err(Error::TypeMismatch("aggregate result has mixed types".into())),
            },
        }
    }
    Ok(Vector::Int64(b.finish()))
}

/// Degenerate case of `GroupState` with a single implicit group (no `GROUP
/// BY` clause): always produces exactly one output row.
pub fn scalar_aggregate(morsel_stream: &mut dyn FnMut() -> Result<Option<Morsel>>, exprs: Vec<AggExpr>) -> Result<Morsel> {
    // `SELECT COUNT(*)` with no other aggregate doesn't need a per-row
    // accumulator at all: every morsel's row count can just be summed.
    if let [AggExpr { func: AggFunc::Count, column: None, output_name }] = exprs.as_slice() {
        let mut total = 0i64;
        while let Some(morsel) = morsel_stream()? {
            total += morsel.num_rows() as i64;
        }
        return Morsel::new(
            vec![output_name.clone()],
            vec![Vector::Int64(PrimitiveVector::from_values(vec![total]))],
        );
    }

    let mut state = GroupState::new(exprs.clone());
    let mut any_rows = false;
    while let Some(morsel) = morsel_stream()? {
        if morsel.num_rows() == 0 {
            continue;
        }
        any_rows = true;
        // Every row maps to the single implicit group: give it a constant key.
        let tagged = morsel.with_column("__scalar_group__", Vector::Int8(PrimitiveVector::from_values(vec![0i8; morsel.num_rows()])))?;
        state.consume(&tagged, &["__scalar_group__"])?;
    }
    if !any_rows {
        // Nothing ever fed an accumulator, so `GroupState` never created a
        // slot — the implicit group still exists and is reported with every
        // accumulator in its just-initialized state (COUNT = 0, everything
        // else NULL), matching SQL scalar-aggregate semantics over an empty
        // input.
        let vectors = exprs
            .iter()
            .map(|e| agg_results_to_vector(vec![AccState::new(e.func).finish()]))
            .collect::<Result<Vec<_>>>()?;
        return Morsel::new(exprs.iter().map(|e| e.output_name.clone()).collect(), vectors);
    }
    let with_key = state.finish(&["__scalar_group__".to_string()])?;
    with_key.select(
        &exprs
            .iter()
            .map(|e| e.output_name.as_str())
            .collect::<Vec<_>>(),
    )
}
