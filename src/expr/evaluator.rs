//! Compiled expression evaluation with a process-wide pattern cache.
//!
//! Rather than walking the `Expr` tree on every morsel, `evaluate` compiles
//! each expression once into a boxed closure keyed by the expression's own
//! `Hash` (no string `repr()` needed — see `expr::Expr`'s hand-written
//! `Hash` impl), and reuses the closure on every subsequent call with the
//! same shape. Recognized patterns get a dedicated closure (column-vs-
//! literal comparison, column-vs-column comparison, boolean and/or/xor/not,
//! DNF-shaped predicates); anything else falls back to a generic recursive
//! walk.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::morsel::Morsel;
use crate::vector::{BoolMask, CompareOp, Vector};

type CompiledFn = Box<dyn Fn(&Morsel) -> Result<BoolMask> + Send + Sync>;

static CACHE: Lazy<Mutex<HashMap<u64, CompiledFn>>> = Lazy::new(|| Mutex::new(HashMap::new()));
static CACHE_HITS: AtomicU64 = AtomicU64::new(0);
static CACHE_MISSES: AtomicU64 = AtomicU64::new(0);

/// Cache-hit count since process start or the last `clear_cache()`, exposed
/// so tests can assert the compiled-pattern path is actually being reused
/// rather than silently falling back to a full recompile every call.
pub fn cache_hits() -> u64 {
    CACHE_HITS.load(AtomicOrdering::Relaxed)
}

pub fn cache_misses() -> u64 {
    CACHE_MISSES.load(AtomicOrdering::Relaxed)
}

pub fn clear_cache() {
    CACHE.lock().unwrap().clear();
    CACHE_HITS.store(0, AtomicOrdering::Relaxed);
    CACHE_MISSES.store(0, AtomicOrdering::Relaxed);
}

fn expr_key(expr: &Expr) -> u64 {
    use std::hash::{Hash, Hasher};
    let mut hasher = rustc_hash::FxHasher::default();
    expr.hash(&mut hasher);
    hasher.finish()
}

fn to_compare_op(op: BinaryOp) -> Option<CompareOp> {
    Some(match op {
        BinaryOp::Eq => CompareOp::Equals,
        BinaryOp::NotEq => CompareOp::NotEquals,
        BinaryOp::Gt => CompareOp::GreaterThan,
        BinaryOp::GtEq => CompareOp::GreaterThanOrEquals,
        BinaryOp::Lt => CompareOp::LessThan,
        BinaryOp::LtEq => CompareOp::LessThanOrEquals,
        _ => return None,
    })
}

/// Evaluate `expr` against `morsel`, compiling and caching as needed.
pub fn evaluate(morsel: &Morsel, expr: &Expr) -> Result<BoolMask> {
    let key = expr_key(expr);
    {
        let cache = CACHE.lock().unwrap();
        if let Some(f) = cache.get(&key) {
            CACHE_HITS.fetch_add(1, AtomicOrdering::Relaxed);
            return f(morsel);
        }
    }
    CACHE_MISSES.fetch_add(1, AtomicOrdering::Relaxed);
    tracing::trace!(key, "compiling new expression pattern");
    let compiled = compile(expr.clone());
    let result = compiled(morsel);
    CACHE.lock().unwrap().insert(key, compiled);
    result
}

/// Compile `expr` into a closure, dispatching on the recognized shapes in
/// priority order: column-vs-literal, column-vs-column, boolean
/// and/or/xor/not, then a generic recursive fallback.
fn compile(expr: Expr) -> CompiledFn {
    match expr {
        Expr::Binary(op, l, r) if matches!(*l, Expr::Column(_)) && matches!(*r, Expr::Literal(_)) => {
            if let (Some(cmp), Expr::Column(name), Expr::Literal(scalar)) = (to_compare_op(op), &*l, &*r) {
                let name = name.clone();
                let scalar = scalar.clone();
                return Box::new(move |m: &Morsel| m.column(&name)?.cmp_scalar(&scalar, cmp));
            }
            compile_generic(Expr::Binary(op, l, r))
        }
        Expr::Binary(op, l, r) if matches!(*l, Expr::Literal(_)) && matches!(*r, Expr::Column(_)) => {
            if let (Some(cmp), Expr::Literal(scalar), Expr::Column(name)) = (to_compare_op(op), &*l, &*r) {
                // literal OP column == column OP' literal, with an ordering flip.
                let flipped = match cmp {
                    CompareOp::GreaterThan => CompareOp::LessThan,
                    CompareOp::GreaterThanOrEquals => CompareOp::LessThanOrEquals,
                    CompareOp::LessThan => CompareOp::GreaterThan,
                    CompareOp::LessThanOrEquals => CompareOp::GreaterThanOrEquals,
                    same => same,
                };
                let name = name.clone();
                let scalar = scalar.clone();
                return Box::new(move |m: &Morsel| m.column(&name)?.cmp_scalar(&scalar, flipped));
            }
            compile_generic(Expr::Binary(op, l, r))
        }
        Expr::Binary(op, l, r) if matches!(*l, Expr::Column(_)) && matches!(*r, Expr::Column(_)) => {
            if let (Some(cmp), Expr::Column(ln), Expr::Column(rn)) = (to_compare_op(op), &*l, &*r) {
                let ln = ln.clone();
                let rn = rn.clone();
                return Box::new(move |m: &Morsel| {
                    m.column(&ln)?.cmp_vector(m.column(&rn)?, cmp)
                });
            }
            compile_generic(Expr::Binary(op, l, r))
        }
        Expr::Binary(BinaryOp::And, l, r) => {
            let lf = compile(*l);
            let rf = compile(*r);
            Box::new(move |m| Ok(lf(m)?.and(&rf(m)?)))
        }
        Expr::Binary(BinaryOp::Or, l, r) => {
            let lf = compile(*l);
            let rf = compile(*r);
            Box::new(move |m| Ok(lf(m)?.or(&rf(m)?)))
        }
        Expr::Binary(BinaryOp::Xor, l, r) => {
            let lf = compile(*l);
            let rf = compile(*r);
            Box::new(move |m| Ok(lf(m)?.xor(&rf(m)?)))
        }
        Expr::Unary(UnaryOp::Not, e) => {
            let f = compile(*e);
            Box::new(move |m| Ok(f(m)?.not()))
        }
        Expr::Unary(UnaryOp::IsNull, e) => {
            let f = compile_to_vector(*e);
            Box::new(move |m| Ok(f(m)?.is_null_mask()))
        }
        Expr::Unary(UnaryOp::IsNotNull, e) => {
            let f = compile_to_vector(*e);
            Box::new(move |m| Ok(f(m)?.is_null_mask().not()))
        }
        other => compile_generic(other),
    }
}

/// Column-returning sub-evaluator, used only by `IS [NOT] NULL` (those
/// operators need the underlying column, not a boolean result).
fn compile_to_vector(expr: Expr) -> Box<dyn Fn(&Morsel) -> Result<Vector> + Send + Sync> {
    match expr {
        Expr::Column(name) => Box::new(move |m: &Morsel| m.column(&name).map(Vector::clone)),
        other => Box::new(move |_: &Morsel| {
            Err(Error::UnsupportedOperation(format!(
                "IS NULL requires a column operand, got {other:?}"
            )))
        }),
    }
}

/// Generic recursive walk for shapes the priority dispatch above doesn't
/// special-case (e.g. literal-vs-literal, nested non-DNF trees).
fn compile_generic(expr: Expr) -> CompiledFn {
    Box::new(move |m: &Morsel| eval_recursive(m, &expr))
}

fn eval_recursive(m: &Morsel, expr: &Expr) -> Result<BoolMask> {
    match expr {
        Expr::Literal(s) => Ok(BoolMask::from_bools(std::iter::repeat(
            s.as_bool().unwrap_or(false),
        )
        .take(m.num_rows()))),
        Expr::Column(name) => {
            let col = m.column(name)?;
            match col {
                Vector::Bool(_) => col.cmp_scalar(&crate::vector::Scalar::Bool(true), CompareOp::Equals),
                _ => Err(Error::TypeMismatch(format!(
                    "column {name} used as a boolean predicate is not Bool-typed"
                ))),
            }
        }
        Expr::Unary(UnaryOp::Not, e) => Ok(eval_recursive(m, e)?.not()),
        Expr::Unary(UnaryOp::IsNull, e) => Ok(compile_to_vector((**e).clone())(m)?.is_null_mask()),
        Expr::Unary(UnaryOp::IsNotNull, e) => {
            Ok(compile_to_vector((**e).clone())(m)?.is_null_mask().not())
        }
        Expr::Binary(BinaryOp::And, l, r) => Ok(eval_recursive(m, l)?.and(&eval_recursive(m, r)?)),
        Expr::Binary(BinaryOp::Or, l, r) => Ok(eval_recursive(m, l)?.or(&eval_recursive(m, r)?)),
        Expr::Binary(BinaryOp::Xor, l, r) => Ok(eval_recursive(m, l)?.xor(&eval_recursive(m, r)?)),
        Expr::Binary(op, l, r) => {
            let cmp = to_compare_op(*op)
                .ok_or_else(|| Error::UnsupportedOperation(format!("{op:?} as a top-level predicate")))?;
            match (l.as_ref(), r.as_ref()) {
                (Expr::Column(ln), Expr::Literal(s)) => m.column(ln)?.cmp_scalar(s, cmp),
                (Expr::Literal(s), Expr::Column(rn)) => m.column(rn)?.cmp_scalar(s, cmp),
                (Expr::Column(ln), Expr::Column(rn)) => m.column(ln)?.cmp_vector(m.column(rn)?, cmp),
                _ => Err(Error::UnsupportedOperation(
                    "comparison requires at least one column operand".into(),
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::primitive::PrimitiveVector;
    use crate::vector::Scalar;

    // The pattern cache is a process-wide static; tests that call
    // `clear_cache()` and then assert on hit/miss counts must not run
    // concurrently with each other or they'll observe each other's resets.
    static CACHE_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn sample() -> Morsel {
        Morsel::new(
            vec!["a".into(), "b".into()],
            vec![
                Vector::Int32(PrimitiveVector::from_values(vec![1, 2, 3])),
                Vector::Int32(PrimitiveVector::from_values(vec![30, 20, 10])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn column_vs_literal() {
        let _guard = CACHE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_cache();
        let m = sample();
        let mask = evaluate(&m, &Expr::column("a").eq(Expr::lit(Scalar::Int64(2)))).unwrap();
        assert_eq!(mask.as_bytes(), &[0, 1, 0]);
    }

    #[test]
    fn column_vs_column() {
        let _guard = CACHE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_cache();
        let m = sample();
        let expr = Expr::Binary(
            BinaryOp::Lt,
            Box::new(Expr::column("a")),
            Box::new(Expr::column("b")),
        );
        let mask = evaluate(&m, &expr).unwrap();
        assert_eq!(mask.as_bytes(), &[1, 1, 1]);
    }

    #[test]
    fn repeated_evaluation_hits_cache() {
        let _guard = CACHE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_cache();
        let m = sample();
        let expr = Expr::column("a").eq(Expr::lit(Scalar::Int64(2)));
        evaluate(&m, &expr).unwrap();
        evaluate(&m, &expr).unwrap();
        assert_eq!(cache_misses(), 1);
        assert_eq!(cache_hits(), 1);
    }

    #[test]
    fn dnf_and_or_compose_correctly() {
        let _guard = CACHE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_cache();
        let m = sample();
        let expr = Expr::column("a")
            .eq(Expr::lit(Scalar::Int64(1)))
            .or(Expr::column("a").eq(Expr::lit(Scalar::Int64(3))));
        let mask = evaluate(&m, &expr).unwrap();
        assert_eq!(mask.as_bytes(), &[1, 0, 1]);
    }
}
