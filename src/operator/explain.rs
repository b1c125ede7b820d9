//! `EXPLAIN`: renders an operator tree's `name()`/`config()` chain as text,
//! without running the pipeline.

use crate::error::Result;
use crate::morsel::Morsel;
use crate::operator::Operator;
use crate::vector::varwidth::VarWidthVector;
use crate::vector::Vector;

/// One row of an `EXPLAIN` plan tree, serializable for `EXPLAIN (FORMAT JSON)`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlanNode {
    pub depth: usize,
    pub name: &'static str,
    pub config: String,
}

#[derive(Debug)]
pub struct Explain {
    nodes: Vec<PlanNode>,
    emitted: bool,
}

impl Explain {
    /// `tree` lists operators from the root (output) down to the leaves, the
    /// order a plan builder naturally produces while wrapping each stage.
    pub fn new(tree: &[&dyn Operator]) -> Self {
        let nodes = tree
            .iter()
            .enumerate()
            .map(|(depth, op)| PlanNode {
                depth,
                name: op.name(),
                config: op.config(),
            })
            .collect();
        Self { nodes, emitted: false }
    }

    fn lines(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|n| {
                let indent = "  ".repeat(n.depth);
                if n.config.is_empty() {
                    format!("{indent}{}", n.name)
                } else {
                    format!("{indent}{} ({})", n.name, n.config)
                }
            })
            .collect()
    }

    /// Render the plan as a JSON array of `{depth, name, config}` objects,
    /// for `EXPLAIN (FORMAT JSON)`-style output.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.nodes).map_err(|e| {
            crate::error::Error::TypeMismatch(format!("plan is not JSON-serializable: {e}"))
        })
    }
}

impl Operator for Explain {
    fn next(&mut self) -> Result<Option<Morsel>> {
        if self.emitted {
            return Ok(None);
        }
        self.emitted = true;
        let lines = self.lines();
        let plan = VarWidthVector::from_options(lines.iter().map(|l| Some(l.as_bytes())));
        Ok(Some(Morsel::new(vec!["plan".into()], vec![Vector::String(plan)])?))
    }

    fn name(&self) -> &'static str {
        "Explain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::MorselSource;

    #[test]
    fn renders_one_line_per_operator_indented_by_depth() {
        let leaf = MorselSource::new(Vec::new());
        let mut explain = Explain::new(&[&leaf]);
        let morsel = explain.next().unwrap().unwrap();
        let Vector::String(v) = morsel.column("plan").unwrap() else { panic!() };
        assert_eq!(v.value(0), b"MorselSource");
    }

    #[test]
    fn json_plan_round_trips_through_serde_json() {
        let leaf = MorselSource::new(Vec::new());
        let explain = Explain::new(&[&leaf]);
        let json: &'static str = Box::leak(explain.to_json().unwrap().into_boxed_str());
        let parsed: Vec<PlanNode> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "MorselSource");
        assert_eq!(parsed[0].depth, 0);
    }
}
