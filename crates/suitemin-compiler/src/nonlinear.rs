//! Unrelaxed nonlinear objective.
//!
//! For a test `t` covering items `I(t)` the marginal coverage is
//! `Σ_{j ∈ I(t)} Π_{t' ≠ t covers j} (1 - t')`: item `j` only counts for `t`
//! when no other selected test covers it. Per dependent criterion:
//!
//! - inverted:     `t*(1 - c*Σ_j Π(1 - t'))`, plain `t` when `I(t)` is empty
//! - not inverted: `t*(c*Σ_j Π(1 - t'))`, nothing when `I(t)` is empty
//!
//! with `c = round(1/q, 6)`.

use std::collections::HashMap;

use suitemin_ir::record::RecordSet;
use suitemin_ir::types::RelativeCriterion;
use suitemin_ir::TestId;

use crate::compile::CompileError;
use crate::expr::Expr;
use crate::model::{TestUniverse, Var};
use crate::number::round6;
use crate::universe::coverage;

pub fn nonlinear_objective(
    criteria: &[RelativeCriterion],
    records: &RecordSet,
    universe: &TestUniverse,
) -> Result<Expr, CompileError> {
    let mut parts = Vec::with_capacity(criteria.len());
    for crio in criteria {
        if !crio.is_dependent {
            return Err(CompileError::UnsupportedNonlinearIndependent {
                file: crio.file.clone(),
            });
        }
        let criterion = criterion_expr(crio, records, universe)?;
        parts.push(if crio.weight == 1 {
            criterion
        } else {
            Expr::product(vec![Expr::constant(crio.weight as f64), criterion])
        });
    }
    Ok(Expr::sum(parts))
}

fn criterion_expr(
    crio: &RelativeCriterion,
    records: &RecordSet,
    universe: &TestUniverse,
) -> Result<Expr, CompileError> {
    let table = coverage(records, &crio.file)?;
    let q = table.distinct_items();
    let unit = if q == 0 { 0.0 } else { round6(1.0 / q as f64) };

    let rows: Vec<(&TestId, &[String])> = table
        .iter()
        .filter(|(test, _)| universe.contains(test))
        .collect();
    let mut covering: HashMap<&str, Vec<&TestId>> = HashMap::new();
    for (test, items) in &rows {
        for item in *items {
            covering.entry(item.as_str()).or_default().push(*test);
        }
    }

    let mut terms = Vec::with_capacity(rows.len());
    for (test, items) in &rows {
        let marginal: Vec<Expr> = items
            .iter()
            .map(|item| {
                let others: Vec<Expr> = covering
                    .get(item.as_str())
                    .into_iter()
                    .flatten()
                    .filter(|other| **other != *test)
                    .map(|other| Expr::complement(Expr::var(Var::test(other))))
                    .collect();
                if others.is_empty() {
                    Expr::constant(1.0)
                } else {
                    Expr::product(others)
                }
            })
            .collect();

        let selected = Expr::var(Var::test(test));
        if marginal.is_empty() {
            if crio.invert {
                terms.push(selected);
            }
            continue;
        }
        let scaled = Expr::product(vec![Expr::constant(unit), Expr::sum(marginal)]);
        let factor = if crio.invert {
            Expr::difference(Expr::constant(1.0), scaled)
        } else {
            scaled
        };
        terms.push(Expr::product(vec![selected, factor]));
    }

    tracing::debug!(file = %crio.file, terms = terms.len(), "nonlinear criterion");
    Ok(Expr::sum(terms))
}
