//! Absolute criteria → constraints.
//!
//! - cost criteria bound `Σ cost(t)·t` against the configured rhs;
//! - coverage criteria require every item to be covered at least once.

use suitemin_ir::record::RecordSet;
use suitemin_ir::types::AbsoluteCriterion;

use crate::compile::CompileError;
use crate::model::{Constraint, ConstraintSet, LinearExpr, Rhs, TestUniverse, Var};
use crate::universe::{costs, coverage};

pub fn build_constraints(
    criteria: &[AbsoluteCriterion],
    records: &RecordSet,
    universe: &TestUniverse,
) -> Result<ConstraintSet, CompileError> {
    let mut constraints = ConstraintSet::new();
    for crio in criteria {
        let before = constraints.len();
        if crio.is_coefficient {
            if let Some(constraint) = cost_bound(crio, records, universe)? {
                constraints.insert(constraint);
            }
        } else {
            for constraint in set_cover(crio, records, universe)? {
                constraints.insert(constraint);
            }
        }
        tracing::debug!(
            file = %crio.file,
            added = constraints.len() - before,
            "constraint criterion"
        );
    }
    Ok(constraints)
}

/// `Σ cost(t)·t <op> rhs`, `None` when no canonical test has a cost.
fn cost_bound(
    crio: &AbsoluteCriterion,
    records: &RecordSet,
    universe: &TestUniverse,
) -> Result<Option<Constraint>, CompileError> {
    let (Some(op), Some(rhs)) = (crio.crio_type, crio.rhs) else {
        return Err(CompileError::MissingBound {
            file: crio.file.clone(),
        });
    };
    let mut lhs = LinearExpr::new();
    for (test, cost) in costs(records, &crio.file)?.iter() {
        if universe.contains(test) {
            lhs.push(cost, Var::test(test));
        }
    }
    if lhs.is_empty() {
        return Ok(None);
    }
    Ok(Some(Constraint::new(lhs, op, Rhs::Constant(rhs))))
}

/// One `Σ t ≥ 1` per distinct item, items in first-seen order.
fn set_cover(
    crio: &AbsoluteCriterion,
    records: &RecordSet,
    universe: &TestUniverse,
) -> Result<Vec<Constraint>, CompileError> {
    let table = coverage(records, &crio.file)?;
    let rows = table
        .tests_by_item()
        .into_iter()
        .filter_map(|(_, tests)| {
            let tests: Vec<Var> = tests
                .into_iter()
                .filter(|t| universe.contains(t))
                .map(Var::test)
                .collect();
            (!tests.is_empty()).then(|| Constraint::at_least_once(tests))
        })
        .collect();
    Ok(rows)
}
