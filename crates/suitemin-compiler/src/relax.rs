//! Linear relaxation of the coverage objective.
//!
//! Coverage is an OR over the selected tests: an item covered by three
//! selected tests counts once. Each (test, item) edge of a dependent
//! criterion gets an auxiliary 0/1 variable `v_<prefix>_<test>_<item>` with
//!
//! - `v ≤ t`                    (credit only from a selected test)
//! - `Σ_{t covers item} v ≤ 1`  (an item is credited at most once)
//!
//! The objective carries `±weight·round(1/q)` per auxiliary, plus a flat
//! `weight` on every test for inverted criteria.

use std::collections::HashMap;

use suitemin_ir::record::RecordSet;
use suitemin_ir::types::{Comparison, RelativeCriterion};

use crate::compile::CompileError;
use crate::model::{
    AuxVar, CoefficientTable, Constraint, ConstraintSet, LinearExpr, Rhs, TestUniverse, Var,
};
use crate::number::round6;
use crate::objective::{criterion_coefficient, criterion_ratios};
use crate::prefix::PrefixAllocator;
use crate::universe::coverage;

#[derive(Debug, Clone)]
pub struct RelaxedObjective {
    pub coefficients: CoefficientTable,
    pub constraints: ConstraintSet,
}

pub fn relaxed_objective(
    criteria: &[RelativeCriterion],
    records: &RecordSet,
    universe: &TestUniverse,
    seed: Option<u64>,
) -> Result<RelaxedObjective, CompileError> {
    let mut coefficients = CoefficientTable::new();
    let mut constraints = ConstraintSet::new();
    let mut prefixes = PrefixAllocator::new(seed);

    for (index, crio) in criteria.iter().enumerate() {
        let prefix = prefixes.next(index as u64);
        if crio.is_dependent {
            relax_dependent(
                crio,
                &prefix,
                records,
                universe,
                &mut coefficients,
                &mut constraints,
            )?;
        } else {
            // Scalar criteria are already linear.
            for (test, ratio) in criterion_ratios(crio, records, universe)? {
                let term = crio.weight as f64 * criterion_coefficient(crio, ratio);
                coefficients.add(Var::test(test), term);
            }
        }
    }

    Ok(RelaxedObjective {
        coefficients,
        constraints,
    })
}

fn relax_dependent(
    crio: &RelativeCriterion,
    prefix: &str,
    records: &RecordSet,
    universe: &TestUniverse,
    coefficients: &mut CoefficientTable,
    constraints: &mut ConstraintSet,
) -> Result<(), CompileError> {
    let table = coverage(records, &crio.file)?;
    let q = table.distinct_items();
    let unit = if q == 0 { 0.0 } else { round6(1.0 / q as f64) };
    let per_aux = if crio.invert { -unit } else { unit };
    let weight = crio.weight as f64;

    // item -> credited auxiliaries, items in first-seen order
    let mut claims: Vec<(&str, Vec<AuxVar>)> = Vec::new();
    let mut slot_of: HashMap<&str, usize> = HashMap::new();

    for (test, items) in table.iter() {
        if !universe.contains(test) {
            continue;
        }
        if crio.invert {
            coefficients.add(Var::test(test), weight);
        }
        for item in items {
            let aux = AuxVar {
                prefix: prefix.to_string(),
                test: test.clone(),
                item: item.clone(),
            };
            if per_aux != 0.0 {
                coefficients.set(Var::Aux(aux.clone()), weight * per_aux);
            }
            let slot = *slot_of.entry(item.as_str()).or_insert_with(|| {
                claims.push((item.as_str(), Vec::new()));
                claims.len() - 1
            });
            claims[slot].1.push(aux);
        }
    }

    let mut aux_count = 0usize;
    for (_, auxes) in claims {
        for aux in &auxes {
            constraints.insert(Constraint::new(
                LinearExpr::sum_of([Var::Aux(aux.clone())]),
                Comparison::Le,
                Rhs::Var(Var::test(&aux.test)),
            ));
        }
        aux_count += auxes.len();
        constraints.insert(Constraint::new(
            LinearExpr::sum_of(auxes.into_iter().map(Var::Aux)),
            Comparison::Le,
            Rhs::Constant(1.0),
        ));
    }
    tracing::debug!(file = %crio.file, prefix, aux = aux_count, "relaxed criterion");
    Ok(())
}
