//! Linear objective: normalized, weighted per-test coefficients.
//!
//! For each relative criterion a test's ratio is
//! - dependent: `|items(t)| / q`, `q` the distinct items of the whole file;
//! - independent: `value(t) / q`, `q` the largest value of the file.
//!
//! The ratio is rounded to 6 decimals, optionally inverted, weighted and
//! accumulated. A contribution of exactly 0 becomes the direction's epsilon,
//! as does a canonical test absent from every relative criterion.

use suitemin_ir::record::RecordSet;
use suitemin_ir::types::{Direction, RelativeCriterion};
use suitemin_ir::TestId;

use crate::compile::CompileError;
use crate::model::{CoefficientTable, TestUniverse, Var};
use crate::number::round6;
use crate::universe::{costs, coverage};

/// Per-test ratios in `[0, 1]` for one criterion, file order, restricted to
/// the canonical tests.
pub fn criterion_ratios<'a>(
    crio: &RelativeCriterion,
    records: &'a RecordSet,
    universe: &TestUniverse,
) -> Result<Vec<(&'a TestId, f64)>, CompileError> {
    let ratios: Vec<(&TestId, f64)> = if crio.is_dependent {
        let table = coverage(records, &crio.file)?;
        let q = table.distinct_items();
        table
            .iter()
            .map(|(test, items)| {
                let ratio = if items.is_empty() || q == 0 {
                    0.0
                } else {
                    items.len() as f64 / q as f64
                };
                (test, ratio)
            })
            .collect()
    } else {
        let table = costs(records, &crio.file)?;
        let q = table.max_value().unwrap_or(0);
        table
            .iter()
            .map(|(test, value)| {
                let ratio = if q <= 0 { 0.0 } else { value as f64 / q as f64 };
                (test, ratio)
            })
            .collect()
    };
    Ok(ratios
        .into_iter()
        .filter(|(test, _)| universe.contains(test))
        .collect())
}

/// Rounded, optionally inverted ratio.
pub fn criterion_coefficient(crio: &RelativeCriterion, ratio: f64) -> f64 {
    if crio.invert {
        1.0 - round6(ratio)
    } else {
        round6(ratio)
    }
}

pub fn linear_objective(
    criteria: &[RelativeCriterion],
    records: &RecordSet,
    universe: &TestUniverse,
    direction: Direction,
) -> Result<CoefficientTable, CompileError> {
    let mut table = CoefficientTable::new();
    for crio in criteria {
        let ratios = criterion_ratios(crio, records, universe)?;
        tracing::debug!(file = %crio.file, tests = ratios.len(), weight = crio.weight, "objective criterion");
        for (test, ratio) in ratios {
            let mut term = crio.weight as f64 * criterion_coefficient(crio, ratio);
            if term == 0.0 {
                term = direction.epsilon();
            }
            table.add(Var::test(test), term);
        }
    }
    // A listed test no criterion file mentions must not be free.
    for test in universe.iter() {
        let var = Var::test(test);
        if !table.contains(&var) {
            table.set(var, direction.epsilon());
        }
    }
    table.replace_zeros(direction.epsilon());
    Ok(table)
}
