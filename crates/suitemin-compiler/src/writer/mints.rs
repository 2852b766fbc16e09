//! MINTS positional pseudo-boolean format.
//!
//! Tests are renumbered densely (1-based, canonical order) and the model is
//! split over three files:
//!
//! - `<name>.mints.mapping.json`: test id -> dense index
//! - `<name>.relative`: `1`, then every coefficient ×10⁶ rounded to an
//!   integer (see [`to_micros`])
//! - `<name>.absolute`: per constraint `b`, `1` and a 0/1 indicator row
//!
//! Only `Σ t ≥ 1` rows are expressible.

use std::collections::{BTreeMap, HashMap};

use suitemin_ir::types::OutputFormat;
use suitemin_ir::TestId;

use super::{linear_objective, Artifact, ModelWriter, WriteError};
use crate::model::{Model, Var};
use crate::number::to_micros;

pub struct MintsWriter;

impl ModelWriter for MintsWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Mints
    }

    fn write(&self, model: &Model) -> Result<Vec<Artifact>, WriteError> {
        let table = linear_objective(model, self.format())?;
        let dense: HashMap<&TestId, usize> = model
            .tests
            .iter()
            .enumerate()
            .map(|(i, t)| (t, i + 1))
            .collect();
        let n = dense.len();

        // Objective row
        for (var, _) in table.iter() {
            let known = var.as_test().is_some_and(|t| dense.contains_key(t));
            if !known {
                return Err(WriteError::UnknownVariable {
                    var: var.to_string(),
                });
            }
        }
        let mut coefficients = Vec::with_capacity(n);
        for test in model.tests.iter() {
            let coeff = table
                .get(&Var::test(test))
                .ok_or_else(|| WriteError::MissingCoefficient {
                    test: test.to_string(),
                })?;
            coefficients.push(to_micros(coeff).to_string());
        }
        let relative = format!("1\n{}\n", coefficients.join(" "));

        // Constraint rows
        let mut absolute = String::new();
        for (index, constraint) in model.constraints.iter().enumerate() {
            let not_set_cover = || WriteError::NotSetCover {
                index: index + 1,
                constraint: constraint.to_string(),
            };
            let tests = constraint.set_cover_tests().ok_or_else(not_set_cover)?;
            let mut row = vec![false; n];
            for test in tests {
                let slot = dense.get(test).ok_or_else(not_set_cover)?;
                row[slot - 1] = true;
            }
            absolute.push_str("b\n1\n");
            absolute.push_str(&render_row(&row));
            absolute.push('\n');
        }

        let mapping: BTreeMap<&str, usize> =
            dense.iter().map(|(t, i)| (t.as_str(), *i)).collect();
        let mapping = serde_json::to_string_pretty(&mapping)?;

        Ok(vec![
            Artifact::new(format!("{}.mints.mapping.json", model.name), mapping),
            Artifact::new(format!("{}.relative", model.name), relative),
            Artifact::new(format!("{}.absolute", model.name), absolute),
        ])
    }
}

fn render_row(row: &[bool]) -> String {
    row.iter()
        .map(|&set| if set { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Readers ──────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum CompactReadError {
    #[error("line {line}: expected '{expected}'")]
    Expected { line: usize, expected: &'static str },

    #[error("line {line}: indicator '{value}' is neither 0 nor 1")]
    BadIndicator { line: usize, value: String },

    #[error("line {line}: row has {found} columns, expected {expected}")]
    RowWidth {
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error("Mapping parse error: {0}")]
    Mapping(#[from] serde_json::Error),
}

/// Parse the indicator rows of a `.absolute` file.
pub fn read_indicator_rows(text: &str) -> Result<Vec<Vec<bool>>, CompactReadError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut rows: Vec<Vec<bool>> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if lines[i].trim().is_empty() {
            i += 1;
            continue;
        }
        if lines[i].trim() != "b" {
            return Err(CompactReadError::Expected { line: i + 1, expected: "b" });
        }
        if lines.get(i + 1).map(|l| l.trim()) != Some("1") {
            return Err(CompactReadError::Expected { line: i + 2, expected: "1" });
        }
        let line = i + 3;
        let raw = lines
            .get(i + 2)
            .ok_or(CompactReadError::Expected { line, expected: "indicator row" })?;
        let row = raw
            .split_whitespace()
            .map(|v| match v {
                "1" => Ok(true),
                "0" => Ok(false),
                other => Err(CompactReadError::BadIndicator {
                    line,
                    value: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(CompactReadError::RowWidth {
                    line,
                    found: row.len(),
                    expected: first.len(),
                });
            }
        }
        rows.push(row);
        i += 3;
    }
    Ok(rows)
}

/// Parse a `.mints.mapping.json` file into test id -> dense index.
pub fn read_mapping(json: &str) -> Result<BTreeMap<String, usize>, CompactReadError> {
    Ok(serde_json::from_str(json)?)
}

/// Invert a mapping into dense index -> test id.
pub fn dense_to_test(mapping: &BTreeMap<String, usize>) -> HashMap<usize, TestId> {
    let mut out = HashMap::new();
    for (test, index) in mapping {
        out.entry(*index).or_insert_with(|| TestId::new(test.as_str()));
    }
    out
}
