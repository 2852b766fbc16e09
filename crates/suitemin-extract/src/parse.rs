//! Line-oriented solver result dialects.
//!
//! Every parser returns the selected tests in the order the solver printed
//! them. Auxiliary `v_*` variables are skipped. Values are read as numbers
//! and must be 0 or 1 within [`TOLERANCE`].

use std::collections::{HashMap, HashSet};

use suitemin_ir::TestId;

use crate::extract::ExtractError;
use crate::format::SolutionFormat;
use crate::osil::parse_osil;

pub const TOLERANCE: f64 = 1e-6;

/// Dense MINTS index -> test.
pub type DenseMapping = HashMap<usize, TestId>;

/// Parse `text` as `format`. `mapping` is required for the MINTS dialects.
pub fn parse_solution(
    format: SolutionFormat,
    text: &str,
    mapping: Option<&DenseMapping>,
) -> Result<Vec<TestId>, ExtractError> {
    let selected = match format {
        SolutionFormat::LpSolve => parse_lp_solve(text)?,
        SolutionFormat::Soplex => parse_soplex(text)?,
        SolutionFormat::Bpmpd => parse_bpmpd(text)?,
        SolutionFormat::Cplex => parse_cplex(text)?,
        SolutionFormat::Osil => parse_osil(text)?,
        SolutionFormat::Couenne => parse_couenne(text)?,
        SolutionFormat::Neos => parse_neos(text)?,
        SolutionFormat::MintsMinisat | SolutionFormat::MintsOpbdp => {
            let mapping = mapping.ok_or(ExtractError::MappingRequired { format })?;
            parse_mints(format, text, mapping)?
        }
    };
    Ok(dedup(selected))
}

fn dedup(tests: Vec<TestId>) -> Vec<TestId> {
    let mut seen = HashSet::new();
    tests.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

/// Read a solver value as a 0/1 indicator.
pub fn indicator(value: &str, line: usize) -> Result<bool, ExtractError> {
    let parsed: f64 = value.trim().parse().map_err(|_| ExtractError::Malformed {
        line,
        message: format!("'{value}' is not a number"),
    })?;
    if (parsed - 1.0).abs() <= TOLERANCE {
        Ok(true)
    } else if parsed.abs() <= TOLERANCE {
        Ok(false)
    } else {
        Err(ExtractError::Malformed {
            line,
            message: format!("value {value} is neither 0 nor 1"),
        })
    }
}

fn is_test(name: &str) -> bool {
    name.starts_with('t')
}

/// `(name, value)` from a whitespace-separated row.
fn name_value(raw: &str, line: usize) -> Result<(&str, &str), ExtractError> {
    let mut fields = raw.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(name), Some(value)) => Ok((name, value)),
        _ => Err(ExtractError::Malformed {
            line,
            message: "expected a variable name and a value".to_string(),
        }),
    }
}

/// Non-empty lines strictly between a line starting with one of `start`
/// and the next line starting with `end`, numbered from 1.
fn section<'a>(text: &'a str, start: &[&str], end: &str) -> Vec<(usize, &'a str)> {
    let mut out = Vec::new();
    let mut inside = false;
    for (idx, raw) in text.lines().enumerate() {
        if start.iter().any(|s| raw.starts_with(s)) {
            inside = true;
            continue;
        }
        if inside && raw.starts_with(end) {
            inside = false;
        }
        if inside && !raw.trim().is_empty() {
            out.push((idx + 1, raw));
        }
    }
    out
}

// ── LP/MILP solvers ──────────────────────────────────────────────────

/// `t6    0` rows anywhere in the output.
pub fn parse_lp_solve(text: &str) -> Result<Vec<TestId>, ExtractError> {
    let mut selected = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if !is_test(raw) {
            continue;
        }
        let (name, value) = name_value(raw, idx + 1)?;
        if indicator(value, idx + 1)? {
            selected.push(TestId::new(name));
        }
    }
    Ok(selected)
}

/// Rows of the `Primal solution` block; SoPlex lists nonzero variables only.
pub fn parse_soplex(text: &str) -> Result<Vec<TestId>, ExtractError> {
    let mut selected = Vec::new();
    for (line, raw) in section(text, &["Primal solution"], "All other variables") {
        let (name, value) = name_value(raw, line)?;
        if is_test(name) && indicator(value, line)? {
            selected.push(TestId::new(name));
        }
    }
    Ok(selected)
}

/// ` t1459     0.00000000000E+00 …` rows of the column block.
pub fn parse_bpmpd(text: &str) -> Result<Vec<TestId>, ExtractError> {
    let mut selected = Vec::new();
    for (line, raw) in section(
        text,
        &[" -------------C-O-L-U-M-N-S"],
        " ---------------S-L-A-C-K---R-E-",
    ) {
        if !raw.starts_with(" t") {
            continue;
        }
        let (name, value) = name_value(raw, line)?;
        if indicator(value, line)? {
            selected.push(TestId::new(name));
        }
    }
    Ok(selected)
}

/// Rows after `CPLEX> Variable Name` / `CPLEX> Incumbent solution`.
pub fn parse_cplex(text: &str) -> Result<Vec<TestId>, ExtractError> {
    let mut selected = Vec::new();
    let start = ["CPLEX> Variable Name", "CPLEX> Incumbent solution"];
    for (line, raw) in section(text, &start, "All other variables") {
        if raw.starts_with("Variable Name") {
            continue;
        }
        let (name, value) = name_value(raw, line)?;
        if name.starts_with("v_") {
            continue;
        }
        if !is_test(name) {
            return Err(ExtractError::Malformed {
                line,
                message: format!("unexpected variable '{name}'"),
            });
        }
        if indicator(value, line)? {
            selected.push(TestId::new(name));
        }
    }
    Ok(selected)
}

// ── Nonlinear and hosted solvers ─────────────────────────────────────

/// `index name value` rows after the `: _varname …` header, up to `;`.
pub fn parse_couenne(text: &str) -> Result<Vec<TestId>, ExtractError> {
    let mut selected = Vec::new();
    let mut inside = false;
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if !inside {
            inside = raw.starts_with(':') && raw.contains("_varname");
            continue;
        }
        if raw.starts_with(';') {
            break;
        }
        if raw.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = raw.split_whitespace().collect();
        let [_, name, value] = fields.as_slice() else {
            return Err(ExtractError::Malformed {
                line,
                message: "expected 'index name value'".to_string(),
            });
        };
        if is_test(name) && indicator(value, line)? {
            selected.push(TestId::new(*name));
        }
    }
    Ok(selected)
}

/// `name,value` or `name=value` rows.
pub fn parse_neos(text: &str) -> Result<Vec<TestId>, ExtractError> {
    let mut selected = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let separator = if raw.contains(',') { ',' } else { '=' };
        let (name, value) = raw
            .split_once(separator)
            .ok_or_else(|| ExtractError::Malformed {
                line,
                message: "expected 'name,value' or 'name=value'".to_string(),
            })?;
        let name = name.trim();
        if is_test(name) && indicator(value, line)? {
            selected.push(TestId::new(name));
        }
    }
    Ok(selected)
}

// ── MINTS ────────────────────────────────────────────────────────────

/// minisat+ prints `v x1 -x2 x3`, opbdp prints
/// `0-1 Variables fixed to 1 : x1 x6`. The last such line wins.
pub fn parse_mints(
    format: SolutionFormat,
    text: &str,
    mapping: &DenseMapping,
) -> Result<Vec<TestId>, ExtractError> {
    let (marker, skip) = match format {
        SolutionFormat::MintsOpbdp => ("0-1 Variables", 5),
        _ => ("v", 1),
    };
    let Some((line, raw)) = text
        .lines()
        .enumerate()
        .filter(|(_, l)| l.starts_with(marker))
        .last()
    else {
        return Ok(Vec::new());
    };
    let mut selected = Vec::new();
    for token in raw.split_whitespace().skip(skip) {
        let Some(index) = token.strip_prefix('x') else {
            continue;
        };
        let index: usize = index.parse().map_err(|_| ExtractError::Malformed {
            line: line + 1,
            message: format!("'{token}' is not a variable"),
        })?;
        let test = mapping
            .get(&index)
            .ok_or(ExtractError::UnknownIndex { index })?;
        selected.push(test.clone());
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_tolerance() {
        assert!(indicator("0.1e1", 1).unwrap());
        assert!(indicator("1.000000", 1).unwrap());
        assert!(!indicator("-0", 1).unwrap());
        assert!(!indicator("2.22E-16", 1).unwrap());
        assert!(indicator("0.5", 4).is_err());
        assert!(matches!(
            indicator("abc", 7),
            Err(ExtractError::Malformed { line: 7, .. })
        ));
    }

    #[test]
    fn test_section_bounds() {
        let text = "head\nStart here\na\n\nb\nStop\nc\n";
        let rows = section(text, &["Start"], "Stop");
        assert_eq!(rows, vec![(3, "a"), (5, "b")]);
    }
}
