//! Identifier-keyed record files.
//!
//! Two line dialects share the `<test>:<payload>` shape:
//! - coverage records list covered items: `t2:1 3 5`, `t3:`
//! - cost records carry exactly one integer: `t2:100`

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::RecordKind;

/// Short test identifier (`t<n>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(String);

impl TestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier without its `t` prefix, as used in auxiliary names.
    pub fn number(&self) -> &str {
        self.0.strip_prefix('t').unwrap_or(&self.0)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("line {line}: missing ':' separator")]
    MissingSeparator { line: usize },

    #[error("line {line}: empty test identifier")]
    EmptyTest { line: usize },

    #[error("line {line}: test '{test}' listed more than once")]
    DuplicateTest { line: usize, test: String },

    #[error("line {line}: test '{test}' has no value")]
    MissingValue { line: usize, test: String },

    #[error("line {line}: '{value}' is not an integer")]
    InvalidValue { line: usize, value: String },
}

/// Split the non-blank lines of a record file into `(line_no, test, payload)`.
fn split_lines(text: &str) -> Result<Vec<(usize, TestId, &str)>, RecordError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let (test, payload) = raw
            .split_once(':')
            .ok_or(RecordError::MissingSeparator { line })?;
        let test = test.trim();
        if test.is_empty() {
            return Err(RecordError::EmptyTest { line });
        }
        if !seen.insert(test.to_string()) {
            return Err(RecordError::DuplicateTest {
                line,
                test: test.to_string(),
            });
        }
        out.push((line, TestId::new(test), payload));
    }
    Ok(out)
}

// ── Coverage records ─────────────────────────────────────────────────

/// Per-test covered items, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageTable {
    entries: Vec<(TestId, Vec<String>)>,
}

impl CoverageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a coverage file. Repeated items on one line count once.
    pub fn parse(text: &str) -> Result<Self, RecordError> {
        let mut table = Self::new();
        for (_, test, payload) in split_lines(text)? {
            table.push(test, payload.split_whitespace().map(str::to_string));
        }
        Ok(table)
    }

    /// Append a test. Items keep their first occurrence only.
    pub fn push(&mut self, test: TestId, items: impl IntoIterator<Item = String>) {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .filter(|item| seen.insert(item.clone()))
            .collect();
        self.entries.push((test, items));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TestId, &[String])> {
        self.entries.iter().map(|(t, items)| (t, items.as_slice()))
    }

    pub fn tests(&self) -> impl Iterator<Item = &TestId> {
        self.entries.iter().map(|(t, _)| t)
    }

    pub fn items_of(&self, test: &TestId) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(t, _)| t == test)
            .map(|(_, items)| items.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct items over the whole file.
    pub fn distinct_items(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|(_, items)| items.iter())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Item -> covering tests, items in first-seen order.
    pub fn tests_by_item(&self) -> Vec<(&str, Vec<&TestId>)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut out: Vec<(&str, Vec<&TestId>)> = Vec::new();
        for (test, items) in &self.entries {
            for item in items {
                let slot = *index.entry(item.as_str()).or_insert_with(|| {
                    out.push((item.as_str(), Vec::new()));
                    out.len() - 1
                });
                out[slot].1.push(test);
            }
        }
        out
    }

    /// Render back to the `t:items` line format.
    pub fn to_info_string(&self) -> String {
        let mut out = String::new();
        for (test, items) in &self.entries {
            out.push_str(test.as_str());
            out.push(':');
            out.push_str(&items.join(" "));
            out.push('\n');
        }
        out
    }
}

// ── Cost records ─────────────────────────────────────────────────────

/// Per-test scalar values, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostTable {
    entries: Vec<(TestId, i64)>,
}

impl CostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Result<Self, RecordError> {
        let mut table = Self::new();
        for (line, test, payload) in split_lines(text)? {
            let value = payload.trim();
            if value.is_empty() {
                return Err(RecordError::MissingValue {
                    line,
                    test: test.to_string(),
                });
            }
            let value = value.parse::<i64>().map_err(|_| RecordError::InvalidValue {
                line,
                value: value.to_string(),
            })?;
            table.push(test, value);
        }
        Ok(table)
    }

    pub fn push(&mut self, test: TestId, value: i64) {
        self.entries.push((test, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TestId, i64)> {
        self.entries.iter().map(|(t, v)| (t, *v))
    }

    pub fn tests(&self) -> impl Iterator<Item = &TestId> {
        self.entries.iter().map(|(t, _)| t)
    }

    pub fn value_of(&self, test: &TestId) -> Option<i64> {
        self.entries
            .iter()
            .find(|(t, _)| t == test)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest value in the file, `None` for an empty file.
    pub fn max_value(&self) -> Option<i64> {
        self.entries.iter().map(|(_, v)| *v).max()
    }

    pub fn total(&self) -> i64 {
        self.entries.iter().map(|(_, v)| *v).sum()
    }

    pub fn to_info_string(&self) -> String {
        let mut out = String::new();
        for (test, value) in &self.entries {
            out.push_str(&format!("{test}:{value}\n"));
        }
        out
    }
}

// ── Record sets ──────────────────────────────────────────────────────

/// All record files a formulation reads, keyed by the file name used in
/// the config, plus the optional canonical test list.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub coverage: HashMap<String, CoverageTable>,
    pub costs: HashMap<String, CostTable>,
    pub test_list: Option<Vec<TestId>>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` as `kind` and register it under `file`.
    pub fn insert_text(
        &mut self,
        file: &str,
        kind: RecordKind,
        text: &str,
    ) -> Result<(), RecordError> {
        match kind {
            RecordKind::Coverage => {
                self.coverage
                    .insert(file.to_string(), CoverageTable::parse(text)?);
            }
            RecordKind::Cost => {
                self.costs.insert(file.to_string(), CostTable::parse(text)?);
            }
        }
        Ok(())
    }

    pub fn coverage(&self, file: &str) -> Option<&CoverageTable> {
        self.coverage.get(file)
    }

    pub fn costs(&self, file: &str) -> Option<&CostTable> {
        self.costs.get(file)
    }
}

/// Parse a canonical test list.
///
/// Accepts the normalizer's `tests-ident-map.csv` (header, identifier in the
/// first column) as well as a bare one-identifier-per-line list.
pub fn parse_test_list(text: &str) -> Vec<TestId> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let first = raw.split(',').next().unwrap_or("").trim();
        if first.is_empty() {
            continue;
        }
        if idx == 0 && (first == "id" || first == "test") {
            continue;
        }
        if seen.insert(first.to_string()) {
            out.push(TestId::new(first));
        }
    }
    out
}
