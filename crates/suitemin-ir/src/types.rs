use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level formulator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulatorConfig {
    #[serde(default)]
    pub relative_cria: Vec<RelativeCriterion>,
    #[serde(default)]
    pub absolute_cria: Vec<AbsoluteCriterion>,
    #[serde(default)]
    pub nonlinear: bool,
    #[serde(default)]
    pub relax: bool,
    pub min_or_max: Direction,
    pub output_format: OutputFormat,
    /// Base name of the written model artifacts.
    pub name: String,
    /// Seed for the relaxation prefixes. Entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Canonical test list (first CSV column). Derived from the criterion
    /// files when absent.
    #[serde(default)]
    pub tests_file: Option<String>,
}

// ── Criteria ─────────────────────────────────────────────────────────

/// Weighted objective term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelativeCriterion {
    pub file: String,
    #[serde(deserialize_with = "deserialize_weight")]
    pub weight: i64,
    #[serde(default)]
    pub invert: bool,
    pub is_dependent: bool,
}

/// Constraint source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsoluteCriterion {
    pub file: String,
    pub is_coefficient: bool,
    #[serde(default)]
    pub crio_type: Option<Comparison>,
    #[serde(default, deserialize_with = "deserialize_bound")]
    pub rhs: Option<f64>,
}

/// How a record file has to be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// `t3:1 4 9`
    Coverage,
    /// `t3:120`
    Cost,
}

impl RelativeCriterion {
    pub fn record_kind(&self) -> RecordKind {
        if self.is_dependent {
            RecordKind::Coverage
        } else {
            RecordKind::Cost
        }
    }
}

impl AbsoluteCriterion {
    pub fn record_kind(&self) -> RecordKind {
        if self.is_coefficient {
            RecordKind::Cost
        } else {
            RecordKind::Coverage
        }
    }
}

impl FormulatorConfig {
    /// Every record file the config reads, with the kind it is read as.
    /// Relative criteria come first, each list in config order.
    pub fn record_requirements(&self) -> Vec<(String, RecordKind)> {
        let relative = self
            .relative_cria
            .iter()
            .map(|c| (c.file.clone(), c.record_kind()));
        let absolute = self
            .absolute_cria
            .iter()
            .map(|c| (c.file.clone(), c.record_kind()));
        let mut out: Vec<(String, RecordKind)> = Vec::new();
        for req in relative.chain(absolute) {
            if !out.contains(&req) {
                out.push(req);
            }
        }
        out
    }
}

// ── Enumerations ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "=", alias = "==")]
    Eq,
}

impl Comparison {
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Le => "<=",
            Comparison::Ge => ">=",
            Comparison::Eq => "=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Objective sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    Min,
    Max,
}

impl Direction {
    /// Coefficient that replaces an exact zero so a test is never free.
    pub fn epsilon(self) -> f64 {
        match self {
            Direction::Min => 1e-6,
            Direction::Max => -1e-6,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Direction::Min => "min",
            Direction::Max => "max",
        }
    }

    pub fn long_keyword(self) -> &'static str {
        match self {
            Direction::Min => "minimize",
            Direction::Max => "maximize",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" | "minimize" => Ok(Direction::Min),
            "max" | "maximize" => Ok(Direction::Max),
            other => Err(format!("unknown objective direction '{other}', expected 'min' or 'max'")),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Direction> for String {
    fn from(value: Direction) -> Self {
        value.keyword().to_string()
    }
}

/// Solver input dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    LpSolve,
    CplexLp,
    Ampl,
    CouenneAmpl,
    Mints,
}

impl OutputFormat {
    pub fn tag(self) -> &'static str {
        match self {
            OutputFormat::LpSolve => "lp_solve",
            OutputFormat::CplexLp => "cplex_lp",
            OutputFormat::Ampl => "ampl",
            OutputFormat::CouenneAmpl => "couenne_ampl",
            OutputFormat::Mints => "mints",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ── Lenient numbers ──────────────────────────────────────────────────

/// Older configs quote their numbers (`"weight": "2"`).
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

fn deserialize_weight<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match LooseNumber::deserialize(deserializer)? {
        LooseNumber::Int(i) => Ok(i),
        LooseNumber::Float(f) if f.fract() == 0.0 => Ok(f as i64),
        LooseNumber::Float(f) => Err(serde::de::Error::custom(format!(
            "weight must be an integer, got {f}"
        ))),
        LooseNumber::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("weight must be an integer, got '{s}'"))),
    }
}

fn deserialize_bound<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(LooseNumber::Int(i)) => Ok(Some(i as f64)),
        Some(LooseNumber::Float(f)) => Ok(Some(f)),
        Some(LooseNumber::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("rhs must be a number, got '{s}'"))),
    }
}
