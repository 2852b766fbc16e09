use std::fs;
use std::path::{Path, PathBuf};

use suitemin_compiler::writer::mints::{dense_to_test, read_mapping, CompactReadError};
use suitemin_ir::record::RecordError;
use suitemin_ir::types::RecordKind;
use suitemin_ir::{CostTable, CoverageTable, TestId};

use crate::format::SolutionFormat;
use crate::parse::parse_solution;
use crate::report::CriterionReport;

pub const DEFAULT_MAPPING_FILE: &str = "linear_so.mints.mapping.json";

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Unsupported solver result '{file}'")]
    UnsupportedDialect { file: String },

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("XML error: {message}")]
    Xml { message: String },

    #[error("Dialect '{format}' needs the compact mapping file")]
    MappingRequired { format: SolutionFormat },

    #[error("Variable x{index} is not in the compact mapping")]
    UnknownIndex { index: usize },

    #[error("Mapping error: {0}")]
    Mapping(#[from] CompactReadError),

    #[error("Record error in '{file}': {source}")]
    Record {
        file: String,
        #[source]
        source: RecordError,
    },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A record file to measure the selection against.
#[derive(Debug, Clone)]
pub struct ReportSource {
    pub label: String,
    pub file: String,
    pub kind: RecordKind,
}

impl ReportSource {
    pub fn new(label: &str, file: &str, kind: RecordKind) -> Self {
        Self {
            label: label.to_string(),
            file: file.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub project_dir: PathBuf,
    /// Resolved against `project_dir` unless absolute.
    pub solution: PathBuf,
    pub out_file: PathBuf,
    /// Compact mapping, `project_dir/linear_so.mints.mapping.json` when unset.
    pub mapping: Option<PathBuf>,
    pub reports: Vec<ReportSource>,
}

impl ExtractOptions {
    /// Statement and fault coverage from `cov.info` and `fault.info`.
    pub fn new(
        project_dir: impl Into<PathBuf>,
        solution: impl Into<PathBuf>,
        out_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            solution: solution.into(),
            out_file: out_file.into(),
            mapping: None,
            reports: vec![
                ReportSource::new("Statements", "cov.info", RecordKind::Coverage),
                ReportSource::new("Faults", "fault.info", RecordKind::Coverage),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub format: SolutionFormat,
    pub selected: Vec<TestId>,
    pub reports: Vec<CriterionReport>,
}

fn read(path: &Path) -> Result<String, ExtractError> {
    fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse the solver result, write the selected tests and measure them.
pub fn extract(options: &ExtractOptions) -> Result<Extraction, ExtractError> {
    let file_name = options
        .solution
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let format = SolutionFormat::detect(&file_name).ok_or_else(|| {
        ExtractError::UnsupportedDialect {
            file: options.solution.display().to_string(),
        }
    })?;

    let text = read(&options.project_dir.join(&options.solution))?;
    let mapping = if format.needs_mapping() {
        let path = options
            .mapping
            .clone()
            .unwrap_or_else(|| options.project_dir.join(DEFAULT_MAPPING_FILE));
        Some(dense_to_test(&read_mapping(&read(&path)?)?))
    } else {
        None
    };
    let selected = parse_solution(format, &text, mapping.as_ref())?;
    write_selection(&options.out_file, &selected)?;

    let mut reports = Vec::with_capacity(options.reports.len());
    for source in &options.reports {
        if let Some(report) = measure(&options.project_dir, source, &selected)? {
            reports.push(report);
        }
    }

    tracing::info!(
        format = %format,
        selected = selected.len(),
        out = %options.out_file.display(),
        "extracted selection"
    );
    Ok(Extraction {
        format,
        selected,
        reports,
    })
}

/// `None` when the record file does not exist.
fn measure(
    project_dir: &Path,
    source: &ReportSource,
    selected: &[TestId],
) -> Result<Option<CriterionReport>, ExtractError> {
    let path = project_dir.join(&source.file);
    if !path.exists() {
        tracing::warn!(file = %path.display(), "record file missing, skipping report");
        return Ok(None);
    }
    let text = read(&path)?;
    let record_error = |source_err: RecordError| ExtractError::Record {
        file: source.file.clone(),
        source: source_err,
    };
    let report = match source.kind {
        RecordKind::Coverage => {
            let table = CoverageTable::parse(&text).map_err(record_error)?;
            CriterionReport::coverage(&source.label, &table, selected)
        }
        RecordKind::Cost => {
            let table = CostTable::parse(&text).map_err(record_error)?;
            CriterionReport::cost(&source.label, &table, selected)
        }
    };
    Ok(Some(report))
}

/// One test identifier per line.
pub fn write_selection(path: &Path, selected: &[TestId]) -> Result<(), ExtractError> {
    let mut out = String::new();
    for test in selected {
        out.push_str(test.as_str());
        out.push('\n');
    }
    fs::write(path, out).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })
}
