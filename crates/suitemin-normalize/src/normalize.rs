use std::fs;
use std::path::{Path, PathBuf};

use crate::dimension::{convert_interned, convert_legacy_requirements, Dimension};
use crate::ident::{IdentMap, IDENT_MAP_FILE};
use crate::times::convert_times;

pub const TIMES_FILE: &str = "rtime.info";

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Requirement '{item}' is not of the form 'tr<k>'")]
    LegacyItem { item: String },

    #[error("Times file has no '{column}' column")]
    MissingColumn { column: &'static str },

    #[error("Times file line {line}: missing '{column}' value")]
    ShortRow { line: usize, column: &'static str },

    #[error("Times file line {line}: '{value}' is not an integer")]
    InvalidTime { line: usize, value: String },
}

/// How requirement listings are turned into items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequirementsStrategy {
    /// Intern arbitrary contents, with a placeholder item per test.
    #[default]
    Interned,
    /// `tr<k>` items, written as `k`.
    LegacyTrSuffix,
}

/// Raw inputs of one normalization run.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub all_tests: PathBuf,
    pub requirements: PathBuf,
    pub violations: PathBuf,
    pub times: PathBuf,
    pub out_dir: PathBuf,
    pub requirements_strategy: RequirementsStrategy,
}

/// Summary of what was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeReport {
    pub tests: usize,
    pub requirements: usize,
    pub violations: usize,
    pub timed_tests: usize,
    pub written: Vec<PathBuf>,
}

fn read(path: &Path) -> Result<String, NormalizeError> {
    fs::read_to_string(path).map_err(|source| NormalizeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Every output is rendered in memory first; nothing is written when any
/// input fails to convert.
pub fn normalize(options: &NormalizeOptions) -> Result<NormalizeReport, NormalizeError> {
    let idents = IdentMap::build(&read(&options.all_tests)?);

    let requirements_text = read(&options.requirements)?;
    let mut outputs: Vec<(&str, String)> = vec![(IDENT_MAP_FILE, idents.to_csv())];
    let requirements = match options.requirements_strategy {
        RequirementsStrategy::Interned => {
            let converted =
                convert_interned(&requirements_text, Dimension::Requirements, &idents);
            outputs.push((Dimension::Requirements.info_file(), converted.records.to_info_string()));
            outputs.push((Dimension::Requirements.mapping_file(), converted.mapping_csv()));
            converted.contents.len()
        }
        RequirementsStrategy::LegacyTrSuffix => {
            let records = convert_legacy_requirements(&requirements_text, &idents)?;
            outputs.push((Dimension::Requirements.info_file(), records.to_info_string()));
            records.distinct_items()
        }
    };

    let violations = convert_interned(&read(&options.violations)?, Dimension::Violations, &idents);
    outputs.push((Dimension::Violations.info_file(), violations.records.to_info_string()));
    outputs.push((Dimension::Violations.mapping_file(), violations.mapping_csv()));

    let times = convert_times(&read(&options.times)?, &idents)?;
    outputs.push((TIMES_FILE, times.to_info_string()));

    fs::create_dir_all(&options.out_dir).map_err(|source| NormalizeError::Io {
        path: options.out_dir.clone(),
        source,
    })?;
    let mut written = Vec::with_capacity(outputs.len());
    for (name, contents) in outputs {
        let path = options.out_dir.join(name);
        fs::write(&path, contents).map_err(|source| NormalizeError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    tracing::info!(
        out_dir = %options.out_dir.display(),
        tests = idents.len(),
        requirements,
        violations = violations.contents.len(),
        "normalized"
    );

    Ok(NormalizeReport {
        tests: idents.len(),
        requirements,
        violations: violations.contents.len(),
        timed_tests: times.len(),
        written,
    })
}
