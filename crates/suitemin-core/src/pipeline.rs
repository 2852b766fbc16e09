use std::path::{Path, PathBuf};

use suitemin_compiler::compile::CompileError;
use suitemin_compiler::formulate;
use suitemin_ir::parse::ParseError;
use suitemin_ir::record::RecordError;
use suitemin_ir::types::OutputFormat;

use crate::project::Project;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Config parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Record error in '{file}': {source}")]
    Record {
        file: String,
        #[source]
        source: RecordError,
    },

    #[error("Formulation error: {0}")]
    Compile(#[from] CompileError),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a formulation run produced.
#[derive(Debug, Clone)]
pub struct FormulationReport {
    pub name: String,
    pub format: OutputFormat,
    pub written: Vec<PathBuf>,
}

/// Load `config_file` from `project_dir`, formulate and write the model
/// files into the project. Nothing is written unless every artifact was
/// produced.
pub fn run_formulation(
    project_dir: &Path,
    config_file: &Path,
) -> Result<FormulationReport, PipelineError> {
    let project = Project::new(project_dir);
    let config = project.load_config(config_file)?;
    let records = project.load_records(&config)?;
    let artifacts = formulate(&config, &records)?;
    let written = project.write_artifacts(&artifacts)?;

    Ok(FormulationReport {
        name: config.name,
        format: config.output_format,
        written,
    })
}
