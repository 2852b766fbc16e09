use std::fs;
use std::path::{Path, PathBuf};

use suitemin_compiler::writer::Artifact;
use suitemin_ir::parse::parse_config;
use suitemin_ir::record::{parse_test_list, RecordSet};
use suitemin_ir::FormulatorConfig;

use crate::pipeline::PipelineError;

/// A project directory: config, record files and written models side by side.
#[derive(Debug, Clone)]
pub struct Project {
    dir: PathBuf,
}

impl Project {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths are relative to the project unless absolute.
    pub fn path(&self, file: impl AsRef<Path>) -> PathBuf {
        self.dir.join(file)
    }

    fn read(&self, file: impl AsRef<Path>) -> Result<String, PipelineError> {
        let path = self.path(file);
        fs::read_to_string(&path).map_err(|source| PipelineError::Io { path, source })
    }

    pub fn load_config(&self, file: impl AsRef<Path>) -> Result<FormulatorConfig, PipelineError> {
        Ok(parse_config(&self.read(file)?)?)
    }

    /// Every record file the config names, plus the canonical test list when
    /// one is configured.
    pub fn load_records(&self, config: &FormulatorConfig) -> Result<RecordSet, PipelineError> {
        let mut records = RecordSet::new();
        for (file, kind) in config.record_requirements() {
            let text = self.read(&file)?;
            records
                .insert_text(&file, kind, &text)
                .map_err(|source| PipelineError::Record {
                    file: file.clone(),
                    source,
                })?;
            tracing::debug!(file = %file, ?kind, "loaded records");
        }
        if let Some(tests_file) = &config.tests_file {
            let tests = parse_test_list(&self.read(tests_file)?);
            tracing::debug!(file = %tests_file, tests = tests.len(), "loaded test list");
            records.test_list = Some(tests);
        }
        Ok(records)
    }

    pub fn write_artifacts(&self, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, PipelineError> {
        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let path = self.path(&artifact.file_name);
            fs::write(&path, &artifact.contents).map_err(|source| PipelineError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path = %path.display(), bytes = artifact.contents.len(), "wrote model");
            written.push(path);
        }
        Ok(written)
    }
}
