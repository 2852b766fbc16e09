use suitemin_ir::record::RecordSet;
use suitemin_ir::types::{FormulatorConfig, RecordKind};

use crate::constraint::build_constraints;
use crate::model::{Model, Objective};
use crate::nonlinear::nonlinear_objective;
use crate::objective::linear_objective;
use crate::relax::relaxed_objective;
use crate::universe::canonical_tests;
use crate::validate::{validate_config, ValidationError};
use crate::writer::{writer_for, Artifact, WriteError};

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("Validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<ValidationError>),

    #[error("No {kind:?} records loaded for '{file}'")]
    MissingRecords { file: String, kind: RecordKind },

    #[error("Nonlinear objective for independent criterion '{file}' is not supported")]
    UnsupportedNonlinearIndependent { file: String },

    #[error("Cost constraint from '{file}' has no bound")]
    MissingBound { file: String },

    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

/// Build the model described by `config` over `records`.
pub fn compile(config: &FormulatorConfig, records: &RecordSet) -> Result<Model, CompileError> {
    // 1. Validate
    validate_config(config).map_err(CompileError::Validation)?;

    // 2. Canonical tests
    let tests = canonical_tests(config, records)?;

    // 3. Constraints from absolute criteria
    let mut constraints = build_constraints(&config.absolute_cria, records, &tests)?;

    // 4. Objective from relative criteria
    let objective = match (config.nonlinear, config.relax) {
        (true, true) => {
            let relaxed = relaxed_objective(&config.relative_cria, records, &tests, config.seed)?;
            constraints.extend(relaxed.constraints.into_vec());
            Objective::Linear(relaxed.coefficients)
        }
        (true, false) => Objective::Nonlinear(nonlinear_objective(
            &config.relative_cria,
            records,
            &tests,
        )?),
        (false, _) => Objective::Linear(linear_objective(
            &config.relative_cria,
            records,
            &tests,
            config.min_or_max,
        )?),
    };

    tracing::info!(
        name = %config.name,
        tests = tests.len(),
        constraints = constraints.len(),
        nonlinear = config.nonlinear,
        relax = config.relax,
        "model formulated"
    );

    Ok(Model {
        name: config.name.clone(),
        direction: config.min_or_max,
        tests,
        objective,
        constraints: constraints.into_vec(),
    })
}

/// Compile and serialize in the configured dialect. Nothing is returned
/// unless every artifact was produced.
pub fn formulate(
    config: &FormulatorConfig,
    records: &RecordSet,
) -> Result<Vec<Artifact>, CompileError> {
    let model = compile(config, records)?;
    let artifacts = writer_for(config.output_format).write(&model)?;
    Ok(artifacts)
}
