use suitemin_ir::types::{FormulatorConfig, OutputFormat};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty model name")]
    EmptyName,

    #[error("'relax' requires 'nonlinear'")]
    RelaxWithoutNonlinear,

    #[error("Dialect '{format}' needs an unrelaxed nonlinear objective")]
    DialectNeedsNonlinear { format: OutputFormat },

    #[error("Dialect '{format}' cannot express an unrelaxed nonlinear objective")]
    DialectNeedsLinear { format: OutputFormat },

    #[error("Dialect '{format}' only supports a plain linear objective")]
    DialectNeedsPlainLinear { format: OutputFormat },

    #[error("Nonlinear objective for independent criterion '{file}' is not supported")]
    UnsupportedNonlinearIndependent { file: String },

    #[error("Cost constraint from '{file}' needs both 'crio_type' and 'rhs'")]
    MissingBound { file: String },
}

/// Check the config for contradictory or unsupported combinations.
pub fn validate_config(config: &FormulatorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if config.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    validate_mode(config, &mut errors);
    validate_dialect(config, &mut errors);
    validate_criteria(config, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_mode(config: &FormulatorConfig, errors: &mut Vec<ValidationError>) {
    if config.relax && !config.nonlinear {
        errors.push(ValidationError::RelaxWithoutNonlinear);
    }
}

fn validate_dialect(config: &FormulatorConfig, errors: &mut Vec<ValidationError>) {
    let format = config.output_format;
    let symbolic = config.nonlinear && !config.relax;
    match format {
        OutputFormat::CouenneAmpl if !symbolic => {
            errors.push(ValidationError::DialectNeedsNonlinear { format });
        }
        OutputFormat::LpSolve | OutputFormat::CplexLp | OutputFormat::Ampl if symbolic => {
            errors.push(ValidationError::DialectNeedsLinear { format });
        }
        OutputFormat::Mints if config.nonlinear => {
            errors.push(ValidationError::DialectNeedsPlainLinear { format });
        }
        _ => {}
    }
}

/// Independent criteria have no symbolic form; cost constraints need a bound.
fn validate_criteria(config: &FormulatorConfig, errors: &mut Vec<ValidationError>) {
    if config.nonlinear && !config.relax {
        for crio in config.relative_cria.iter().filter(|c| !c.is_dependent) {
            errors.push(ValidationError::UnsupportedNonlinearIndependent {
                file: crio.file.clone(),
            });
        }
    }
    for crio in config.absolute_cria.iter().filter(|c| c.is_coefficient) {
        if crio.crio_type.is_none() || crio.rhs.is_none() {
            errors.push(ValidationError::MissingBound {
                file: crio.file.clone(),
            });
        }
    }
}
