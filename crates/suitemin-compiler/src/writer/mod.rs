//! Solver dialect writers.
//!
//! Every dialect is a [`ModelWriter`]: it turns a finished [`Model`] into one
//! or more named text artifacts. Writers never touch the filesystem, so a
//! failing writer leaves no partial output behind.

pub mod ampl;
pub mod cplex;
pub mod lp_solve;
pub mod mints;

use suitemin_ir::types::OutputFormat;

use crate::model::{CoefficientTable, Model, Objective};

/// One output file: name relative to the project directory, and contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Dialect '{format}' cannot write a nonlinear objective")]
    NonlinearObjective { format: OutputFormat },

    #[error("Dialect '{format}' needs a symbolic nonlinear objective")]
    LinearObjective { format: OutputFormat },

    #[error("Constraint {index} ('{constraint}') is not of the form 'sum >= 1'")]
    NotSetCover { index: usize, constraint: String },

    #[error("Test '{test}' has no objective coefficient")]
    MissingCoefficient { test: String },

    #[error("Variable '{var}' is not a canonical test")]
    UnknownVariable { var: String },

    #[error("Mapping serialization error: {0}")]
    Mapping(#[from] serde_json::Error),
}

pub trait ModelWriter {
    fn format(&self) -> OutputFormat;

    fn write(&self, model: &Model) -> Result<Vec<Artifact>, WriteError>;
}

pub fn writer_for(format: OutputFormat) -> Box<dyn ModelWriter> {
    match format {
        OutputFormat::LpSolve => Box::new(lp_solve::LpSolveWriter),
        OutputFormat::CplexLp => Box::new(cplex::CplexLpWriter),
        OutputFormat::Ampl => Box::new(ampl::AmplWriter),
        OutputFormat::CouenneAmpl => Box::new(ampl::CouenneAmplWriter),
        OutputFormat::Mints => Box::new(mints::MintsWriter),
    }
}

/// Coefficient table of a linear model.
pub(crate) fn linear_objective(
    model: &Model,
    format: OutputFormat,
) -> Result<&CoefficientTable, WriteError> {
    match &model.objective {
        Objective::Linear(table) => Ok(table),
        Objective::Nonlinear(_) => Err(WriteError::NonlinearObjective { format }),
    }
}

/// Space-joined lines of at most `per_line` tokens.
pub(crate) fn batched_lines(tokens: &[String], per_line: usize) -> Vec<String> {
    tokens
        .chunks(per_line.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Join signed terms with `+`, collapsing `+-` into `-`.
pub(crate) fn join_signed(terms: &[String]) -> String {
    terms.join("+").replace("+-", "-")
}
