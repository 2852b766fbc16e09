pub mod pipeline;
pub mod project;

pub use pipeline::{run_formulation, FormulationReport, PipelineError};
pub use project::Project;
