pub mod parse;
pub mod record;
pub mod types;

pub use parse::parse_config;
pub use record::{CostTable, CoverageTable, RecordSet, TestId};
pub use types::FormulatorConfig;
