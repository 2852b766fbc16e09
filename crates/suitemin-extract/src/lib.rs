//! Reading solver results back into a minimized test suite.

pub mod extract;
pub mod format;
pub mod osil;
pub mod parse;
pub mod report;

pub use extract::{
    extract, write_selection, ExtractError, ExtractOptions, Extraction, ReportSource,
};
pub use format::SolutionFormat;
