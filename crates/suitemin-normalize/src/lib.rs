//! Conversion of raw tool output into identifier-keyed record files.
//!
//! Raw inputs name tests by their full (often very long) names and items by
//! arbitrary strings. The normalizer assigns short `t<n>` identifiers, interns
//! items to small integers and writes `cov.info`, `fault.info` and
//! `rtime.info` for the formulator.

pub mod dimension;
pub mod ident;
pub mod normalize;
pub mod times;

pub use normalize::{
    normalize, NormalizeError, NormalizeOptions, NormalizeReport, RequirementsStrategy,
};
