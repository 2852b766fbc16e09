pub mod compile;
pub mod constraint;
pub mod expr;
pub mod model;
pub mod nonlinear;
pub mod number;
pub mod objective;
pub mod prefix;
pub mod relax;
pub mod universe;
pub mod validate;
pub mod writer;

pub use compile::{compile, formulate};
