//! lp_solve LP format.
//!
//! Tests are bounded `0<=t<=1` and declared `int` rather than binary: lp_solve
//! rewrites single-variable rows such as `t2>=1` into bounds when the variable
//! is binary, which loses the row.

use std::fmt::Write as _;

use suitemin_ir::types::OutputFormat;

use super::{join_signed, linear_objective, Artifact, ModelWriter, WriteError};
use crate::model::Model;
use crate::number::format_coeff;

pub struct LpSolveWriter;

impl ModelWriter for LpSolveWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::LpSolve
    }

    fn write(&self, model: &Model) -> Result<Vec<Artifact>, WriteError> {
        let table = linear_objective(model, self.format())?;
        let mut out = String::new();

        out.push_str("/*objective function*/\n");
        let terms: Vec<String> = table
            .iter()
            .filter(|(_, c)| *c != 0.0)
            .map(|(var, c)| format!("{} {var}", format_coeff(c)))
            .collect();
        let _ = writeln!(out, "{}: {};", model.direction.keyword(), join_signed(&terms));

        out.push_str("/* constraints */\n");
        for constraint in &model.constraints {
            let _ = writeln!(out, "{constraint};");
        }
        for test in model.tests.iter() {
            let _ = writeln!(out, "0<={test}<=1;");
        }

        out.push_str("/* variables */\n");
        let names: Vec<&str> = model.tests.iter().map(|t| t.as_str()).collect();
        let _ = writeln!(out, "int {};", names.join(","));

        Ok(vec![Artifact::new(format!("{}.lp_solve", model.name), out)])
    }
}
