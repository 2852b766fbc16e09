//! AMPL models: linear coefficients (`ampl`) or the symbolic polynomial
//! (`couenne_ampl`). Both share declarations and numbered constraints.

use std::fmt::Write as _;

use suitemin_ir::types::OutputFormat;

use super::{join_signed, linear_objective, Artifact, ModelWriter, WriteError};
use crate::model::{Model, Objective};
use crate::number::format_coeff;

pub struct AmplWriter;

pub struct CouenneAmplWriter;

impl ModelWriter for AmplWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Ampl
    }

    fn write(&self, model: &Model) -> Result<Vec<Artifact>, WriteError> {
        let table = linear_objective(model, self.format())?;
        let terms: Vec<String> = table
            .iter()
            .filter(|(_, c)| *c != 0.0)
            .map(|(var, c)| format!("{}*{var}", format_coeff(c)))
            .collect();
        let out = render(model, &join_signed(&terms));
        Ok(vec![Artifact::new(format!("{}.ampl", model.name), out)])
    }
}

impl ModelWriter for CouenneAmplWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::CouenneAmpl
    }

    fn write(&self, model: &Model) -> Result<Vec<Artifact>, WriteError> {
        let Objective::Nonlinear(expr) = &model.objective else {
            return Err(WriteError::LinearObjective {
                format: self.format(),
            });
        };
        let out = render(model, &expr.to_string());
        Ok(vec![Artifact::new(format!("{}.ampl", model.name), out)])
    }
}

fn render(model: &Model, objective: &str) -> String {
    let mut out = String::new();
    for test in model.tests.iter() {
        let _ = writeln!(out, "var {test} binary;");
    }
    for aux in model.aux_vars() {
        let _ = writeln!(out, "var {aux} binary;");
    }
    let _ = writeln!(out, "{} obj:{objective};", model.direction.long_keyword());
    for (i, constraint) in model.constraints.iter().enumerate() {
        let _ = writeln!(
            out,
            "subject to c{}: {}{}{};",
            i + 1,
            constraint.lhs.render("*"),
            constraint.op,
            constraint.rhs
        );
    }
    out
}
