//! CPLEX LP format.
//!
//! Objective tokens and binary declarations are emitted at most
//! [`TOKENS_PER_LINE`] per line; CPLEX rejects overlong lines.

use std::fmt::Write as _;

use suitemin_ir::types::OutputFormat;

use super::{batched_lines, linear_objective, Artifact, ModelWriter, WriteError};
use crate::model::{Constraint, Model, Rhs};
use crate::number::{format_coeff, format_number};

pub const TOKENS_PER_LINE: usize = 500;

pub struct CplexLpWriter;

impl ModelWriter for CplexLpWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::CplexLp
    }

    fn write(&self, model: &Model) -> Result<Vec<Artifact>, WriteError> {
        let table = linear_objective(model, self.format())?;
        let mut out = String::new();

        let _ = write!(out, "{}\n\n", model.direction.long_keyword());
        let tokens: Vec<String> = table
            .iter()
            .filter(|(_, c)| *c != 0.0)
            .map(|(var, c)| {
                let coeff = format_coeff(c);
                if coeff.starts_with('-') {
                    format!("{coeff} {var}")
                } else {
                    format!("+{coeff} {var}")
                }
            })
            .collect();
        if tokens.is_empty() {
            out.push('\n');
        }
        for line in batched_lines(&tokens, TOKENS_PER_LINE) {
            let _ = writeln!(out, "{line}");
        }
        out.push('\n');

        out.push_str("subject to\n\n");
        for constraint in &model.constraints {
            let _ = writeln!(out, "{}", render_constraint(constraint));
        }
        out.push('\n');

        out.push_str("binary\n\n");
        let names: Vec<String> = model
            .tests
            .iter()
            .map(|t| t.to_string())
            .chain(model.aux_vars().into_iter().map(|v| v.to_string()))
            .collect();
        for line in batched_lines(&names, TOKENS_PER_LINE) {
            let _ = writeln!(out, "{line}");
        }
        out.push_str("\nend");

        Ok(vec![Artifact::new(format!("{}.cplex.lp", model.name), out)])
    }
}

/// Non-negative integer bounds stay on the right; anything else moves left
/// so the row reads `lhs-rhs<op>0`.
fn render_constraint(constraint: &Constraint) -> String {
    let lhs = constraint.lhs.render(" ");
    let op = constraint.op;
    match &constraint.rhs {
        Rhs::Constant(c) if *c >= 0.0 && c.fract() == 0.0 => {
            format!("{lhs}{op}{}", format_number(*c))
        }
        Rhs::Constant(c) if *c < 0.0 => format!("{lhs}+{}{op}0", format_number(-*c)),
        Rhs::Constant(c) => format!("{lhs}-{}{op}0", format_number(*c)),
        Rhs::Var(v) => format!("{lhs}-{v}{op}0"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearExpr, Var};
    use suitemin_ir::types::Comparison;
    use suitemin_ir::TestId;

    fn lhs() -> LinearExpr {
        LinearExpr::sum_of([Var::Test(TestId::new("t1")), Var::Test(TestId::new("t2"))])
    }

    #[test]
    fn test_integer_rhs_stays_right() {
        let c = Constraint::new(lhs(), Comparison::Ge, Rhs::Constant(1.0));
        assert_eq!(render_constraint(&c), "t1+t2>=1");
    }

    #[test]
    fn test_fractional_rhs_moves_left() {
        let c = Constraint::new(lhs(), Comparison::Le, Rhs::Constant(2.5));
        assert_eq!(render_constraint(&c), "t1+t2-2.5<=0");
    }

    #[test]
    fn test_negative_rhs_moves_left_with_plus() {
        let c = Constraint::new(lhs(), Comparison::Ge, Rhs::Constant(-3.0));
        assert_eq!(render_constraint(&c), "t1+t2+3>=0");
    }

    #[test]
    fn test_variable_rhs_moves_left() {
        let c = Constraint::new(
            LinearExpr::sum_of([Var::Test(TestId::new("t1"))]),
            Comparison::Le,
            Rhs::Var(Var::Test(TestId::new("t9"))),
        );
        assert_eq!(render_constraint(&c), "t1-t9<=0");
    }
}
