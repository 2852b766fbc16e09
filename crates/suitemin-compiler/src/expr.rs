//! Symbolic polynomial objective for the unrelaxed nonlinear path.
//!
//! Rendering follows AMPL syntax. Parentheses are emitted only where the
//! tree needs them: a sum, difference or multi-factor product nested as a
//! factor, and a sum or difference on the right of a difference.

use std::fmt;

use crate::model::Var;
use crate::number::format_number;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(Var),
    Const(f64),
    Sum(Vec<Expr>),
    Product(Vec<Expr>),
    Sub(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(var: Var) -> Self {
        Expr::Var(var)
    }

    pub fn constant(c: f64) -> Self {
        Expr::Const(c)
    }

    /// Sum of `terms`; nested sums are spliced in.
    pub fn sum(terms: Vec<Expr>) -> Self {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Expr::Sum(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        Expr::Sum(flat)
    }

    pub fn product(factors: Vec<Expr>) -> Self {
        Expr::Product(factors)
    }

    pub fn difference(lhs: Expr, rhs: Expr) -> Self {
        Expr::Sub(Box::new(lhs), Box::new(rhs))
    }

    /// `(1-x)`
    pub fn complement(x: Expr) -> Self {
        Expr::product(vec![Expr::difference(Expr::constant(1.0), x)])
    }

    /// Evaluate with `value` giving each variable's assignment.
    pub fn eval<F: Fn(&Var) -> f64>(&self, value: &F) -> f64 {
        match self {
            Expr::Var(v) => value(v),
            Expr::Const(c) => *c,
            Expr::Sum(terms) => terms.iter().map(|t| t.eval(value)).sum(),
            Expr::Product(factors) => factors.iter().map(|f| f.eval(value)).product(),
            Expr::Sub(lhs, rhs) => lhs.eval(value) - rhs.eval(value),
        }
    }

    /// Every variable occurrence, left to right.
    pub fn vars(&self) -> Vec<&Var> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars<'a>(&'a self, out: &mut Vec<&'a Var>) {
        match self {
            Expr::Var(v) => out.push(v),
            Expr::Const(_) => {}
            Expr::Sum(children) | Expr::Product(children) => {
                for child in children {
                    child.collect_vars(out);
                }
            }
            Expr::Sub(lhs, rhs) => {
                lhs.collect_vars(out);
                rhs.collect_vars(out);
            }
        }
    }

    fn needs_parens_as_factor(&self) -> bool {
        match self {
            Expr::Sum(_) | Expr::Sub(..) => true,
            Expr::Product(factors) => factors.len() > 1,
            Expr::Var(_) | Expr::Const(_) => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(v) => write!(f, "{v}"),
            Expr::Const(c) => f.write_str(&format_number(*c)),
            Expr::Sum(terms) => {
                if terms.is_empty() {
                    return f.write_str("0");
                }
                for (i, term) in terms.iter().enumerate() {
                    let rendered = term.to_string();
                    if i > 0 {
                        f.write_str(if rendered.starts_with('-') { "\n" } else { "\n+" })?;
                    }
                    f.write_str(&rendered)?;
                }
                Ok(())
            }
            Expr::Product(factors) => {
                if factors.is_empty() {
                    return f.write_str("1");
                }
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("*")?;
                    }
                    if factor.needs_parens_as_factor() {
                        write!(f, "({factor})")?;
                    } else {
                        write!(f, "{factor}")?;
                    }
                }
                Ok(())
            }
            Expr::Sub(lhs, rhs) => {
                write!(f, "{lhs}-")?;
                match rhs.as_ref() {
                    Expr::Sum(_) | Expr::Sub(..) => write!(f, "({rhs})"),
                    _ => write!(f, "{rhs}"),
                }
            }
        }
    }
}
