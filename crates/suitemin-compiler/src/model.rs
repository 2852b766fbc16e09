use std::collections::{HashMap, HashSet};
use std::fmt;

use suitemin_ir::types::{Comparison, Direction};
use suitemin_ir::TestId;

use crate::expr::Expr;
use crate::number::format_number;

/// A 0/1 decision variable of the model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Var {
    Test(TestId),
    Aux(AuxVar),
}

/// "Item `item` is credited to test `test`" for one relaxed criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuxVar {
    pub prefix: String,
    pub test: TestId,
    pub item: String,
}

impl Var {
    pub fn test(id: &TestId) -> Self {
        Var::Test(id.clone())
    }

    pub fn as_test(&self) -> Option<&TestId> {
        match self {
            Var::Test(t) => Some(t),
            Var::Aux(_) => None,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Var::Test(t) => write!(f, "{t}"),
            Var::Aux(aux) => write!(f, "{aux}"),
        }
    }
}

impl fmt::Display for AuxVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v_{}_{}_{}", self.prefix, self.test.number(), self.item)
    }
}

// ── Canonical test set ───────────────────────────────────────────────

/// Canonical tests in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TestUniverse {
    order: Vec<TestId>,
    members: HashSet<TestId>,
}

impl TestUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the test was already present.
    pub fn insert(&mut self, test: &TestId) -> bool {
        if self.members.insert(test.clone()) {
            self.order.push(test.clone());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, test: &TestId) -> bool {
        self.members.contains(test)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<'a> FromIterator<&'a TestId> for TestUniverse {
    fn from_iter<I: IntoIterator<Item = &'a TestId>>(iter: I) -> Self {
        let mut universe = TestUniverse::new();
        for test in iter {
            universe.insert(test);
        }
        universe
    }
}

// ── Objective coefficients ───────────────────────────────────────────

/// Variable -> objective coefficient, in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct CoefficientTable {
    entries: Vec<(Var, f64)>,
    index: HashMap<Var, usize>,
}

impl CoefficientTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `delta` to the coefficient of `var`, creating it at 0.
    pub fn add(&mut self, var: Var, delta: f64) {
        match self.index.get(&var) {
            Some(&slot) => self.entries[slot].1 += delta,
            None => self.set(var, delta),
        }
    }

    /// Overwrite the coefficient of `var`.
    pub fn set(&mut self, var: Var, value: f64) {
        match self.index.get(&var) {
            Some(&slot) => self.entries[slot].1 = value,
            None => {
                self.index.insert(var.clone(), self.entries.len());
                self.entries.push((var, value));
            }
        }
    }

    pub fn get(&self, var: &Var) -> Option<f64> {
        self.index.get(var).map(|&slot| self.entries[slot].1)
    }

    pub fn contains(&self, var: &Var) -> bool {
        self.index.contains_key(var)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Var, f64)> {
        self.entries.iter().map(|(v, c)| (v, *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every exact-zero coefficient with `epsilon`.
    pub fn replace_zeros(&mut self, epsilon: f64) {
        for (_, coeff) in &mut self.entries {
            if *coeff == 0.0 {
                *coeff = epsilon;
            }
        }
    }
}

// ── Constraints ──────────────────────────────────────────────────────

/// Integer-weighted sum of variables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearExpr {
    pub terms: Vec<(i64, Var)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unit-weighted sum.
    pub fn sum_of(vars: impl IntoIterator<Item = Var>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (1, v)).collect(),
        }
    }

    pub fn push(&mut self, coeff: i64, var: Var) {
        self.terms.push((coeff, var));
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        self.terms.iter().map(|(_, v)| v)
    }

    /// Render as `a+2<mul>b-c`, `mul` separating a coefficient from its variable.
    pub fn render(&self, mul: &str) -> String {
        let mut out = String::new();
        for (i, (coeff, var)) in self.terms.iter().enumerate() {
            let term = match coeff {
                1 => var.to_string(),
                -1 => format!("-{var}"),
                c => format!("{c}{mul}{var}"),
            };
            if i > 0 && !term.starts_with('-') {
                out.push('+');
            }
            out.push_str(&term);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rhs {
    Constant(f64),
    Var(Var),
}

impl fmt::Display for Rhs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rhs::Constant(c) => f.write_str(&format_number(*c)),
            Rhs::Var(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub lhs: LinearExpr,
    pub op: Comparison,
    pub rhs: Rhs,
}

impl Constraint {
    pub fn new(lhs: LinearExpr, op: Comparison, rhs: Rhs) -> Self {
        Self { lhs, op, rhs }
    }

    /// `Σ tests ≥ 1`
    pub fn at_least_once(tests: impl IntoIterator<Item = Var>) -> Self {
        Self::new(LinearExpr::sum_of(tests), Comparison::Ge, Rhs::Constant(1.0))
    }

    /// Test variables of a pure unit-weight `Σ t ≥ 1` row, `None` otherwise.
    pub fn set_cover_tests(&self) -> Option<Vec<&TestId>> {
        if self.op != Comparison::Ge || self.rhs != Rhs::Constant(1.0) {
            return None;
        }
        self.lhs
            .terms
            .iter()
            .map(|(coeff, var)| if *coeff == 1 { var.as_test() } else { None })
            .collect()
    }

    /// Variables on either side, left to right.
    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        let rhs = match &self.rhs {
            Rhs::Var(v) => Some(v),
            Rhs::Constant(_) => None,
        };
        self.lhs.vars().chain(rhs)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.lhs.render(" "), self.op, self.rhs)
    }
}

/// Insertion-ordered constraint list that drops structural duplicates.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
    seen: HashSet<String>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when an identical constraint is already present.
    pub fn insert(&mut self, constraint: Constraint) -> bool {
        if self.seen.insert(constraint.to_string()) {
            self.constraints.push(constraint);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn into_vec(self) -> Vec<Constraint> {
        self.constraints
    }
}

impl Extend<Constraint> for ConstraintSet {
    fn extend<I: IntoIterator<Item = Constraint>>(&mut self, iter: I) {
        for constraint in iter {
            self.insert(constraint);
        }
    }
}

// ── Model ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Objective {
    Linear(CoefficientTable),
    Nonlinear(Expr),
}

/// A fully formulated model, ready for a dialect writer.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub direction: Direction,
    pub tests: TestUniverse,
    pub objective: Objective,
    pub constraints: Vec<Constraint>,
}

impl Model {
    /// Auxiliary variables, first those of the constraints (in order of
    /// appearance), then any only the objective mentions.
    pub fn aux_vars(&self) -> Vec<&Var> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let from_constraints = self.constraints.iter().flat_map(|c| c.vars());
        let from_objective: Vec<&Var> = match &self.objective {
            Objective::Linear(table) => table.iter().map(|(v, _)| v).collect(),
            Objective::Nonlinear(_) => Vec::new(),
        };
        for var in from_constraints.chain(from_objective) {
            if matches!(var, Var::Aux(_)) && seen.insert(var) {
                out.push(var);
            }
        }
        out
    }
}
