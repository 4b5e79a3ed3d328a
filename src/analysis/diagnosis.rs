use crate::analysis::Analysis;
use crate::error::Result;
use crate::expr::Constant;
use crate::solver::{Engine, MusSolver, SmtSolver, Term};

/// Explains unsatisfiability by a minimal subset of the formula's conjuncts and assumptions.
#[derive(Clone, Debug, Default)]
pub struct MinimalUnsatisfiableSubsetAnalysis {
    assumptions: Vec<(String, Constant)>,
}

impl MinimalUnsatisfiableSubsetAnalysis {
    pub fn new() -> Self {
        Self::default()
    }
}

named_assumptions!(MinimalUnsatisfiableSubsetAnalysis);

impl Analysis for MinimalUnsatisfiableSubsetAnalysis {
    type Output = Option<Vec<Term>>;

    fn name(&self) -> &'static str {
        "MinimalUnsatisfiableSubset"
    }

    fn assumptions(&self) -> &[(String, Constant)] {
        &self.assumptions
    }

    fn analyze<E: Engine>(&self, solver: &mut SmtSolver<E>) -> Result<Option<Vec<Term>>> {
        Ok(solver.minimal_unsatisfiable_subset())
    }
}
