use crate::analysis::Analysis;
use crate::error::Result;
use crate::expr::Constant;
use crate::solver::{Engine, SharpSatSolver, SmtSolver, SolutionCount};

/// Counts the assignments of the formula's boolean variables that extend to a solution.
#[derive(Clone, Debug, Default)]
pub struct CountSolutionsAnalysis {
    assumptions: Vec<(String, Constant)>,
}

impl CountSolutionsAnalysis {
    pub fn new() -> Self {
        Self::default()
    }
}

named_assumptions!(CountSolutionsAnalysis);

impl Analysis for CountSolutionsAnalysis {
    type Output = SolutionCount;

    fn name(&self) -> &'static str {
        "CountSolutions"
    }

    fn assumptions(&self) -> &[(String, Constant)] {
        &self.assumptions
    }

    fn analyze<E: Engine>(&self, solver: &mut SmtSolver<E>) -> Result<SolutionCount> {
        Ok(solver.count_solutions())
    }
}
