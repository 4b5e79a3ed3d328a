use crate::analysis::Analysis;
use crate::error::Result;
use crate::expr::Constant;
use crate::solver::{Engine, SatResult, SatSolver, SmtSolver, Solution, SolutionSolver};

/// Decides whether the formula has a solution.
#[derive(Clone, Debug, Default)]
pub struct HasSolutionAnalysis {
    assumptions: Vec<(String, Constant)>,
}

impl HasSolutionAnalysis {
    pub fn new() -> Self {
        Self::default()
    }
}

named_assumptions!(HasSolutionAnalysis);

impl Analysis for HasSolutionAnalysis {
    type Output = SatResult;

    fn name(&self) -> &'static str {
        "HasSolution"
    }

    fn assumptions(&self) -> &[(String, Constant)] {
        &self.assumptions
    }

    fn analyze<E: Engine>(&self, solver: &mut SmtSolver<E>) -> Result<SatResult> {
        Ok(solver.has_solution())
    }
}

/// Finds some solution of the formula.
#[derive(Clone, Debug, Default)]
pub struct GetSolutionAnalysis {
    assumptions: Vec<(String, Constant)>,
}

impl GetSolutionAnalysis {
    pub fn new() -> Self {
        Self::default()
    }
}

named_assumptions!(GetSolutionAnalysis);

impl Analysis for GetSolutionAnalysis {
    type Output = Option<Solution>;

    fn name(&self) -> &'static str {
        "GetSolution"
    }

    fn assumptions(&self) -> &[(String, Constant)] {
        &self.assumptions
    }

    fn analyze<E: Engine>(&self, solver: &mut SmtSolver<E>) -> Result<Option<Solution>> {
        Ok(solver.find_solution())
    }
}
