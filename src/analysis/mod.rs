//! Ready-made queries bundling assumptions with one solver operation.

use crate::environment::Environment;
use crate::error::Result;
use crate::expr::Constant;
use crate::formula::Formula;
use crate::solver::{self, Engine, SatSolver, SmtSolver};

macro_rules! named_assumptions {
    ( $name:ident ) => {
        impl $name {
            /// Assumes `value` for the variable called `variable`.
            pub fn with_assumption<V: Into<Constant>>(mut self, variable: &str, value: V) -> Self {
                self.assumptions.push((variable.to_owned(), value.into()));
                self
            }
        }
    };
}

mod counting;
mod diagnosis;
mod optimization;
mod satisfiability;

pub use self::counting::CountSolutionsAnalysis;
pub use self::diagnosis::MinimalUnsatisfiableSubsetAnalysis;
pub use self::optimization::{MaximumAnalysis, MinimumAnalysis};
pub use self::satisfiability::{GetSolutionAnalysis, HasSolutionAnalysis};

pub trait Analysis {
    type Output;

    /// Name of the analysis.
    fn name(&self) -> &'static str;

    /// Assumptions by variable name, applied in order before the analysis runs.
    fn assumptions(&self) -> &[(String, Constant)];

    /// Runs the analysis on `solver`, whose assumptions are already in place.
    fn analyze<E: Engine>(&self, solver: &mut SmtSolver<E>) -> Result<Self::Output>;

    /// Runs the analysis on `formula` using `engine`.
    fn execute<E: Engine>(&self, formula: &Formula, engine: E) -> Result<Self::Output> {
        let mut solver = SmtSolver::new(formula, engine)?;
        run(self, &mut solver)
    }

    /// Runs the analysis on `formula` using the engine configured by `env`.
    fn execute_in(&self, env: &Environment, formula: &Formula) -> Result<Self::Output> {
        let mut solver = solver::create_solver(formula, env)?;
        run(self, &mut solver)
    }
}

fn run<A, E>(analysis: &A, solver: &mut SmtSolver<E>) -> Result<A::Output>
where
    A: Analysis + ?Sized,
    E: Engine,
{
    for (variable, value) in analysis.assumptions() {
        solver.assume(variable, value.clone())?;
    }

    debug!(
        "Running {} analysis with assumptions {}",
        analysis.name(),
        solver.assumptions()
    );
    analysis.analyze(solver)
}
