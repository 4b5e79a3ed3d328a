use crate::environment::Environment;
use crate::error::Result;
use crate::expr::Constant;
use crate::formula::{Formula, VariableMap};
use num_bigint::{BigInt, BigUint};
use std::fmt;

mod assumptions;
mod engine;
mod optimize;
#[cfg(test)]
mod reference;
mod rsmt;
mod session;
mod smt_solver;
mod term;
mod translator;

pub use self::assumptions::Assumptions;
pub use self::engine::Engine;
pub use self::optimize::{
    Direction, ObjectiveHandle, OptStatus, OptimizationOptions, OptimizationOptionsBuilder,
};
#[cfg(test)]
pub(crate) use self::reference::ReferenceEngine;
pub use self::rsmt::RsmtEngine;
pub use self::session::{Session, SessionMode};
pub use self::smt_solver::SmtSolver;
pub use self::term::{Function, Symbol, Term, TermKind};
pub use self::translator::{FormulaTranslator, TranslatedFormula};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SatResult {
    Satisfiable,
    Unsatisfiable,
    /// The engine could not decide, or the check failed.
    Unknown,
}

impl fmt::Display for SatResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfiable => write!(f, "SAT"),
            Self::Unsatisfiable => write!(f, "UNSAT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A full assignment, indexed like the variable map.
///
/// Slot 0 is always empty, slot `i` holds the value of the variable with index `i`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Solution {
    values: Vec<Option<Constant>>,
}

impl Solution {
    pub fn new(variable_count: usize) -> Self {
        Self {
            values: vec![None; variable_count + 1],
        }
    }

    /// Number of slots, i.e. the variable count plus one.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.len() <= 1
    }

    pub fn get(&self, index: usize) -> Option<&Constant> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn set(&mut self, index: usize, value: Constant) -> Result<()> {
        match self.values.get_mut(index) {
            Some(slot) if index > 0 => {
                *slot = Some(value);
                Ok(())
            }
            _ => Err(format!("Solution has no slot for index {}", index).into()),
        }
    }

    pub fn value_of(&self, variable_map: &VariableMap, name: &str) -> Option<&Constant> {
        variable_map
            .index_of(name)
            .and_then(|index| self.get(index))
    }

    pub fn values(&self) -> &[Option<Constant>] {
        &self.values
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, value) in self.values.iter().enumerate().skip(1) {
            if index > 1 {
                write!(f, ", ")?;
            }
            match value {
                Some(value) => write!(f, "{}", value)?,
                None => write!(f, "_")?,
            }
        }
        write!(f, "]")
    }
}

/// Outcome of a model count.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum SolutionCount {
    Count(BigUint),
    /// The enumeration did not complete.
    Failed,
}

impl SolutionCount {
    pub fn count(&self) -> Option<&BigUint> {
        match self {
            Self::Count(count) => Some(count),
            Self::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// The count as a signed number, `-1` if counting failed.
    pub fn to_signed(&self) -> BigInt {
        match self {
            Self::Count(count) => BigInt::from(count.clone()),
            Self::Failed => BigInt::from(-1),
        }
    }
}

impl fmt::Display for SolutionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_signed())
    }
}

pub trait SatSolver {
    fn assumptions(&self) -> &Assumptions;
    fn assumptions_mut(&mut self) -> &mut Assumptions;

    /// Decides satisfiability of the formula under the current assumptions.
    fn has_solution(&mut self) -> SatResult;
}

pub trait SolutionSolver: SatSolver {
    type Solution;

    /// Some satisfying assignment, `None` if there is none or it could not be determined.
    fn solution(&mut self) -> Option<Self::Solution>;

    fn find_solution(&mut self) -> Option<Self::Solution> {
        self.solution()
    }
}

pub trait SharpSatSolver: SatSolver {
    /// Number of distinct assignments of the boolean variables which extend to a model.
    fn count_solutions(&mut self) -> SolutionCount;
}

pub trait OptSolver: SatSolver {
    type Objective;
    type Bound;

    fn minimum(&mut self, objective: &Self::Objective) -> Option<Self::Bound>;
    fn maximum(&mut self, objective: &Self::Objective) -> Option<Self::Bound>;
}

pub trait MusSolver: SatSolver {
    type Constraint;

    /// A minimal unsatisfiable subset of the constraints, empty if the formula is satisfiable.
    fn minimal_unsatisfiable_subset(&mut self) -> Option<Vec<Self::Constraint>>;

    /// Only a single subset is computed.
    fn all_minimal_unsatisfiable_subsets(&mut self) -> Option<Vec<Vec<Self::Constraint>>> {
        self.minimal_unsatisfiable_subset().map(|subset| vec![subset])
    }
}

pub fn create_engine(env: &Environment) -> Result<RsmtEngine> {
    RsmtEngine::new_from_env(env)
}

pub fn create_solver(formula: &Formula, env: &Environment) -> Result<SmtSolver<RsmtEngine>> {
    let engine = create_engine(env)?;
    SmtSolver::with_options(formula, engine, env.optimization_options()?)
}
