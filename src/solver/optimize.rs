//! Optimization of numeric objectives on top of a plain satisfiability engine.
//!
//! Each objective is refined independently by asserting strictly better bounds in nested
//! scopes. The search first walks away from the current model with exponentially growing
//! steps until a bound is refuted, then bisects the gap between the refuted bound and the
//! best model seen.

use crate::error::{ErrorKind, Result};
use crate::expr::Constant;
use crate::solver::engine::Engine;
use crate::solver::session::{Session, SessionMode};
use crate::solver::term::{Function, Term};
use num_rational::BigRational;
use num_traits::{One, Signed};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OptStatus {
    /// All objectives were refined to within the requested precision.
    Opt,
    /// At least one objective has no finite optimum.
    Unbounded,
    Unsat,
    /// The engine gave up or the refinement budget ran out.
    Undef,
}

impl fmt::Display for OptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opt => write!(f, "opt"),
            Self::Unbounded => write!(f, "unbounded"),
            Self::Unsat => write!(f, "unsat"),
            Self::Undef => write!(f, "undef"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    // Minimization works on the value itself, maximization on its negation.
    fn signed(self, value: BigRational) -> BigRational {
        match self {
            Self::Minimize => value,
            Self::Maximize => -value,
        }
    }
}

/// Refers to an objective registered on a session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ObjectiveHandle(usize);

#[derive(Clone, Debug, Eq, PartialEq, Builder)]
#[builder(default)]
pub struct OptimizationOptions {
    /// Maximal distance between the reported value and the proven bound.
    pub tolerance: BigRational,
    /// Maximal number of engine checks spent per objective.
    pub max_refinements: usize,
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            tolerance: BigRational::new(1.into(), 1000.into()),
            max_refinements: 128,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Outcome {
    /// No model is better than `proven`, `attained` is the best model found.
    Bounded {
        attained: BigRational,
        proven: BigRational,
    },
    Unbounded,
    Undef,
}

#[derive(Clone, Debug)]
pub(super) struct Objective {
    term: Term,
    direction: Direction,
    outcome: Option<Outcome>,
}

enum Probe {
    Improved(BigRational),
    Refuted,
    Unknown,
}

impl<'e, E: Engine> Session<'e, E> {
    pub fn minimize(&mut self, objective: &Term) -> Result<ObjectiveHandle> {
        self.add_objective(objective, Direction::Minimize)
    }

    pub fn maximize(&mut self, objective: &Term) -> Result<ObjectiveHandle> {
        self.add_objective(objective, Direction::Maximize)
    }

    fn add_objective(&mut self, objective: &Term, direction: Direction) -> Result<ObjectiveHandle> {
        self.expect_mode(SessionMode::Optimizing)?;
        objective.sort().expect_numeric()?;

        debug!("{:?} {}", direction, objective);
        self.objectives.push(Objective {
            term: objective.clone(),
            direction,
            outcome: None,
        });
        Ok(ObjectiveHandle(self.objectives.len() - 1))
    }

    /// Checks satisfiability and refines every registered objective.
    pub fn check_optimum(&mut self, options: &OptimizationOptions) -> Result<OptStatus> {
        self.expect_mode(SessionMode::Optimizing)?;

        match self.check()? {
            Some(true) => {}
            Some(false) => return Ok(OptStatus::Unsat),
            None => return Ok(OptStatus::Undef),
        }

        let mut status = OptStatus::Opt;
        for index in 0..self.objectives.len() {
            // Probes of the previous objective discarded the model.
            if index > 0 && self.check()? != Some(true) {
                self.objectives[index].outcome = Some(Outcome::Undef);
                if status == OptStatus::Opt {
                    status = OptStatus::Undef;
                }
                continue;
            }

            let term = self.objectives[index].term.clone();
            let direction = self.objectives[index].direction;

            let outcome = self.refine(&term, direction, options)?;
            status = match (&outcome, status) {
                (Outcome::Unbounded, _) => OptStatus::Unbounded,
                (Outcome::Undef, OptStatus::Opt) => OptStatus::Undef,
                (_, status) => status,
            };
            self.objectives[index].outcome = Some(outcome);
        }

        // Probes popped the model of the initial check.
        if !self.objectives.is_empty() {
            self.last_check = None;
        }

        debug!("Optimization finished with status {}", status);
        Ok(status)
    }

    /// The best value found for `handle` if it is within `epsilon` of the true optimum.
    pub fn bound(&self, handle: ObjectiveHandle, epsilon: &BigRational) -> Option<BigRational> {
        let objective = self.objectives.get(handle.0)?;
        match &objective.outcome {
            Some(Outcome::Bounded { attained, proven }) if (attained - proven).abs() <= *epsilon => {
                Some(attained.clone())
            }
            _ => None,
        }
    }

    fn refine(
        &mut self,
        objective: &Term,
        direction: Direction,
        options: &OptimizationOptions,
    ) -> Result<Outcome> {
        let integral = objective.sort().is_integer();
        let mut best = direction.signed(self.objective_value(objective)?);
        let mut checks = 0;

        // Walk away from the current model until some bound is refuted.
        let mut step = BigRational::one();
        let mut proven = loop {
            if checks >= options.max_refinements {
                debug!("No bound for {} after {} checks", objective, checks);
                return Ok(Outcome::Unbounded);
            }
            checks += 1;

            let probe = &best - &step;
            match self.probe(objective, direction, &probe)? {
                Probe::Improved(value) => {
                    best = value;
                    step = step * BigRational::from_integer(2.into());
                }
                Probe::Refuted => break probe,
                Probe::Unknown => return Ok(Outcome::Undef),
            }
        };

        while &best - &proven > options.tolerance {
            if checks >= options.max_refinements {
                return Ok(Outcome::Undef);
            }
            checks += 1;

            let mut middle = (&proven + &best) / BigRational::from_integer(2.into());
            if integral {
                middle = middle.ceil();
            }
            match self.probe(objective, direction, &middle)? {
                Probe::Improved(value) => best = value,
                Probe::Refuted => proven = middle,
                Probe::Unknown => return Ok(Outcome::Undef),
            }
        }

        Ok(Outcome::Bounded {
            attained: direction.signed(best),
            proven: direction.signed(proven),
        })
    }

    /// Looks for a model whose signed objective value is strictly below `bound`.
    fn probe(&mut self, objective: &Term, direction: Direction, bound: &BigRational) -> Result<Probe> {
        self.engine.push()?;
        let probe = self.probe_in_scope(objective, direction, bound);
        let popped = self.engine.pop();
        let probe = probe?;
        popped?;
        Ok(probe)
    }

    fn probe_in_scope(
        &mut self,
        objective: &Term,
        direction: Direction,
        bound: &BigRational,
    ) -> Result<Probe> {
        let limit = Constant::real(direction.signed(bound.clone())).cast(objective.sort())?;
        let comparison = match direction {
            Direction::Minimize => Function::Lt,
            Direction::Maximize => Function::Gt,
        };
        let constraint = Term::application(
            comparison,
            vec![objective.clone(), Term::constant(limit)],
            crate::expr::Sort::boolean(),
        );
        trace!("probe {}", constraint);
        self.engine.assert(&constraint)?;

        match self.engine.check()? {
            Some(true) => Ok(Probe::Improved(
                direction.signed(self.objective_value(objective)?),
            )),
            Some(false) => Ok(Probe::Refuted),
            None => Ok(Probe::Unknown),
        }
    }

    fn objective_value(&mut self, objective: &Term) -> Result<BigRational> {
        let values = self.engine.values(std::slice::from_ref(objective))?;
        values
            .first()
            .and_then(Constant::to_rational)
            .ok_or_else(|| {
                ErrorKind::Engine(format!("No numeric value for objective {}", objective)).into()
            })
    }
}
