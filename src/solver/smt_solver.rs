use crate::error::{ErrorKind, Result};
use crate::expr::{Constant, Expression};
use crate::formula::{Formula, VariableMap};
use crate::solver::assumptions::Assumptions;
use crate::solver::engine::Engine;
use crate::solver::optimize::{Direction, OptStatus, OptimizationOptions};
use crate::solver::session::{Session, SessionMode};
use crate::solver::term::Term;
use crate::solver::translator::{FormulaTranslator, TranslatedFormula};
use crate::solver::{
    MusSolver, OptSolver, SatResult, SatSolver, SharpSatSolver, Solution, SolutionCount,
    SolutionSolver,
};
use num_bigint::BigUint;
use num_rational::BigRational;
use num_traits::Zero;

/// Answers queries about a single formula using an SMT engine.
///
/// The formula is translated once on construction. Every query runs in its own session on
/// the engine, so queries never see each other's temporary constraints. Engine failures
/// during a query are logged and reported through the query's result, translation failures
/// of the formula itself are returned by the constructor.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct SmtSolver<E: Engine> {
    #[derivative(Debug = "ignore")]
    engine: E,
    formula: TranslatedFormula,
    assumptions: Assumptions,
    optimization: OptimizationOptions,
}

impl<E: Engine> SmtSolver<E> {
    pub fn new(formula: &Formula, engine: E) -> Result<Self> {
        Self::with_options(formula, engine, OptimizationOptions::default())
    }

    pub fn with_options(
        formula: &Formula,
        engine: E,
        optimization: OptimizationOptions,
    ) -> Result<Self> {
        let formula = FormulaTranslator::new().translate(formula)?;
        Ok(Self {
            engine,
            formula,
            assumptions: Assumptions::new(),
            optimization,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn translated_formula(&self) -> &TranslatedFormula {
        &self.formula
    }

    pub fn variable_map(&self) -> &VariableMap {
        self.formula.variable_map()
    }

    /// The native term of the variable called `name`.
    pub fn variable_term(&self, name: &str) -> Option<&Term> {
        self.variable_map()
            .index_of(name)
            .and_then(|index| self.formula.variable(index))
    }

    /// Translates an expression over the formula's variables, e.g. an objective.
    pub fn translate(&self, expr: &Expression) -> Result<Term> {
        self.formula.translate_expression(expr)
    }

    /// Assumes `value` for the variable called `name` in all following queries.
    pub fn assume<V: Into<Constant>>(&mut self, name: &str, value: V) -> Result<()> {
        self.assumptions
            .set_by_name(self.formula.variable_map(), name, value)?;
        Ok(())
    }

    pub fn optimization_options(&self) -> &OptimizationOptions {
        &self.optimization
    }

    fn decode_solution(&mut self) -> Result<Option<Solution>> {
        let mut session = open_session(
            &mut self.engine,
            &self.formula,
            &self.assumptions,
            SessionMode::Plain,
        )?;
        if session.check()? != Some(true) {
            return Ok(None);
        }

        let variable_map = self.formula.variable_map();
        let mut solution = Solution::new(variable_map.variable_count());
        for (name, value) in session.model()? {
            let index = variable_map.index_of(&name).ok_or_else(|| {
                ErrorKind::Engine(format!("Model contains unknown variable {}", name))
            })?;
            solution.set(index, value)?;
        }
        Ok(Some(solution))
    }

    fn enumerate_solutions(&mut self) -> Result<BigUint> {
        let mut session = open_session(
            &mut self.engine,
            &self.formula,
            &self.assumptions,
            SessionMode::AllSat,
        )?;

        let mut count = BigUint::zero();
        session.all_sat(self.formula.boolean_variables(), |_| count += 1u32)?;
        Ok(count)
    }

    fn optimize(&mut self, objective: &Term, direction: Direction) -> Option<BigRational> {
        match self.find_optimum(objective, direction) {
            Ok(bound) => bound,
            Err(e) => {
                error!("Optimization of {} failed: {}", objective, e);
                None
            }
        }
    }

    fn find_optimum(
        &mut self,
        objective: &Term,
        direction: Direction,
    ) -> Result<Option<BigRational>> {
        let mut session = open_session(
            &mut self.engine,
            &self.formula,
            &self.assumptions,
            SessionMode::Optimizing,
        )?;
        let handle = match direction {
            Direction::Minimize => session.minimize(objective)?,
            Direction::Maximize => session.maximize(objective)?,
        };

        let status = session.check_optimum(&self.optimization)?;
        if status != OptStatus::Opt {
            debug!("No optimum for {}: {}", objective, status);
            return Ok(None);
        }
        Ok(session.bound(handle, &self.optimization.tolerance))
    }

    fn diagnose(&mut self) -> Result<Vec<Term>> {
        let mut session = open_session(
            &mut self.engine,
            &self.formula,
            &self.assumptions,
            SessionMode::Plain,
        )?;

        match session.check()? {
            Some(true) => Ok(Vec::new()),
            Some(false) => Ok(session
                .unsat_core()?
                .into_iter()
                .filter(|constraint| !constraint.is_true())
                .collect()),
            None => Err(
                ErrorKind::Engine("Engine could not decide satisfiability".to_owned()).into(),
            ),
        }
    }
}

/// Opens a session holding the formula's declarations, its constraints and the assumptions.
fn open_session<'e, E: Engine>(
    engine: &'e mut E,
    formula: &TranslatedFormula,
    assumptions: &Assumptions,
    mode: SessionMode,
) -> Result<Session<'e, E>> {
    let assumed = assumptions.encode(formula)?;

    let mut session = Session::open(engine, mode)?;
    for variable in formula.variables().iter().flatten() {
        session.declare(variable)?;
    }
    for constraint in formula.constraints().iter().chain(assumed.iter()) {
        session.add_constraint(constraint)?;
    }
    Ok(session)
}

impl<E: Engine> SatSolver for SmtSolver<E> {
    fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    fn assumptions_mut(&mut self) -> &mut Assumptions {
        &mut self.assumptions
    }

    fn has_solution(&mut self) -> SatResult {
        let result = open_session(
            &mut self.engine,
            &self.formula,
            &self.assumptions,
            SessionMode::Plain,
        )
        .and_then(|mut session| session.check());

        match result {
            Ok(Some(true)) => SatResult::Satisfiable,
            Ok(Some(false)) => SatResult::Unsatisfiable,
            Ok(None) => {
                debug!("Engine could not decide satisfiability");
                SatResult::Unknown
            }
            Err(e) => {
                error!("Satisfiability check failed: {}", e);
                SatResult::Unknown
            }
        }
    }
}

impl<E: Engine> SolutionSolver for SmtSolver<E> {
    type Solution = Solution;

    fn solution(&mut self) -> Option<Solution> {
        match self.decode_solution() {
            Ok(solution) => solution,
            Err(e) => {
                error!("Retrieving a solution failed: {}", e);
                None
            }
        }
    }
}

impl<E: Engine> SharpSatSolver for SmtSolver<E> {
    fn count_solutions(&mut self) -> SolutionCount {
        match self.enumerate_solutions() {
            Ok(count) => SolutionCount::Count(count),
            Err(e) => {
                error!("Counting solutions failed: {}", e);
                SolutionCount::Failed
            }
        }
    }
}

impl<E: Engine> OptSolver for SmtSolver<E> {
    type Objective = Term;
    type Bound = BigRational;

    fn minimum(&mut self, objective: &Term) -> Option<BigRational> {
        self.optimize(objective, Direction::Minimize)
    }

    fn maximum(&mut self, objective: &Term) -> Option<BigRational> {
        self.optimize(objective, Direction::Maximize)
    }
}

impl<E: Engine> MusSolver for SmtSolver<E> {
    type Constraint = Term;

    fn minimal_unsatisfiable_subset(&mut self) -> Option<Vec<Term>> {
        match self.diagnose() {
            Ok(subset) => Some(subset),
            Err(e) => {
                error!("Computing a minimal unsatisfiable subset failed: {}", e);
                None
            }
        }
    }
}
