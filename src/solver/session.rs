//! Scoped engine sessions.
//!
//! A `Session` owns exactly one assertion scope of its engine for its whole lifetime. The
//! scope is popped when the session is dropped, no matter how the query using it ended.

use crate::error::{ErrorKind, Result};
use crate::expr::{Constant, Sort};
use crate::solver::engine::Engine;
use crate::solver::optimize::Objective;
use crate::solver::term::{Function, Term};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionMode {
    Plain,
    /// Enables `all_sat`.
    AllSat,
    /// Enables objective registration and `check_optimum`.
    Optimizing,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::AllSat => write!(f, "all-sat"),
            Self::Optimizing => write!(f, "optimizing"),
        }
    }
}

pub struct Session<'e, E: Engine> {
    pub(super) engine: &'e mut E,
    mode: SessionMode,
    declarations: Vec<Term>,
    assertions: Vec<Term>,
    pub(super) last_check: Option<Option<bool>>,
    // Whether this session still owns a scope on the engine.
    open: bool,
    pub(super) objectives: Vec<Objective>,
}

impl<'e, E: Engine> Session<'e, E> {
    pub fn open(engine: &'e mut E, mode: SessionMode) -> Result<Self> {
        engine.push()?;
        debug!("Opened {} session", mode);

        Ok(Self {
            engine,
            mode,
            declarations: Vec::new(),
            assertions: Vec::new(),
            last_check: None,
            open: true,
            objectives: Vec::new(),
        })
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub(super) fn expect_mode(&self, mode: SessionMode) -> Result<()> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(ErrorKind::Engine(format!(
                "Operation requires a {} session but this is a {} session",
                mode, self.mode
            ))
            .into())
        }
    }

    /// Declares the symbol behind `variable` for the lifetime of this session.
    pub fn declare(&mut self, variable: &Term) -> Result<()> {
        let symbol = variable
            .as_symbol()
            .ok_or_else(|| ErrorKind::Engine(format!("Cannot declare non-symbol {}", variable)))?;
        self.engine.declare(symbol, variable.sort())?;
        self.declarations.push(variable.clone());
        Ok(())
    }

    pub fn add_constraint(&mut self, constraint: &Term) -> Result<()> {
        constraint.sort().expect_boolean()?;
        trace!("assert {}", constraint);
        self.engine.assert(constraint)?;
        self.assertions.push(constraint.clone());
        Ok(())
    }

    pub fn assertions(&self) -> &[Term] {
        &self.assertions
    }

    /// Checks satisfiability, `None` means the engine could not decide.
    pub fn check(&mut self) -> Result<Option<bool>> {
        let result = self.engine.check()?;
        self.last_check = Some(result);
        Ok(result)
    }

    /// The values of all declared variables in the current model, as `(name, value)` pairs.
    pub fn model(&mut self) -> Result<Vec<(String, Constant)>> {
        if self.last_check != Some(Some(true)) {
            return Err(ErrorKind::Engine("No model available".to_owned()).into());
        }

        let values = self.engine.values(&self.declarations)?;
        if values.len() != self.declarations.len() {
            return Err(ErrorKind::Engine(format!(
                "Expected {} values but got {}",
                self.declarations.len(),
                values.len()
            ))
            .into());
        }

        self.declarations
            .iter()
            .zip(values)
            .map(|(variable, value)| {
                let symbol = variable.as_symbol().ok_or("Declared non-symbol")?;
                Ok((symbol.name().to_owned(), value))
            })
            .collect()
    }

    /// Enumerates all assignments of the boolean `important` terms which extend to a model.
    ///
    /// `callback` receives each assignment as a list of literals, one per important term.
    /// Without important terms the callback is invoked once if the assertions are satisfiable.
    pub fn all_sat<F>(&mut self, important: &[Term], mut callback: F) -> Result<()>
    where
        F: FnMut(&[Term]),
    {
        self.expect_mode(SessionMode::AllSat)?;
        for term in important {
            term.sort().expect_boolean()?;
        }

        loop {
            match self.check()? {
                Some(true) => {}
                Some(false) => return Ok(()),
                None => {
                    return Err(ErrorKind::Engine(
                        "Engine gave up during all-sat enumeration".to_owned(),
                    )
                    .into())
                }
            }

            if important.is_empty() {
                callback(&[]);
                return Ok(());
            }

            let values = self.engine.values(important)?;
            let literals = important
                .iter()
                .zip(values.iter())
                .map(|(term, value)| match value {
                    Constant::Boolean(true) => Ok(term.clone()),
                    Constant::Boolean(false) => Ok(negate(term)),
                    _ => Err(ErrorKind::Engine(format!(
                        "Boolean term {} has non-boolean value {}",
                        term, value
                    ))
                    .into()),
                })
                .collect::<Result<Vec<Term>>>()?;

            callback(&literals);

            // Block this assignment for the rest of the session.
            let blocking = negate(&conjunction(literals));
            trace!("block {}", blocking);
            self.engine.assert(&blocking)?;
        }
    }

    /// A minimal subset of the asserted constraints which is unsatisfiable on its own.
    ///
    /// Requires the last `check` to have been unsatisfiable. Constraints are removed one at a
    /// time and kept only if the rest turns satisfiable without them.
    pub fn unsat_core(&mut self) -> Result<Vec<Term>> {
        if self.last_check != Some(Some(false)) {
            return Err(ErrorKind::Engine(
                "Unsat core requested without an unsatisfiable check".to_owned(),
            )
            .into());
        }

        let assertions = self.assertions.clone();
        let mut core = assertions.clone();
        let mut position = 0;
        while position < core.len() {
            let candidate: Vec<Term> = core
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != position)
                .map(|(_, term)| term.clone())
                .collect();

            self.reset_scope(&candidate)?;
            match self.engine.check()? {
                Some(false) => core = candidate,
                Some(true) => position += 1,
                None => {
                    return Err(ErrorKind::Engine(
                        "Engine gave up while minimizing the unsat core".to_owned(),
                    )
                    .into())
                }
            }
        }

        self.reset_scope(&assertions)?;
        self.last_check = Some(Some(false));

        debug!(
            "Minimized unsat core from {} to {} constraints",
            assertions.len(),
            core.len()
        );
        Ok(core)
    }

    /// Replaces the session scope by a fresh one holding the declarations and `constraints`.
    fn reset_scope(&mut self, constraints: &[Term]) -> Result<()> {
        self.release()?;
        self.engine.push()?;
        self.open = true;

        for variable in &self.declarations {
            if let Some(symbol) = variable.as_symbol() {
                self.engine.declare(symbol, variable.sort())?;
            }
        }
        for constraint in constraints {
            self.engine.assert(constraint)?;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            self.engine.pop()?;
        }
        Ok(())
    }
}

impl<'e, E: Engine> Drop for Session<'e, E> {
    fn drop(&mut self) {
        match self.release() {
            Ok(()) => debug!("Closed {} session", self.mode),
            Err(e) => warn!("Failed to close {} session: {}", self.mode, e),
        }
    }
}

pub(super) fn negate(term: &Term) -> Term {
    Term::application(Function::Not, vec![term.clone()], Sort::boolean())
}

fn conjunction(mut terms: Vec<Term>) -> Term {
    match terms.len() {
        0 => Term::constant(Constant::boolean(true)),
        1 => terms.remove(0),
        _ => Term::application(Function::And, terms, Sort::boolean()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::reference::ReferenceEngine;
    use crate::solver::term::Symbol;
    use test_log::test;

    fn boolean(name: &str) -> Term {
        Term::symbol(Symbol::new(name), Sort::boolean())
    }

    fn or(lhs: Term, rhs: Term) -> Term {
        Term::application(Function::Or, vec![lhs, rhs], Sort::boolean())
    }

    #[test]
    fn test_drop_releases_scope() {
        let mut engine = ReferenceEngine::new();
        {
            let mut session = Session::open(&mut engine, SessionMode::Plain).unwrap();
            session.declare(&boolean("a")).unwrap();
            session.add_constraint(&boolean("a")).unwrap();
            assert_eq!(session.check().unwrap(), Some(true));
        }
        assert_eq!(engine.depth(), 0);
    }

    #[test]
    fn test_drop_releases_scope_after_failure() {
        let mut engine = ReferenceEngine::new();
        {
            let mut session = Session::open(&mut engine, SessionMode::Plain).unwrap();
            // Not declared, so the engine cannot evaluate it.
            session.add_constraint(&boolean("a")).unwrap();
            assert!(session.check().is_err());
        }
        assert_eq!(engine.depth(), 0);
    }

    #[test]
    fn test_all_sat_requires_all_sat_mode() {
        let mut engine = ReferenceEngine::new();
        let mut session = Session::open(&mut engine, SessionMode::Plain).unwrap();
        session.declare(&boolean("a")).unwrap();

        assert!(session.all_sat(&[boolean("a")], |_| ()).is_err());
    }

    #[test]
    fn test_all_sat_enumerates_important_assignments() {
        let mut engine = ReferenceEngine::new();
        let mut session = Session::open(&mut engine, SessionMode::AllSat).unwrap();
        for name in &["a", "b", "c"] {
            session.declare(&boolean(name)).unwrap();
        }
        session
            .add_constraint(&or(boolean("a"), boolean("b")))
            .unwrap();

        let mut models = Vec::new();
        session
            .all_sat(&[boolean("a"), boolean("b")], |literals| {
                models.push(literals.to_vec())
            })
            .unwrap();

        // c is not important, so only the three assignments of a and b count.
        assert_eq!(models.len(), 3);
    }

    #[test]
    fn test_unsat_core_is_minimal() {
        let mut engine = ReferenceEngine::new();
        let mut session = Session::open(&mut engine, SessionMode::Plain).unwrap();
        session.declare(&boolean("a")).unwrap();
        session.declare(&boolean("b")).unwrap();
        session.add_constraint(&boolean("b")).unwrap();
        session.add_constraint(&boolean("a")).unwrap();
        session.add_constraint(&negate(&boolean("a"))).unwrap();
        assert_eq!(session.check().unwrap(), Some(false));

        let core = session.unsat_core().unwrap();

        assert_eq!(core, vec![boolean("a"), negate(&boolean("a"))]);
        // The full scope is restored afterwards.
        assert_eq!(session.check().unwrap(), Some(false));
    }

    #[test]
    fn test_unsat_core_requires_unsat_check() {
        let mut engine = ReferenceEngine::new();
        let mut session = Session::open(&mut engine, SessionMode::Plain).unwrap();
        session.declare(&boolean("a")).unwrap();
        session.add_constraint(&boolean("a")).unwrap();
        assert_eq!(session.check().unwrap(), Some(true));

        assert!(session.unsat_core().is_err());
    }

    #[test]
    fn test_model_names_declared_variables() {
        let mut engine = ReferenceEngine::new();
        let mut session = Session::open(&mut engine, SessionMode::Plain).unwrap();
        session.declare(&boolean("a")).unwrap();
        session.declare(&boolean("b")).unwrap();
        session.add_constraint(&negate(&boolean("a"))).unwrap();
        session.add_constraint(&boolean("b")).unwrap();
        session.check().unwrap();

        assert_eq!(
            session.model().unwrap(),
            vec![
                ("a".to_owned(), Constant::boolean(false)),
                ("b".to_owned(), Constant::boolean(true)),
            ]
        );
    }
}
