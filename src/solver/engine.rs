use crate::error::Result;
use crate::expr::{Constant, Sort};
use crate::solver::term::{Symbol, Term};

/// Capabilities of an incremental solving engine.
///
/// Engines are driven through a stack of assertion scopes. Everything asserted or declared
/// after a `push` is forgotten by the matching `pop`. Higher-level protocols (model
/// iteration, all-SAT, optimization, unsat cores) are built on top of these primitives by
/// `Session`.
pub trait Engine {
    /// Opens a new assertion scope.
    fn push(&mut self) -> Result<()>;

    /// Discards the innermost assertion scope.
    fn pop(&mut self) -> Result<()>;

    /// Declares a constant symbol in the current scope.
    fn declare(&mut self, symbol: &Symbol, sort: &Sort) -> Result<()>;

    /// Asserts a boolean term in the current scope.
    fn assert(&mut self, constraint: &Term) -> Result<()>;

    /// Checks satisfiability of all asserted terms, `None` if the engine gave up.
    fn check(&mut self) -> Result<Option<bool>>;

    /// Evaluates `terms` in the model of the last successful `check`.
    fn values(&mut self, terms: &[Term]) -> Result<Vec<Constant>>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn push(&mut self) -> Result<()> {
        (**self).push()
    }

    fn pop(&mut self) -> Result<()> {
        (**self).pop()
    }

    fn declare(&mut self, symbol: &Symbol, sort: &Sort) -> Result<()> {
        (**self).declare(symbol, sort)
    }

    fn assert(&mut self, constraint: &Term) -> Result<()> {
        (**self).assert(constraint)
    }

    fn check(&mut self) -> Result<Option<bool>> {
        (**self).check()
    }

    fn values(&mut self, terms: &[Term]) -> Result<Vec<Constant>> {
        (**self).values(terms)
    }
}
