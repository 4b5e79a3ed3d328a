//! Exhaustive engine over small finite domains, used to test the protocols built on `Engine`.
//!
//! Boolean variables range over both truth values. Integer variables range over `-4..=4`
//! and every integer constant of the active assertions together with its two neighbours, so
//! a bound asserted during optimization always brings a value just past it into scope.
//! Real variables additionally range over the midpoints between adjacent integer domain
//! values and constants, so strict bounds on both sides of a gap stay satisfiable.
//! Models are searched in declaration order with ascending values.

use crate::error::{Error, ErrorKind, Result};
use crate::expr::{Constant, Sort};
use crate::solver::engine::Engine;
use crate::solver::term::{Function, Symbol, Term, TermKind};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Behaviour {
    Exhaustive,
    Failing,
    Unknown,
}

#[derive(Clone, Debug, Default)]
struct Scope {
    declarations: Vec<(String, Sort)>,
    assertions: Vec<Term>,
}

#[derive(Clone, Debug)]
pub struct ReferenceEngine {
    behaviour: Behaviour,
    scopes: Vec<Scope>,
    model: Option<HashMap<String, Constant>>,
    checks: usize,
}

impl ReferenceEngine {
    pub fn new() -> Self {
        Self::with_behaviour(Behaviour::Exhaustive)
    }

    /// An engine whose `check` always fails.
    pub fn failing() -> Self {
        Self::with_behaviour(Behaviour::Failing)
    }

    /// An engine whose `check` never decides.
    pub fn unknown() -> Self {
        Self::with_behaviour(Behaviour::Unknown)
    }

    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            scopes: vec![Scope::default()],
            model: None,
            checks: 0,
        }
    }

    /// Number of open scopes above the base scope.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Number of `check` calls so far.
    pub fn checks(&self) -> usize {
        self.checks
    }

    fn declarations(&self) -> impl Iterator<Item = &(String, Sort)> {
        self.scopes.iter().flat_map(|scope| scope.declarations.iter())
    }

    fn assertions(&self) -> impl Iterator<Item = &Term> {
        self.scopes.iter().flat_map(|scope| scope.assertions.iter())
    }

    fn integer_domain(&self) -> Vec<Constant> {
        let mut domain: BTreeSet<BigInt> = (-4..=4).map(BigInt::from).collect();
        for term in self.assertions() {
            for constant in term.constants() {
                if let Some(value) = constant.to_rational() {
                    let floor = value.floor().to_integer();
                    domain.insert(&floor - BigInt::one());
                    domain.insert(&floor + BigInt::one());
                    domain.insert(floor);
                }
            }
        }
        domain.into_iter().map(Constant::Integer).collect()
    }

    fn real_domain(&self) -> Vec<Constant> {
        let mut points: BTreeSet<BigRational> = (-4..=4)
            .map(|value| BigRational::from_integer(value.into()))
            .collect();
        for term in self.assertions() {
            for constant in term.constants() {
                if let Some(value) = constant.to_rational() {
                    points.insert(&value - BigRational::one());
                    points.insert(&value + BigRational::one());
                    points.insert(value);
                }
            }
        }

        let two = BigRational::from_integer(2.into());
        let midpoints: Vec<BigRational> = points
            .iter()
            .zip(points.iter().skip(1))
            .map(|(lower, upper)| (lower + upper) / &two)
            .collect();
        points.extend(midpoints);
        points.into_iter().map(Constant::Real).collect()
    }

    fn search(&self) -> Result<Option<HashMap<String, Constant>>> {
        let integers = self.integer_domain();
        let reals = self.real_domain();
        let mut domains = Vec::new();
        for (name, sort) in self.declarations() {
            let domain = match sort {
                Sort::Boolean => vec![Constant::boolean(false), Constant::boolean(true)],
                Sort::Integer => integers.clone(),
                Sort::Real => reals.clone(),
            };
            domains.push((name.clone(), domain));
        }

        let mut positions = vec![0; domains.len()];
        loop {
            let model: HashMap<String, Constant> = domains
                .iter()
                .zip(positions.iter())
                .map(|((name, domain), &position)| (name.clone(), domain[position].clone()))
                .collect();

            let mut satisfied = true;
            for assertion in self.assertions() {
                if !evaluate(assertion, &model)?.unwrap_boolean() {
                    satisfied = false;
                    break;
                }
            }
            if satisfied {
                return Ok(Some(model));
            }

            // Advance the last variable fastest.
            let mut index = domains.len();
            loop {
                if index == 0 {
                    return Ok(None);
                }
                index -= 1;
                positions[index] += 1;
                if positions[index] < domains[index].1.len() {
                    break;
                }
                positions[index] = 0;
            }
        }
    }
}

impl Engine for ReferenceEngine {
    fn push(&mut self) -> Result<()> {
        self.model = None;
        self.scopes.push(Scope::default());
        Ok(())
    }

    fn pop(&mut self) -> Result<()> {
        self.model = None;
        if self.depth() == 0 {
            return Err(ErrorKind::Engine("Pop without matching push".to_owned()).into());
        }
        self.scopes.pop();
        Ok(())
    }

    fn declare(&mut self, symbol: &Symbol, sort: &Sort) -> Result<()> {
        self.model = None;
        if self.declarations().any(|(name, _)| name == symbol.name()) {
            return Err(ErrorKind::Engine(format!("Symbol {} is already declared", symbol)).into());
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope
                .declarations
                .push((symbol.name().to_owned(), sort.clone()));
        }
        Ok(())
    }

    fn assert(&mut self, constraint: &Term) -> Result<()> {
        self.model = None;
        constraint.sort().expect_boolean()?;
        if let Some(scope) = self.scopes.last_mut() {
            scope.assertions.push(constraint.clone());
        }
        Ok(())
    }

    fn check(&mut self) -> Result<Option<bool>> {
        self.checks += 1;
        self.model = None;
        match self.behaviour {
            Behaviour::Failing => Err(ErrorKind::Engine("Engine failure".to_owned()).into()),
            Behaviour::Unknown => Ok(None),
            Behaviour::Exhaustive => {
                self.model = self.search()?;
                Ok(Some(self.model.is_some()))
            }
        }
    }

    fn values(&mut self, terms: &[Term]) -> Result<Vec<Constant>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| ErrorKind::Engine("No model available".to_owned()))?;
        terms.iter().map(|term| evaluate(term, model)).collect()
    }
}

fn evaluate(term: &Term, model: &HashMap<String, Constant>) -> Result<Constant> {
    match term.kind() {
        TermKind::Symbol(symbol) => model
            .get(symbol.name())
            .cloned()
            .ok_or_else(|| ErrorKind::Engine(format!("Unknown symbol {}", symbol)).into()),
        TermKind::Constant(constant) => Ok(constant.clone()),
        TermKind::Application(function, arguments) => {
            let values = arguments
                .iter()
                .map(|argument| evaluate(argument, model))
                .collect::<Result<Vec<Constant>>>()?;
            apply(*function, &values, term.sort())
        }
    }
}

fn numbers(values: &[Constant]) -> Result<Vec<BigRational>> {
    values
        .iter()
        .map(|value| {
            value.to_rational().ok_or_else(|| {
                Error::from(ErrorKind::Engine(format!(
                    "Expected numeric value but got {}",
                    value
                )))
            })
        })
        .collect()
}

fn chain(values: &[Constant], holds: fn(&BigRational, &BigRational) -> bool) -> Result<Constant> {
    let numbers = numbers(values)?;
    Ok(Constant::boolean(
        numbers.windows(2).all(|pair| holds(&pair[0], &pair[1])),
    ))
}

fn apply(function: Function, values: &[Constant], sort: &Sort) -> Result<Constant> {
    let booleans = || values.iter().map(Constant::unwrap_boolean);
    let number = |value: BigRational| match sort {
        Sort::Integer => Constant::Integer(value.to_integer()),
        _ => Constant::Real(value),
    };

    match function {
        Function::Not => Ok(Constant::boolean(!values[0].unwrap_boolean())),
        Function::And => Ok(Constant::boolean(booleans().all(|b| b))),
        Function::Or => Ok(Constant::boolean(booleans().any(|b| b))),
        Function::Imply => {
            let mut operands = booleans().rev();
            let mut result = operands.next().unwrap_or(true);
            for premise in operands {
                result = !premise || result;
            }
            Ok(Constant::boolean(result))
        }
        Function::Xor => Ok(Constant::boolean(booleans().fold(false, |acc, b| acc ^ b))),
        Function::Ite => Ok(if values[0].unwrap_boolean() {
            values[1].clone()
        } else {
            values[2].clone()
        }),
        Function::Equal => {
            if values.iter().all(Constant::is_boolean) {
                Ok(Constant::boolean(
                    values.windows(2).all(|pair| pair[0] == pair[1]),
                ))
            } else {
                chain(values, |lhs, rhs| lhs == rhs)
            }
        }
        Function::Lt => chain(values, |lhs, rhs| lhs < rhs),
        Function::Gt => chain(values, |lhs, rhs| lhs > rhs),
        Function::Le => chain(values, |lhs, rhs| lhs <= rhs),
        Function::Ge => chain(values, |lhs, rhs| lhs >= rhs),
        Function::Add => {
            let sum = numbers(values)?
                .into_iter()
                .fold(BigRational::zero(), |a, b| a + b);
            Ok(number(sum))
        }
        Function::Mul => {
            let product = numbers(values)?
                .into_iter()
                .fold(BigRational::one(), |a, b| a * b);
            Ok(number(product))
        }
        Function::Sub => {
            let mut numbers = numbers(values)?.into_iter();
            let first = numbers.next().ok_or("Empty subtraction")?;
            Ok(number(numbers.fold(first, |a, b| a - b)))
        }
        Function::Neg => Ok(number(-numbers(values)?[0].clone())),
        Function::Abs => Ok(number(numbers(values)?[0].abs())),
        Function::RealDiv | Function::IntDiv | Function::Mod => {
            let numbers = numbers(values)?;
            let (lhs, rhs) = (&numbers[0], &numbers[1]);
            if rhs.is_zero() {
                return Err(ErrorKind::Engine("Division by zero".to_owned()).into());
            }
            let quotient = lhs / rhs;
            // SMT-LIB integer division keeps the remainder non-negative.
            let euclidean = if rhs.is_positive() {
                quotient.floor()
            } else {
                quotient.ceil()
            };
            match function {
                Function::RealDiv => Ok(number(quotient)),
                Function::IntDiv => Ok(number(euclidean)),
                _ => Ok(number(lhs - rhs * euclidean)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Term {
        Term::symbol(Symbol::new("x"), Sort::integer())
    }

    fn int(value: i64) -> Term {
        Term::constant(Constant::integer(value))
    }

    fn apply_int(function: Function, lhs: i64, rhs: i64) -> Constant {
        let term = Term::application(function, vec![int(lhs), int(rhs)], Sort::integer());
        evaluate(&term, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_integer_division_is_euclidean() {
        assert_eq!(apply_int(Function::IntDiv, 7, 2), Constant::integer(3));
        assert_eq!(apply_int(Function::IntDiv, -7, 2), Constant::integer(-4));
        assert_eq!(apply_int(Function::IntDiv, -7, -2), Constant::integer(4));
        assert_eq!(apply_int(Function::Mod, -7, 2), Constant::integer(1));
        assert_eq!(apply_int(Function::Mod, -7, -2), Constant::integer(1));
    }

    #[test]
    fn test_implication_is_right_associative() {
        let t = Term::constant(Constant::boolean(true));
        let f = Term::constant(Constant::boolean(false));
        let imply = |args: Vec<Term>| {
            evaluate(
                &Term::application(Function::Imply, args, Sort::boolean()),
                &HashMap::new(),
            )
            .unwrap()
        };

        assert_eq!(imply(vec![t.clone(), f.clone()]), Constant::boolean(false));
        assert_eq!(imply(vec![f.clone(), f.clone()]), Constant::boolean(true));
        assert_eq!(
            imply(vec![t.clone(), t.clone(), f.clone()]),
            Constant::boolean(false)
        );
    }

    #[test]
    fn test_first_model_in_ascending_order() {
        let mut engine = ReferenceEngine::new();
        engine.declare(&Symbol::new("x"), &Sort::integer()).unwrap();
        engine
            .assert(&Term::application(
                Function::Gt,
                vec![x(), int(0)],
                Sort::boolean(),
            ))
            .unwrap();

        assert_eq!(engine.check().unwrap(), Some(true));
        assert_eq!(engine.values(&[x()]).unwrap(), vec![Constant::integer(1)]);
    }

    #[test]
    fn test_real_models_fall_between_constants() {
        // GIVEN 0 < r < 1 over the reals
        let r = Term::symbol(Symbol::new("r"), Sort::real());
        let real = |numer: i64, denom: i64| Term::constant(Constant::fraction(numer, denom));
        let mut engine = ReferenceEngine::new();
        engine.declare(&Symbol::new("r"), &Sort::real()).unwrap();
        engine
            .assert(&Term::application(
                Function::Lt,
                vec![real(0, 1), r.clone(), real(1, 1)],
                Sort::boolean(),
            ))
            .unwrap();

        // WHEN / THEN
        assert_eq!(engine.check().unwrap(), Some(true));
        assert_eq!(engine.values(&[r]).unwrap(), vec![Constant::fraction(1, 2)]);
    }

    #[test]
    fn test_pop_forgets_scope() {
        let mut engine = ReferenceEngine::new();
        engine.push().unwrap();
        engine.declare(&Symbol::new("x"), &Sort::integer()).unwrap();
        engine.pop().unwrap();

        assert_eq!(engine.depth(), 0);
        assert!(engine.pop().is_err());
        assert!(engine.declare(&Symbol::new("x"), &Sort::integer()).is_ok());
    }
}
