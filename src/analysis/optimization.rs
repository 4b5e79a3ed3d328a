use crate::analysis::Analysis;
use crate::error::Result;
use crate::expr::{Constant, Expression};
use crate::solver::{Engine, OptSolver, SmtSolver};
use num_rational::BigRational;

/// Computes the minimum of a numeric objective over all solutions.
#[derive(Clone, Debug)]
pub struct MinimumAnalysis {
    objective: Expression,
    assumptions: Vec<(String, Constant)>,
}

impl MinimumAnalysis {
    pub fn new(objective: Expression) -> Result<Self> {
        objective.sort().expect_numeric()?;
        Ok(Self {
            objective,
            assumptions: Vec::new(),
        })
    }

    pub fn objective(&self) -> &Expression {
        &self.objective
    }
}

named_assumptions!(MinimumAnalysis);

impl Analysis for MinimumAnalysis {
    type Output = Option<BigRational>;

    fn name(&self) -> &'static str {
        "Minimum"
    }

    fn assumptions(&self) -> &[(String, Constant)] {
        &self.assumptions
    }

    fn analyze<E: Engine>(&self, solver: &mut SmtSolver<E>) -> Result<Option<BigRational>> {
        let objective = solver.translate(&self.objective)?;
        Ok(solver.minimum(&objective))
    }
}

/// Computes the maximum of a numeric objective over all solutions.
#[derive(Clone, Debug)]
pub struct MaximumAnalysis {
    objective: Expression,
    assumptions: Vec<(String, Constant)>,
}

impl MaximumAnalysis {
    pub fn new(objective: Expression) -> Result<Self> {
        objective.sort().expect_numeric()?;
        Ok(Self {
            objective,
            assumptions: Vec::new(),
        })
    }

    pub fn objective(&self) -> &Expression {
        &self.objective
    }
}

named_assumptions!(MaximumAnalysis);

impl Analysis for MaximumAnalysis {
    type Output = Option<BigRational>;

    fn name(&self) -> &'static str {
        "Maximum"
    }

    fn assumptions(&self) -> &[(String, Constant)] {
        &self.assumptions
    }

    fn analyze<E: Engine>(&self, solver: &mut SmtSolver<E>) -> Result<Option<BigRational>> {
        let objective = solver.translate(&self.objective)?;
        Ok(solver.maximum(&objective))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Arithmetic, Boolean};
    use crate::formula::Formula;
    use crate::solver::ReferenceEngine;
    use test_log::test;

    fn x() -> Expression {
        Arithmetic::integer_variable("x").into()
    }

    fn y() -> Expression {
        Arithmetic::integer_variable("y").into()
    }

    /// 0 <= x /\ x <= 3 /\ 0 <= y /\ y <= 2
    fn box_constraints() -> Formula {
        Formula::new(
            Boolean::conjunction(&[
                Arithmetic::lte(Arithmetic::integer(0), x()).unwrap(),
                Arithmetic::lte(x(), Arithmetic::integer(3)).unwrap(),
                Arithmetic::lte(Arithmetic::integer(0), y()).unwrap(),
                Arithmetic::lte(y(), Arithmetic::integer(2)).unwrap(),
            ])
            .unwrap(),
        )
        .unwrap()
    }

    fn integer(value: i64) -> BigRational {
        BigRational::from_integer(value.into())
    }

    #[test]
    fn test_minimum_of_sum() {
        let objective = Arithmetic::add(x(), y()).unwrap();

        let minimum = MinimumAnalysis::new(objective)
            .unwrap()
            .execute(&box_constraints(), ReferenceEngine::new())
            .unwrap();

        assert_eq!(minimum, Some(integer(0)));
    }

    #[test]
    fn test_maximum_of_difference() {
        let objective = Arithmetic::sub(x(), y()).unwrap();

        let maximum = MaximumAnalysis::new(objective)
            .unwrap()
            .execute(&box_constraints(), ReferenceEngine::new())
            .unwrap();

        assert_eq!(maximum, Some(integer(3)));
    }

    #[test]
    fn test_maximum_under_assumption() {
        let objective = Arithmetic::add(x(), y()).unwrap();

        let maximum = MaximumAnalysis::new(objective)
            .unwrap()
            .with_assumption("y", 1)
            .execute(&box_constraints(), ReferenceEngine::new())
            .unwrap();

        assert_eq!(maximum, Some(integer(4)));
    }

    #[test]
    fn test_objective_must_be_numeric() {
        let objective: Expression = Boolean::variable("a").into();

        assert!(MinimumAnalysis::new(objective.clone()).is_err());
        assert!(MaximumAnalysis::new(objective).is_err());
    }

    #[test]
    fn test_objective_over_unknown_variable() {
        let z: Expression = Arithmetic::integer_variable("z").into();

        let result = MinimumAnalysis::new(z)
            .unwrap()
            .execute(&box_constraints(), ReferenceEngine::new());

        assert!(result.is_err());
    }
}
