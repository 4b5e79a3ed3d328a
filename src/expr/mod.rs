//! Typed first-order formulas over Boolean, Integer and Real variables.

use crate::error::Result;
use std::fmt;

mod arithmetic;
mod boolean;
mod constant;
mod sort;
mod variable;

pub use self::arithmetic::Arithmetic;
pub use self::boolean::Boolean;
pub use self::constant::Constant;
pub use self::sort::Sort;
pub use self::variable::Variable;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Operator {
    Variable(Variable),
    Constant(Constant),
    Ite,
    Equal,
    Boolean(Boolean),
    Arithmetic(Arithmetic),
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Variable(v) => v.fmt(f),
            Self::Constant(c) => c.fmt(f),
            Self::Ite => write!(f, "ite"),
            Self::Equal => write!(f, "="),
            Self::Boolean(op) => op.fmt(f),
            Self::Arithmetic(op) => op.fmt(f),
        }
    }
}

impl From<Boolean> for Operator {
    fn from(op: Boolean) -> Self {
        Self::Boolean(op)
    }
}

impl From<Arithmetic> for Operator {
    fn from(op: Arithmetic) -> Self {
        Self::Arithmetic(op)
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Expression {
    operator: Operator,
    operands: Vec<Expression>,
    sort: Sort,
}

impl Expression {
    pub fn new(operator: Operator, operands: Vec<Expression>, sort: Sort) -> Self {
        Self {
            operator,
            operands,
            sort,
        }
    }

    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    pub fn operands(&self) -> &[Expression] {
        &self.operands
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn variable(variable: Variable) -> Expression {
        let result_sort = variable.sort().clone();
        Expression::new(Operator::Variable(variable), vec![], result_sort)
    }

    pub fn constant(constant: Constant) -> Expression {
        let result_sort = constant.sort();
        Expression::new(Operator::Constant(constant), vec![], result_sort)
    }

    pub fn ite(cond: Expression, then: Expression, else_: Expression) -> Result<Expression> {
        cond.sort().expect_boolean()?;
        then.sort().expect_sort(else_.sort())?;

        let result_sort = then.sort().clone();
        Ok(Expression::new(
            Operator::Ite,
            vec![cond, then, else_],
            result_sort,
        ))
    }

    pub fn equal(lhs: Expression, rhs: Expression) -> Result<Expression> {
        lhs.sort().expect_sort(rhs.sort())?;

        Ok(Expression::new(
            Operator::Equal,
            vec![lhs, rhs],
            Sort::boolean(),
        ))
    }

    pub fn unequal(lhs: Expression, rhs: Expression) -> Result<Expression> {
        Boolean::not(Self::equal(lhs, rhs)?)
    }

    /// Returns all `Variables` used in this `Expression`, in order of occurrence.
    pub fn variables(&self) -> Vec<&Variable> {
        let mut variables: Vec<&Variable> = Vec::new();
        match &self.operator {
            Operator::Variable(variable) => variables.push(variable),
            _ => {
                for operand in &self.operands {
                    variables.append(&mut operand.variables())
                }
            }
        }
        variables
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.operands.is_empty() {
            self.operator.fmt(f)
        } else {
            write!(f, "({}", self.operator)?;
            for operand in &self.operands {
                write!(f, " {}", operand)?;
            }
            write!(f, ")")
        }
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Self::variable(variable)
    }
}

impl From<Constant> for Expression {
    fn from(constant: Constant) -> Self {
        Self::constant(constant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_in_order_of_occurrence() {
        let a = Boolean::variable("a");
        let b = Boolean::variable("b");
        let expr = Boolean::and(
            Boolean::or(b.clone().into(), a.clone().into()).unwrap(),
            Boolean::not(b.clone().into()).unwrap(),
        )
        .unwrap();

        assert_eq!(expr.variables(), vec![&b, &a, &b]);
    }

    #[test]
    fn test_sort_checks() {
        let a: Expression = Boolean::variable("a").into();
        let x: Expression = Arithmetic::integer_variable("x").into();
        let y: Expression = Arithmetic::real_variable("y").into();

        assert!(Boolean::and(a.clone(), x.clone()).is_err());
        assert!(Arithmetic::add(x.clone(), y).is_err());
        assert!(Arithmetic::lt(a.clone(), a.clone()).is_err());
        assert!(Expression::equal(a, x.clone()).is_err());
        assert_eq!(
            Arithmetic::lt(x, Arithmetic::integer(3)).unwrap().sort(),
            &Sort::boolean()
        );
    }

    #[test]
    fn test_display() {
        let x: Expression = Arithmetic::integer_variable("x").into();
        let expr = Arithmetic::gt(x, Arithmetic::integer(0)).unwrap();

        if cfg!(debug_assertions) {
            assert_eq!(expr.to_string(), "(> x:Integer 0)");
        } else {
            assert_eq!(expr.to_string(), "(> x 0)");
        }
    }
}
