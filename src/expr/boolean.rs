use crate::error::Result;
use crate::expr::{Constant, Expression, Sort, Variable};
use std::fmt;

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Boolean {
    Not,
    Imply,
    And,
    Or,
    Xor,
    /// At most `k` of the operands are true.
    AtMost(usize),
    /// At least `k` of the operands are true.
    AtLeast(usize),
    /// Exactly `k` of the operands are true.
    Exactly(usize),
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Not => write!(f, "not"),
            Self::Imply => write!(f, "=>"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::Xor => write!(f, "xor"),
            Self::AtMost(k) => write!(f, "at-most-{}", k),
            Self::AtLeast(k) => write!(f, "at-least-{}", k),
            Self::Exactly(k) => write!(f, "exactly-{}", k),
        }
    }
}

macro_rules! boolean_unary {
    ( $name:ident, $op:expr ) => {
        pub fn $name(expr: Expression) -> Result<Expression> {
            expr.sort().expect_boolean()?;

            Ok(Expression::new($op.into(), vec![expr], Sort::boolean()))
        }
    };
}

macro_rules! boolean_binary {
    ( $name:ident, $op:expr ) => {
        pub fn $name(lhs: Expression, rhs: Expression) -> Result<Expression> {
            lhs.sort().expect_boolean()?;
            rhs.sort().expect_boolean()?;

            Ok(Expression::new($op.into(), vec![lhs, rhs], Sort::boolean()))
        }
    };
}

macro_rules! boolean_cardinality {
    ( $name:ident, $op:path ) => {
        pub fn $name(k: usize, formulas: &[Expression]) -> Result<Expression> {
            for formula in formulas {
                formula.sort().expect_boolean()?;
            }

            Ok(Expression::new(
                $op(k).into(),
                formulas.to_vec(),
                Sort::boolean(),
            ))
        }
    };
}

impl Boolean {
    pub fn variable(name: &str) -> Variable {
        Variable::new(name, Sort::boolean())
    }

    pub fn constant(value: bool) -> Expression {
        Expression::constant(Constant::boolean(value))
    }

    boolean_unary!(not, Self::Not);

    boolean_binary!(imply, Self::Imply);
    boolean_binary!(and, Self::And);
    boolean_binary!(or, Self::Or);
    boolean_binary!(xor, Self::Xor);

    boolean_cardinality!(at_most, Self::AtMost);
    boolean_cardinality!(at_least, Self::AtLeast);
    boolean_cardinality!(exactly, Self::Exactly);

    pub fn conjunction(formulas: &[Expression]) -> Result<Expression> {
        if formulas.is_empty() {
            return Ok(Self::constant(true));
        }

        for formula in formulas {
            formula.sort().expect_boolean()?;
        }

        Ok(Expression::new(
            Self::And.into(),
            formulas.to_vec(),
            Sort::boolean(),
        ))
    }

    pub fn disjunction(formulas: &[Expression]) -> Result<Expression> {
        if formulas.is_empty() {
            return Ok(Self::constant(false));
        }

        for formula in formulas {
            formula.sort().expect_boolean()?;
        }

        Ok(Expression::new(
            Self::Or.into(),
            formulas.to_vec(),
            Sort::boolean(),
        ))
    }
}
