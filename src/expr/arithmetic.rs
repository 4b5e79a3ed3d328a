use crate::error::Result;
use crate::expr::{Constant, Expression, Sort, Variable};
use num_rational::BigRational;
use std::fmt;

/// Arithmetic over the numeric sorts (Integer and Real).
///
/// Operands of one operation always share the same sort.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum Arithmetic {
    Lt,
    Gt,
    Lte,
    Gte,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Abs,
    Neg,
}

impl fmt::Display for Arithmetic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Lte => write!(f, "<="),
            Self::Gte => write!(f, ">="),
            Self::Add => write!(f, "+"),
            Self::Sub => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::Div => write!(f, "/"),
            Self::Mod => write!(f, "mod"),
            Self::Abs => write!(f, "abs"),
            Self::Neg => write!(f, "-"),
        }
    }
}

macro_rules! arith_unary {
    ( $name:ident, $op:expr ) => {
        pub fn $name(expr: Expression) -> Result<Expression> {
            expr.sort().expect_numeric()?;

            let result_sort = expr.sort().clone();
            Ok(Expression::new($op.into(), vec![expr], result_sort))
        }
    };
}

macro_rules! arith_binary {
    ( $name:ident, $op:expr ) => {
        pub fn $name(lhs: Expression, rhs: Expression) -> Result<Expression> {
            lhs.sort().expect_numeric()?;
            rhs.sort().expect_sort(lhs.sort())?;

            let result_sort = lhs.sort().clone();
            Ok(Expression::new($op.into(), vec![lhs, rhs], result_sort))
        }
    };
}

macro_rules! arith_comp {
    ( $name:ident, $op:expr ) => {
        pub fn $name(lhs: Expression, rhs: Expression) -> Result<Expression> {
            lhs.sort().expect_numeric()?;
            rhs.sort().expect_sort(lhs.sort())?;

            Ok(Expression::new($op.into(), vec![lhs, rhs], Sort::boolean()))
        }
    };
}

impl Arithmetic {
    pub fn integer_variable(name: &str) -> Variable {
        Variable::new(name, Sort::integer())
    }

    pub fn real_variable(name: &str) -> Variable {
        Variable::new(name, Sort::real())
    }

    pub fn integer(value: i64) -> Expression {
        Expression::constant(Constant::integer(value))
    }

    pub fn real(value: BigRational) -> Expression {
        Expression::constant(Constant::real(value))
    }

    arith_unary!(abs, Self::Abs);
    arith_unary!(neg, Self::Neg);

    arith_binary!(add, Self::Add);
    arith_binary!(sub, Self::Sub);
    arith_binary!(mul, Self::Mul);
    arith_binary!(div, Self::Div);
    arith_binary!(modulo, Self::Mod);

    arith_comp!(lt, Self::Lt);
    arith_comp!(gt, Self::Gt);
    arith_comp!(lte, Self::Lte);
    arith_comp!(gte, Self::Gte);
}
