use crate::error::Result;
use crate::expr::Sort;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Signed;
use std::convert::TryFrom;
use std::fmt;

#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Constant {
    Boolean(bool),
    Integer(BigInt),
    Real(BigRational),
}

impl Constant {
    pub fn boolean(value: bool) -> Self {
        Self::Boolean(value)
    }

    pub fn integer<T: Into<BigInt>>(value: T) -> Self {
        Self::Integer(value.into())
    }

    pub fn real(value: BigRational) -> Self {
        Self::Real(value)
    }

    /// Creates the real constant `numer / denom`.
    ///
    /// # Panics
    /// Panics if `denom` is zero.
    pub fn fraction<T: Into<BigInt>>(numer: T, denom: T) -> Self {
        Self::Real(BigRational::new(numer.into(), denom.into()))
    }

    pub fn sort(&self) -> Sort {
        match self {
            Self::Boolean(_) => Sort::Boolean,
            Self::Integer(_) => Sort::Integer,
            Self::Real(_) => Sort::Real,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real(_))
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_real()
    }

    pub fn expect_boolean(&self) -> Result<()> {
        if self.is_boolean() {
            Ok(())
        } else {
            Err("Expected Boolean".into())
        }
    }

    pub fn expect_numeric(&self) -> Result<()> {
        if self.is_numeric() {
            Ok(())
        } else {
            Err("Expected Integer or Real".into())
        }
    }

    pub fn unwrap_boolean(&self) -> bool {
        match self {
            Self::Boolean(v) => *v,
            _ => panic!("Expected Boolean"),
        }
    }

    /// Numeric value of this constant as a rational number.
    pub fn to_rational(&self) -> Option<BigRational> {
        match self {
            Self::Integer(v) => Some(BigRational::from_integer(v.clone())),
            Self::Real(v) => Some(v.clone()),
            Self::Boolean(_) => None,
        }
    }

    /// Converts this constant into a constant of the given sort.
    ///
    /// Integers widen to reals, reals with an integral value narrow to integers.
    /// Everything else is rejected.
    pub fn cast(&self, sort: &Sort) -> Result<Self> {
        match (self, sort) {
            (Self::Boolean(_), Sort::Boolean)
            | (Self::Integer(_), Sort::Integer)
            | (Self::Real(_), Sort::Real) => Ok(self.clone()),
            (Self::Integer(v), Sort::Real) => Ok(Self::Real(BigRational::from_integer(v.clone()))),
            (Self::Real(v), Sort::Integer) if v.is_integer() => Ok(Self::Integer(v.to_integer())),
            _ => Err(format!("Constant {} cannot be used as {}", self, sort).into()),
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) if v.is_integer() => write!(f, "{}.0", v.numer()),
            Self::Real(v) if v.is_negative() => write!(f, "-{}", v.abs()),
            Self::Real(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for Constant {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

impl From<i32> for Constant {
    fn from(value: i32) -> Self {
        Self::integer(value)
    }
}

impl From<i64> for Constant {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<BigInt> for Constant {
    fn from(value: BigInt) -> Self {
        Self::Integer(value)
    }
}

impl From<BigRational> for Constant {
    fn from(value: BigRational) -> Self {
        Self::Real(value)
    }
}

impl TryFrom<&Constant> for bool {
    type Error = &'static str;

    fn try_from(c: &Constant) -> std::result::Result<bool, Self::Error> {
        match c {
            Constant::Boolean(v) => Ok(*v),
            _ => Err("Cannot convert constant to bool"),
        }
    }
}

impl TryFrom<&Constant> for BigRational {
    type Error = &'static str;

    fn try_from(c: &Constant) -> std::result::Result<BigRational, Self::Error> {
        c.to_rational().ok_or("Cannot convert constant to rational")
    }
}
