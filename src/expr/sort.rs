use crate::error::Result;
use std::fmt;

#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Sort {
    Boolean,
    Integer,
    Real,
}

impl Sort {
    pub fn boolean() -> Self {
        Self::Boolean
    }

    pub fn integer() -> Self {
        Self::Integer
    }

    pub fn real() -> Self {
        Self::Real
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Self::Boolean)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer)
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real)
    }

    /// Integer and Real are the numeric sorts.
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_real()
    }

    pub fn expect_boolean(&self) -> Result<()> {
        if self.is_boolean() {
            Ok(())
        } else {
            Err(format!("Expected Boolean but was {}", self).into())
        }
    }

    pub fn expect_integer(&self) -> Result<()> {
        if self.is_integer() {
            Ok(())
        } else {
            Err(format!("Expected Integer but was {}", self).into())
        }
    }

    pub fn expect_numeric(&self) -> Result<()> {
        if self.is_numeric() {
            Ok(())
        } else {
            Err(format!("Expected Integer or Real but was {}", self).into())
        }
    }

    pub fn expect_sort(&self, sort: &Self) -> Result<()> {
        if self == sort {
            Ok(())
        } else {
            Err(format!("Expected {} but was {}", sort, self).into())
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Boolean => write!(f, "Boolean"),
            Self::Integer => write!(f, "Integer"),
            Self::Real => write!(f, "Real"),
        }
    }
}
