//! A `Formula` is a boolean `Expression` together with the `VariableMap` indexing its variables.

use crate::error::Result;
use crate::expr::Expression;
use std::fmt;

mod variable_map;

pub use self::variable_map::VariableMap;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Formula {
    expression: Expression,
    variables: VariableMap,
}

impl Formula {
    /// Creates a formula whose variables are indexed in order of first occurrence.
    pub fn new(expression: Expression) -> Result<Self> {
        expression.sort().expect_boolean()?;
        let variables = VariableMap::from_variables(expression.variables())?;
        Ok(Self {
            expression,
            variables,
        })
    }

    /// Creates a formula over an externally maintained variable map.
    ///
    /// The map may contain variables which do not occur in `expression`. Variables missing
    /// from the map are only detected during translation.
    pub fn with_variable_map(expression: Expression, variables: VariableMap) -> Result<Self> {
        expression.sort().expect_boolean()?;
        Ok(Self {
            expression,
            variables,
        })
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn variable_map(&self) -> &VariableMap {
        &self.variables
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{Arithmetic, Boolean};

    #[test]
    fn test_variables_indexed_by_first_occurrence() {
        let a = Boolean::variable("a");
        let b = Boolean::variable("b");
        let formula = Formula::new(
            Boolean::and(
                Boolean::or(b.clone().into(), a.clone().into()).unwrap(),
                Boolean::not(a.into()).unwrap(),
            )
            .unwrap(),
        )
        .unwrap();

        assert_eq!(formula.variable_map().variable_count(), 2);
        assert_eq!(formula.variable_map().index_of("b"), Some(1));
        assert_eq!(formula.variable_map().index_of("a"), Some(2));
    }

    #[test]
    fn test_non_boolean_expression_is_rejected() {
        let x = Arithmetic::integer_variable("x");
        assert!(Formula::new(x.into()).is_err());
    }

    #[test]
    fn test_conflicting_sorts_are_rejected() {
        let formula = Boolean::and(
            Boolean::variable("v").into(),
            Arithmetic::gt(
                Arithmetic::integer_variable("v").into(),
                Arithmetic::integer(0),
            )
            .unwrap(),
        )
        .unwrap();

        assert!(Formula::new(formula).is_err());
    }
}
