//! Partial variable assignments layered on top of a formula for the duration of a query.

use crate::error::{ErrorKind, Result};
use crate::expr::Constant;
use crate::formula::VariableMap;
use crate::solver::term::Term;
use crate::solver::translator::TranslatedFormula;
use std::collections::BTreeMap;
use std::fmt;

/// Sparse assignment of constants to variable indices.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Assumptions {
    values: BTreeMap<usize, Constant>,
}

impl Assumptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assumes `value` for the variable with the given index, replacing a previous assumption.
    pub fn set<V: Into<Constant>>(&mut self, index: usize, value: V) -> Option<Constant> {
        self.values.insert(index, value.into())
    }

    /// Like `set`, but looks the variable up by name.
    pub fn set_by_name<V: Into<Constant>>(
        &mut self,
        variable_map: &VariableMap,
        name: &str,
        value: V,
    ) -> Result<Option<Constant>> {
        let index = variable_map
            .index_of(name)
            .ok_or_else(|| format!("Variable '{}' is not part of the variable map", name))?;
        Ok(self.set(index, value))
    }

    pub fn unset(&mut self, index: usize) -> Option<Constant> {
        self.values.remove(&index)
    }

    pub fn get(&self, index: usize) -> Option<&Constant> {
        self.values.get(&index)
    }

    pub fn clear(&mut self) {
        self.values.clear()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(index, value)` in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Constant)> {
        self.values.iter().map(|(&index, value)| (index, value))
    }

    /// Adds all assumptions of `other`, overriding assumptions for the same index.
    pub fn extend(&mut self, other: &Assumptions) {
        for (index, value) in other.iter() {
            self.values.insert(index, value.clone());
        }
    }

    /// Encodes the assumptions as native constraints, one per assumption in index order.
    ///
    /// Numeric variables are constrained to be equal to the assumed value. Boolean variables
    /// follow the polarity convention of the term table: an assumed `false` asserts the
    /// variable's term, an assumed `true` asserts its negation.
    pub fn encode(&self, formula: &TranslatedFormula) -> Result<Vec<Term>> {
        let translator = formula.translator();

        self.iter()
            .map(|(index, value)| {
                let variable = formula.variable(index).ok_or_else(|| {
                    ErrorKind::Translation(format!(
                        "Assumption for unknown variable index {}",
                        index
                    ))
                })?;

                if variable.sort().is_numeric() {
                    translator.make_equal(variable, value)
                } else {
                    match value {
                        Constant::Boolean(false) => Ok(variable.clone()),
                        Constant::Boolean(true) => translator.make_not(variable),
                        _ => Err(ErrorKind::Translation(format!(
                            "Cannot assume {} for Boolean variable {}",
                            value, variable
                        ))
                        .into()),
                    }
                }
            })
            .collect()
    }
}

impl fmt::Display for Assumptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut is_first = true;
        for (index, value) in self.iter() {
            if !is_first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", index, value)?;
            is_first = false;
        }
        write!(f, "}}")
    }
}
