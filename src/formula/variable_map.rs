use crate::error::Result;
use crate::expr::{Sort, Variable};
use std::collections::HashMap;
use std::fmt;

/// Stable bijection between variable names and indices.
///
/// Indices start at 1, index 0 is never assigned. Once a variable got an index it keeps it.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VariableMap {
    variables: Vec<Variable>,
    indices: HashMap<String, usize>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map assigning indices in iteration order, ignoring repeated names.
    pub fn from_variables<'a, I>(variables: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Variable>,
    {
        let mut map = Self::new();
        for variable in variables {
            map.add_variable(variable.clone())?;
        }
        Ok(map)
    }

    /// Adds the variable and returns its index.
    ///
    /// Adding a name twice returns the existing index, as long as the sort agrees.
    pub fn add_variable(&mut self, variable: Variable) -> Result<usize> {
        if let Some(&index) = self.indices.get(variable.name()) {
            let existing = &self.variables[index - 1];
            variable.sort().expect_sort(existing.sort()).map_err(|_| {
                format!(
                    "Variable '{}' is already mapped with sort {}",
                    variable.name(),
                    existing.sort()
                )
            })?;
            return Ok(index);
        }

        self.variables.push(variable);
        let index = self.variables.len();
        self.indices
            .insert(self.variables[index - 1].name().to_owned(), index);
        Ok(index)
    }

    /// Number of mapped variables, which is also the greatest index.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn variable(&self, index: usize) -> Option<&Variable> {
        if index == 0 {
            return None;
        }
        self.variables.get(index - 1)
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.variable(index).map(Variable::name)
    }

    pub fn sort_of(&self, index: usize) -> Option<&Sort> {
        self.variable(index).map(Variable::sort)
    }

    /// Iterates over `(index, variable)` in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(offset, variable)| (offset + 1, variable))
    }
}

impl fmt::Display for VariableMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, variable) in self.iter() {
            writeln!(f, "{}: {}", index, variable)?;
        }
        Ok(())
    }
}
