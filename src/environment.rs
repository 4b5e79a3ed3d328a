use crate::error::Result;
use crate::solver::OptimizationOptions;
use num_rational::BigRational;
use serde::{Deserialize, Serialize};

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Solver {
    #[serde(rename = "z3")]
    Z3,
    #[serde(rename = "cvc4")]
    CVC4,
    #[serde(rename = "yices2")]
    Yices2,
}

impl Default for Solver {
    fn default() -> Self {
        Self::Z3
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Z3 => write!(f, "Z3"),
            Self::CVC4 => write!(f, "CVC4"),
            Self::Yices2 => write!(f, "Yices2"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    /// Rational number like `1/1000` or `0.001`.
    #[serde(default = "default_tolerance")]
    pub tolerance: String,
    #[serde(default = "default_max_refinements")]
    pub max_refinements: usize,
}

impl Default for Optimization {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_refinements: default_max_refinements(),
        }
    }
}

impl Optimization {
    pub fn tolerance(&self) -> Result<BigRational> {
        let tolerance = self.tolerance.trim();
        let value = match tolerance.find('.') {
            Some(point) => {
                let (whole, fraction) = (&tolerance[..point], &tolerance[point + 1..]);
                let numer = num_bigint::BigInt::from_str(&format!("{}{}", whole, fraction))?;
                let denom = num_traits::pow(num_bigint::BigInt::from(10), fraction.len());
                BigRational::new(numer, denom)
            }
            None => BigRational::from_str(tolerance)?,
        };

        if value <= BigRational::from_integer(0.into()) {
            return Err(format!("Tolerance must be positive but is {}", self.tolerance).into());
        }
        Ok(value)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Builder)]
#[builder(default)]
pub struct Environment {
    #[serde(default)]
    pub solver: Solver,
    /// Per-check timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub optimization: Optimization,
    #[serde(default = "disabled")]
    pub debug: bool,
    #[serde(default = "default_debug_file")]
    pub debug_file: PathBuf,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            solver: Solver::default(),
            timeout: None,
            optimization: Optimization::default(),
            debug: false,
            debug_file: default_debug_file(),
        }
    }
}

impl Environment {
    pub fn from_file(path: &Path) -> Result<Environment> {
        let file = File::open(path)
            .map_err(|_| format!("Environment file '{}' could not be loaded", path.display()))?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn solver(&self) -> Solver {
        self.solver
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn debug_file(&self) -> &Path {
        &self.debug_file
    }

    pub fn optimization_options(&self) -> Result<OptimizationOptions> {
        Ok(OptimizationOptions {
            tolerance: self.optimization.tolerance()?,
            max_refinements: self.optimization.max_refinements,
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let yaml = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", yaml)
    }
}

fn disabled() -> bool {
    false
}

fn default_tolerance() -> String {
    "1/1000".to_owned()
}

fn default_max_refinements() -> usize {
    128
}

fn default_debug_file() -> PathBuf {
    PathBuf::from("solver.smt2")
}
