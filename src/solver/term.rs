//! Native terms understood by the solving engines.
//!
//! A `Term` is a sorted SMT-LIB term. Its `Display` implementation yields the exact SMT-LIB
//! text handed to the engine, symbols are always printed quoted.

use crate::expr::{Constant, Sort};
use num_traits::Signed;
use std::fmt;

/// Interpreted SMT-LIB functions.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Function {
    Not,
    And,
    Or,
    Imply,
    Xor,
    Ite,
    Equal,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    /// Real division `/`.
    RealDiv,
    /// Integer division `div`.
    IntDiv,
    Mod,
    Abs,
    Neg,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Not => write!(f, "not"),
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
            Self::Imply => write!(f, "=>"),
            Self::Xor => write!(f, "xor"),
            Self::Ite => write!(f, "ite"),
            Self::Equal => write!(f, "="),
            Self::Lt => write!(f, "<"),
            Self::Gt => write!(f, ">"),
            Self::Le => write!(f, "<="),
            Self::Ge => write!(f, ">="),
            Self::Add => write!(f, "+"),
            Self::Sub | Self::Neg => write!(f, "-"),
            Self::Mul => write!(f, "*"),
            Self::RealDiv => write!(f, "/"),
            Self::IntDiv => write!(f, "div"),
            Self::Mod => write!(f, "mod"),
            Self::Abs => write!(f, "abs"),
        }
    }
}

/// A declared constant symbol.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Symbol {
    name: String,
}

impl Symbol {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Quoted symbols may contain anything but `|` and `\`, `#` escapes them.
        write!(f, "|")?;
        for c in self.name.chars() {
            match c {
                '|' | '\\' | '#' => write!(f, "#{:02x}", c as u32)?,
                c => write!(f, "{}", c)?,
            }
        }
        write!(f, "|")
    }
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum TermKind {
    Symbol(Symbol),
    Constant(Constant),
    Application(Function, Vec<Term>),
}

#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Term {
    kind: TermKind,
    sort: Sort,
}

impl Term {
    pub fn symbol(symbol: Symbol, sort: Sort) -> Self {
        Self {
            kind: TermKind::Symbol(symbol),
            sort,
        }
    }

    pub fn constant(constant: Constant) -> Self {
        let sort = constant.sort();
        Self {
            kind: TermKind::Constant(constant),
            sort,
        }
    }

    /// Application of `function` to `arguments`, the caller is responsible for the sorts.
    pub fn application(function: Function, arguments: Vec<Term>, sort: Sort) -> Self {
        Self {
            kind: TermKind::Application(function, arguments),
            sort,
        }
    }

    pub fn kind(&self) -> &TermKind {
        &self.kind
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match &self.kind {
            TermKind::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match &self.kind {
            TermKind::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    /// Whether this is the constant `true`, which never contributes to unsatisfiability.
    pub fn is_true(&self) -> bool {
        matches!(&self.kind, TermKind::Constant(Constant::Boolean(true)))
    }

    /// All constants occurring in this term.
    pub fn constants(&self) -> Vec<&Constant> {
        match &self.kind {
            TermKind::Symbol(_) => vec![],
            TermKind::Constant(constant) => vec![constant],
            TermKind::Application(_, arguments) => {
                arguments.iter().flat_map(Term::constants).collect()
            }
        }
    }
}

fn fmt_constant(constant: &Constant, f: &mut fmt::Formatter) -> fmt::Result {
    match constant {
        Constant::Boolean(value) => write!(f, "{}", value),
        Constant::Integer(value) if value.is_negative() => write!(f, "(- {})", value.abs()),
        Constant::Integer(value) => write!(f, "{}", value),
        Constant::Real(value) => {
            let numer = value.numer().abs();
            let denom = value.denom();
            let magnitude = if value.is_integer() {
                format!("{}.0", numer)
            } else {
                format!("(/ {}.0 {}.0)", numer, denom)
            };
            if value.is_negative() {
                write!(f, "(- {})", magnitude)
            } else {
                write!(f, "{}", magnitude)
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            TermKind::Symbol(symbol) => symbol.fmt(f),
            TermKind::Constant(constant) => fmt_constant(constant, f),
            TermKind::Application(function, arguments) => {
                write!(f, "({}", function)?;
                for argument in arguments {
                    write!(f, " {}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}
