//! Translation of `Formula`s into native `Term`s.

use crate::error::{ErrorKind, Result};
use crate::expr::{Arithmetic, Boolean, Constant, Expression, Operator, Sort, Variable};
use crate::formula::{Formula, VariableMap};
use crate::solver::term::{Function, Symbol, Term};

/// Translates formulas into native terms and builds the terms needed for assumptions.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormulaTranslator {}

/// The native form of a `Formula`, produced once per solver.
#[derive(Clone, Debug)]
pub struct TranslatedFormula {
    translator: FormulaTranslator,
    constraints: Vec<Term>,
    // Indexed like the variable map, slot 0 is always empty.
    variables: Vec<Option<Term>>,
    boolean_variables: Vec<Term>,
    variable_map: VariableMap,
}

impl TranslatedFormula {
    pub fn translator(&self) -> &FormulaTranslator {
        &self.translator
    }

    /// Top-level constraints, one per conjunct of the formula.
    pub fn constraints(&self) -> &[Term] {
        &self.constraints
    }

    /// Per-variable terms, `variables()[i]` is the term of variable index `i`.
    pub fn variables(&self) -> &[Option<Term>] {
        &self.variables
    }

    pub fn variable(&self, index: usize) -> Option<&Term> {
        self.variables.get(index).and_then(Option::as_ref)
    }

    /// The boolean-typed variable terms in index order.
    pub fn boolean_variables(&self) -> &[Term] {
        &self.boolean_variables
    }

    pub fn variable_map(&self) -> &VariableMap {
        &self.variable_map
    }

    /// Translates an additional expression (e.g. an objective) over this formula's variables.
    pub fn translate_expression(&self, expr: &Expression) -> Result<Term> {
        self.translator
            .translate_expression(expr, &self.variable_map, &self.variables)
    }
}

impl FormulaTranslator {
    pub fn new() -> Self {
        Self {}
    }

    pub fn translate(&self, formula: &Formula) -> Result<TranslatedFormula> {
        let variable_map = formula.variable_map().clone();

        let mut variables = vec![None; variable_map.variable_count() + 1];
        let mut boolean_variables = Vec::new();
        for (index, variable) in variable_map.iter() {
            let term = self.make_variable(variable);
            if term.sort().is_boolean() {
                boolean_variables.push(term.clone());
            }
            variables[index] = Some(term);
        }

        let constraints = conjuncts(formula.expression())
            .into_iter()
            .map(|conjunct| self.translate_expression(conjunct, &variable_map, &variables))
            .collect::<Result<Vec<Term>>>()?;

        debug!(
            "Translated formula into {} constraints over {} variables",
            constraints.len(),
            variable_map.variable_count()
        );

        Ok(TranslatedFormula {
            translator: *self,
            constraints,
            variables,
            boolean_variables,
            variable_map,
        })
    }

    pub fn translate_expression(
        &self,
        expr: &Expression,
        variable_map: &VariableMap,
        variables: &[Option<Term>],
    ) -> Result<Term> {
        let operands = expr
            .operands()
            .iter()
            .map(|operand| self.translate_expression(operand, variable_map, variables))
            .collect::<Result<Vec<Term>>>()?;

        match expr.operator() {
            Operator::Variable(variable) => {
                lookup_variable(variable, variable_map, variables).map(Term::clone)
            }
            Operator::Constant(constant) => Ok(Term::constant(constant.clone())),
            Operator::Ite => {
                expect_arity(expr, &operands, 3)?;
                Ok(Term::application(
                    Function::Ite,
                    operands,
                    expr.sort().clone(),
                ))
            }
            Operator::Equal => {
                expect_arity(expr, &operands, 2)?;
                Ok(Term::application(
                    Function::Equal,
                    operands,
                    Sort::boolean(),
                ))
            }
            Operator::Boolean(op) => self.translate_boolean(expr, op, operands),
            Operator::Arithmetic(op) => self.translate_arithmetic(expr, op, operands),
        }
    }

    fn translate_boolean(
        &self,
        expr: &Expression,
        op: &Boolean,
        mut operands: Vec<Term>,
    ) -> Result<Term> {
        match op {
            Boolean::Not => {
                expect_arity(expr, &operands, 1)?;
                Ok(Term::application(Function::Not, operands, Sort::boolean()))
            }
            Boolean::Imply | Boolean::Xor => {
                expect_arity(expr, &operands, 2)?;
                let function = if *op == Boolean::Imply {
                    Function::Imply
                } else {
                    Function::Xor
                };
                Ok(Term::application(function, operands, Sort::boolean()))
            }
            Boolean::And | Boolean::Or => {
                let (function, neutral) = if *op == Boolean::And {
                    (Function::And, true)
                } else {
                    (Function::Or, false)
                };
                match operands.len() {
                    0 => Ok(Term::constant(Constant::boolean(neutral))),
                    1 => Ok(operands.remove(0)),
                    _ => Ok(Term::application(function, operands, Sort::boolean())),
                }
            }
            Boolean::AtMost(k) => Ok(cardinality(Function::Le, operands, *k)),
            Boolean::AtLeast(k) => Ok(cardinality(Function::Ge, operands, *k)),
            Boolean::Exactly(k) => Ok(cardinality(Function::Equal, operands, *k)),
        }
    }

    fn translate_arithmetic(
        &self,
        expr: &Expression,
        op: &Arithmetic,
        operands: Vec<Term>,
    ) -> Result<Term> {
        let operand_sort = match operands.first() {
            Some(operand) => operand.sort().clone(),
            None => {
                return Err(
                    ErrorKind::Translation(format!("'{}' without operands", expr)).into(),
                )
            }
        };
        if !operand_sort.is_numeric() {
            return Err(ErrorKind::Translation(format!(
                "'{}' is applied to {} operands",
                op, operand_sort
            ))
            .into());
        }

        let (function, arity) = match op {
            Arithmetic::Lt => (Function::Lt, 2),
            Arithmetic::Gt => (Function::Gt, 2),
            Arithmetic::Lte => (Function::Le, 2),
            Arithmetic::Gte => (Function::Ge, 2),
            Arithmetic::Add => (Function::Add, 2),
            Arithmetic::Sub => (Function::Sub, 2),
            Arithmetic::Mul => (Function::Mul, 2),
            Arithmetic::Neg => (Function::Neg, 1),
            Arithmetic::Div if operand_sort.is_integer() => (Function::IntDiv, 2),
            Arithmetic::Div => (Function::RealDiv, 2),
            Arithmetic::Mod if operand_sort.is_integer() => (Function::Mod, 2),
            Arithmetic::Abs if operand_sort.is_integer() => (Function::Abs, 1),
            Arithmetic::Mod | Arithmetic::Abs => {
                return Err(ErrorKind::Translation(format!(
                    "Operator '{}' is not supported for {}",
                    op, operand_sort
                ))
                .into())
            }
        };
        expect_arity(expr, &operands, arity)?;

        let result_sort = match op {
            Arithmetic::Lt | Arithmetic::Gt | Arithmetic::Lte | Arithmetic::Gte => {
                Sort::boolean()
            }
            _ => operand_sort,
        };
        Ok(Term::application(function, operands, result_sort))
    }

    /// The native term standing for `variable`.
    pub fn make_variable(&self, variable: &Variable) -> Term {
        Term::symbol(Symbol::new(variable.name()), variable.sort().clone())
    }

    /// A constant of `sort` holding `value`.
    pub fn make_constant(&self, value: &Constant, sort: &Sort) -> Result<Term> {
        let constant = value
            .cast(sort)
            .map_err(|e| ErrorKind::Translation(e.to_string()))?;
        Ok(Term::constant(constant))
    }

    /// `term == value` for a numeric `term`.
    pub fn make_equal(&self, term: &Term, value: &Constant) -> Result<Term> {
        if !term.sort().is_numeric() {
            return Err(ErrorKind::Translation(format!(
                "Cannot equate {} term {} with constant {}",
                term.sort(),
                term,
                value
            ))
            .into());
        }
        let constant = self.make_constant(value, term.sort())?;
        Ok(Term::application(
            Function::Equal,
            vec![term.clone(), constant],
            Sort::boolean(),
        ))
    }

    /// `not term` for a boolean `term`.
    pub fn make_not(&self, term: &Term) -> Result<Term> {
        if !term.sort().is_boolean() {
            return Err(ErrorKind::Translation(format!(
                "Cannot negate {} term {}",
                term.sort(),
                term
            ))
            .into());
        }
        Ok(Term::application(
            Function::Not,
            vec![term.clone()],
            Sort::boolean(),
        ))
    }
}

/// Splits nested top-level conjunctions, left to right.
fn conjuncts(expr: &Expression) -> Vec<&Expression> {
    match expr.operator() {
        Operator::Boolean(Boolean::And) => expr.operands().iter().flat_map(conjuncts).collect(),
        _ => vec![expr],
    }
}

fn lookup_variable<'t>(
    variable: &Variable,
    variable_map: &VariableMap,
    variables: &'t [Option<Term>],
) -> Result<&'t Term> {
    let index = variable_map.index_of(variable.name()).ok_or_else(|| {
        ErrorKind::Translation(format!(
            "Variable '{}' is not part of the variable map",
            variable.name()
        ))
    })?;

    let term = variables.get(index).and_then(Option::as_ref).ok_or_else(|| {
        ErrorKind::Translation(format!("No term for variable index {}", index))
    })?;

    if term.sort() != variable.sort() {
        return Err(ErrorKind::Translation(format!(
            "Variable '{}' is used as {} but mapped as {}",
            variable.name(),
            variable.sort(),
            term.sort()
        ))
        .into());
    }

    Ok(term)
}

fn expect_arity(expr: &Expression, operands: &[Term], arity: usize) -> Result<()> {
    if operands.len() == arity {
        Ok(())
    } else {
        Err(ErrorKind::Translation(format!(
            "'{}' expects {} operands but has {}",
            expr.operator(),
            arity,
            operands.len()
        ))
        .into())
    }
}

/// Lowers a cardinality constraint to a pseudo-boolean sum `(ite b 1 0) + ... <op> k`.
fn cardinality(comparison: Function, operands: Vec<Term>, k: usize) -> Term {
    let one = Term::constant(Constant::integer(1));
    let zero = Term::constant(Constant::integer(0));

    let mut summands: Vec<Term> = operands
        .into_iter()
        .map(|operand| {
            Term::application(
                Function::Ite,
                vec![operand, one.clone(), zero.clone()],
                Sort::integer(),
            )
        })
        .collect();

    let sum = match summands.len() {
        0 => zero,
        1 => summands.remove(0),
        _ => Term::application(Function::Add, summands, Sort::integer()),
    };

    Term::application(
        comparison,
        vec![sum, Term::constant(Constant::integer(k))],
        Sort::boolean(),
    )
}
