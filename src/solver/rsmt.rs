use crate::environment;
use crate::error::Result;
use crate::expr::{Constant, Sort};
use crate::solver::engine::Engine;
use crate::solver::term::{Symbol, Term};
use rsmt2::parse::*;
use rsmt2::print::{Expr2Smt, Sort2Smt, Sym2Smt};
use rsmt2::{SmtConf, SmtRes, Solver};
use std::fs::File;

/// Engine backed by an external SMT solver process driven through rsmt2.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct RsmtEngine {
    #[derivative(Debug = "ignore")]
    solver: Solver<Parser>,
    backend: environment::Solver,
}

impl RsmtEngine {
    pub fn new_from_env(env: &environment::Environment) -> Result<Self> {
        let mut conf = match env.solver() {
            environment::Solver::Z3 => SmtConf::z3(),
            environment::Solver::CVC4 => SmtConf::cvc4(),
            environment::Solver::Yices2 => SmtConf::yices_2(),
        };

        // Activate model production
        conf.models();

        let parser = Parser::new();
        let mut solver = Solver::new(conf, parser)?;

        if env.debug() {
            let file = File::create(env.debug_file())?;
            solver.tee(file)?;
            debug!("Writing solver session to {}", env.debug_file().display());
        }

        if let Some(timeout) = env.timeout() {
            match env.solver() {
                environment::Solver::Z3 => solver.set_option(":timeout", timeout)?,
                environment::Solver::CVC4 => solver.set_option(":tlimit-per", timeout)?,
                environment::Solver::Yices2 => {
                    warn!("Timeouts are not supported by {}, ignoring", env.solver())
                }
            }
        }

        debug!("Started {} engine", env.solver());

        Ok(Self {
            solver,
            backend: env.solver(),
        })
    }

    pub fn backend(&self) -> environment::Solver {
        self.backend
    }
}

impl Engine for RsmtEngine {
    fn push(&mut self) -> Result<()> {
        Ok(self.solver.push(1)?)
    }

    fn pop(&mut self) -> Result<()> {
        Ok(self.solver.pop(1)?)
    }

    fn declare(&mut self, symbol: &Symbol, sort: &Sort) -> Result<()> {
        Ok(self.solver.declare_const(symbol, sort)?)
    }

    fn assert(&mut self, constraint: &Term) -> Result<()> {
        Ok(self.solver.assert(constraint)?)
    }

    fn check(&mut self) -> Result<Option<bool>> {
        Ok(self.solver.check_sat_or_unk()?)
    }

    fn values(&mut self, terms: &[Term]) -> Result<Vec<Constant>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<(String, Constant)> = self.solver.get_values(terms)?;
        if values.len() != terms.len() {
            return Err(format!(
                "Solver returned {} values for {} terms",
                values.len(),
                terms.len()
            )
            .into());
        }

        // Engines print integral reals as integers and vice versa.
        terms
            .iter()
            .zip(values)
            .map(|(term, (_, value))| value.cast(term.sort()))
            .collect()
    }
}

impl Expr2Smt<()> for Term {
    fn expr_to_smt2<Writer>(&self, w: &mut Writer, _: ()) -> SmtRes<()>
    where
        Writer: ::std::io::Write,
    {
        write!(w, "{}", self)?;
        Ok(())
    }
}

impl Sym2Smt<()> for Symbol {
    fn sym_to_smt2<Writer>(&self, w: &mut Writer, _: ()) -> SmtRes<()>
    where
        Writer: ::std::io::Write,
    {
        write!(w, "{}", self)?;
        Ok(())
    }
}

impl Sort2Smt for Sort {
    fn sort_to_smt2<Writer>(&self, w: &mut Writer) -> SmtRes<()>
    where
        Writer: ::std::io::Write,
    {
        match self {
            Self::Boolean => write!(w, "Bool")?,
            Self::Integer => write!(w, "Int")?,
            Self::Real => write!(w, "Real")?,
        };
        Ok(())
    }
}

mod parser {
    use super::*;
    use nom::{
        branch::alt,
        bytes::complete::tag,
        character::complete::{char, digit1, multispace0, multispace1},
        combinator::{all_consuming, map, map_res, opt, value},
        sequence::{delimited, pair, preceded, separated_pair, tuple},
        IResult,
    };
    use num_bigint::{BigInt, ParseBigIntError};
    use num_rational::BigRational;
    use num_traits::Zero;
    use std::str::FromStr;

    fn boolean_literal(input: &str) -> IResult<&str, Constant> {
        alt((
            value(Constant::boolean(false), tag("false")),
            value(Constant::boolean(true), tag("true")),
        ))(input)
    }

    fn numeral(input: &str) -> IResult<&str, BigInt> {
        map_res(digit1, BigInt::from_str)(input)
    }

    fn int_literal(input: &str) -> IResult<&str, Constant> {
        map(numeral, Constant::Integer)(input)
    }

    fn decimal(whole: &str, fraction: &str) -> std::result::Result<Constant, ParseBigIntError> {
        let numer = BigInt::from_str(&format!("{}{}", whole, fraction))?;
        let denom = num_traits::pow(BigInt::from(10), fraction.len());
        Ok(Constant::real(BigRational::new(numer, denom)))
    }

    fn decimal_literal(input: &str) -> IResult<&str, Constant> {
        // 12.25
        map_res(
            separated_pair(digit1, char('.'), digit1),
            |(whole, fraction)| decimal(whole, fraction),
        )(input)
    }

    fn signed_literal(input: &str) -> IResult<&str, Constant> {
        // -7 or -7/2
        map_res(
            preceded(char('-'), pair(numeral, opt(preceded(char('/'), numeral)))),
            |(numer, denom)| match denom {
                None => Ok(Constant::Integer(-numer)),
                Some(denom) if denom.is_zero() => Err("Zero denominator"),
                Some(denom) => Ok(Constant::real(BigRational::new(-numer, denom))),
            },
        )(input)
    }

    fn fraction_literal(input: &str) -> IResult<&str, Constant> {
        // 7/2
        map_res(
            separated_pair(numeral, char('/'), numeral),
            |(numer, denom)| {
                if denom.is_zero() {
                    Err("Zero denominator")
                } else {
                    Ok(Constant::real(BigRational::new(numer, denom)))
                }
            },
        )(input)
    }

    fn negation(input: &str) -> IResult<&str, Constant> {
        // (- x)
        map_res(
            delimited(
                pair(tag("(-"), multispace1),
                number,
                pair(multispace0, char(')')),
            ),
            |c| negate(&c),
        )(input)
    }

    fn division(input: &str) -> IResult<&str, Constant> {
        // (/ x y)
        map_res(
            tuple((
                tag("(/"),
                multispace1,
                number,
                multispace1,
                number,
                multispace0,
                char(')'),
            )),
            |(_, _, numer, _, denom, _, _)| divide(&numer, &denom),
        )(input)
    }

    fn number(input: &str) -> IResult<&str, Constant> {
        alt((
            negation,
            division,
            decimal_literal,
            fraction_literal,
            signed_literal,
            int_literal,
        ))(input)
    }

    fn literal(input: &str) -> IResult<&str, Constant> {
        alt((boolean_literal, number))(input)
    }

    fn negate(constant: &Constant) -> std::result::Result<Constant, &'static str> {
        match constant {
            Constant::Integer(v) => Ok(Constant::Integer(-v)),
            Constant::Real(v) => Ok(Constant::Real(-v)),
            Constant::Boolean(_) => Err("Cannot negate a boolean"),
        }
    }

    fn divide(numer: &Constant, denom: &Constant) -> std::result::Result<Constant, &'static str> {
        let numer = numer.to_rational().ok_or("Cannot divide a boolean")?;
        let denom = denom.to_rational().ok_or("Cannot divide by a boolean")?;
        if denom.is_zero() {
            return Err("Division by zero");
        }
        Ok(Constant::real(numer / denom))
    }

    pub(super) fn parse_literal(input: &str) -> SmtRes<Constant> {
        match all_consuming(delimited(multispace0, literal, multispace0))(input) {
            Ok((_, lit)) => Ok(lit),
            Err(_) => Err(format!("Failed to parse literal '{}'", input).into()),
        }
    }

}

#[derive(Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self {}
    }
}

impl<'a> ValueParser<Constant, &'a str> for Parser {
    fn parse_value(self, input: &'a str) -> SmtRes<Constant> {
        parser::parse_literal(input)
    }
}

impl<'a> ExprParser<String, (), &'a str> for Parser {
    fn parse_expr(self, input: &'a str, _: ()) -> SmtRes<String> {
        Ok(input.into())
    }
}
