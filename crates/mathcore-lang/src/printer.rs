//! Pretty-printer: conventional infix with minimal parenthesization.
//!
//! Output is stable under re-parse: for every parser-reachable expression,
//! `parse(print(e)) == e`. A `-1` coefficient prints as a leading minus,
//! negative-exponent factors inside a product print as `/denominator`, and
//! negative addends print with ` - `.

use crate::ast::{lit, Expr, Rational};
use std::fmt;

// Precedence levels used for parenthesization decisions.
const PREC_ADD: u8 = 1;
const PREC_MUL: u8 = 2;
const PREC_POW: u8 = 3;
const PREC_ATOM: u8 = 4;

fn prec(e: &Expr) -> u8 {
    match e {
        Expr::Add(_) => PREC_ADD,
        Expr::Mul(_) => PREC_MUL,
        Expr::Pow(_, _) => PREC_POW,
        _ => PREC_ATOM,
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Integer(n) => write!(f, "{n}"),
            Expr::Rational(r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Expr::Real(x) => write!(f, "{}", x.0),
            Expr::Symbol(s) => f.write_str(s),
            Expr::Constant(c) => f.write_str(c.name()),
            Expr::Add(terms) => write_add(f, terms),
            Expr::Mul(factors) => write_mul(f, factors),
            Expr::Pow(base, exp) => write_pow(f, base, exp),
            Expr::Func(kind, arg) => write!(f, "{}({})", kind.name(), arg),
        }
    }
}

fn write_add(f: &mut fmt::Formatter<'_>, terms: &[Expr]) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i == 0 {
            write!(f, "{term}")?;
        } else if let Some(abs) = negated_view(term) {
            write!(f, " - {abs}")?;
        } else {
            write!(f, " + {term}")?;
        }
    }
    Ok(())
}

/// If `term` carries a negative literal sign, return the sign-stripped term.
fn negated_view(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Integer(n) if *n < 0 => Some(Expr::Integer(-*n)),
        Expr::Rational(r) if *r < Rational::from_integer(0) => Some(Expr::Rational(-*r)),
        Expr::Mul(factors) => {
            let neg = match &factors[0] {
                Expr::Integer(n) if *n < 0 => Some(lit(Rational::from_integer(-*n))),
                Expr::Rational(r) if *r < Rational::from_integer(0) => Some(lit(-*r)),
                _ => None,
            }?;
            let mut abs = factors[1..].to_vec();
            if neg.is_one() {
                if abs.len() == 1 {
                    return Some(abs.remove(0));
                }
            } else {
                abs.insert(0, neg);
            }
            Some(Expr::Mul(abs))
        }
        _ => None,
    }
}

fn write_mul(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    // Split off a literal coefficient and negative-exponent denominators.
    let mut coef = Rational::from_integer(1);
    let mut numerator: Vec<&Expr> = Vec::new();
    let mut denominator: Vec<Expr> = Vec::new();
    for factor in factors {
        match factor {
            Expr::Integer(n) => coef *= Rational::from_integer(*n),
            Expr::Rational(r) => coef *= *r,
            Expr::Pow(base, exp) => match exp.as_literal() {
                // Only integer exponents invert cleanly under re-parse;
                // b^(-1/2) stays in the numerator as a negative power.
                Some(e) if e < Rational::from_integer(0) && e.is_integer() => {
                    let inverted = if e == Rational::from_integer(-1) {
                        (**base).clone()
                    } else {
                        Expr::Pow(base.clone(), Box::new(lit(-e)))
                    };
                    denominator.push(inverted);
                }
                _ => numerator.push(factor),
            },
            other => numerator.push(other),
        }
    }

    if coef < Rational::from_integer(0) {
        f.write_str("-")?;
        coef = -coef;
    }
    let mut wrote_numerator = false;
    if coef != Rational::from_integer(1) || numerator.is_empty() {
        write!(f, "{}", lit(coef))?;
        wrote_numerator = true;
    }
    for part in numerator {
        if wrote_numerator {
            f.write_str("*")?;
        }
        write_with_parens(f, part, prec(part) < PREC_MUL)?;
        wrote_numerator = true;
    }
    for part in &denominator {
        f.write_str("/")?;
        write_with_parens(f, part, prec(part) <= PREC_MUL)?;
    }
    Ok(())
}

fn write_pow(f: &mut fmt::Formatter<'_>, base: &Expr, exp: &Expr) -> fmt::Result {
    write_with_parens(f, base, !is_plain_atom(base))?;
    f.write_str("^")?;
    write_with_parens(f, exp, !is_plain_atom(exp))
}

/// Atoms that need no parentheses in a power position: non-negative
/// integers, symbols, constants, function calls.
fn is_plain_atom(e: &Expr) -> bool {
    match e {
        Expr::Integer(n) => *n >= 0,
        Expr::Real(x) => x.0 >= 0.0,
        Expr::Symbol(_) | Expr::Constant(_) | Expr::Func(_, _) => true,
        _ => false,
    }
}

fn write_with_parens(f: &mut fmt::Formatter<'_>, e: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({e})")
    } else {
        write!(f, "{e}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn roundtrip(input: &str) -> String {
        let e = parse(input).unwrap();
        let printed = e.to_string();
        let reparsed = parse(&printed).unwrap();
        assert_eq!(reparsed, e, "print/parse round trip for {input:?} via {printed:?}");
        printed
    }

    #[test]
    fn prints_atoms() {
        assert_eq!(parse("42").unwrap().to_string(), "42");
        assert_eq!(parse("-3").unwrap().to_string(), "-3");
        assert_eq!(parse("1/2").unwrap().to_string(), "1/2");
        assert_eq!(parse("pi").unwrap().to_string(), "pi");
        assert_eq!(parse("x").unwrap().to_string(), "x");
    }

    #[test]
    fn prints_sums_with_minus_signs() {
        assert_eq!(parse("x - y").unwrap().to_string(), "x - y");
        assert_eq!(parse("1 + x").unwrap().to_string(), "1 + x");
        assert_eq!(parse("x - 2*y").unwrap().to_string(), "x - 2*y");
        assert_eq!(parse("-3 + x").unwrap().to_string(), "-3 + x");
    }

    #[test]
    fn prints_products_and_quotients() {
        assert_eq!(parse("2*x").unwrap().to_string(), "2*x");
        assert_eq!(parse("-x").unwrap().to_string(), "-x");
        assert_eq!(parse("x/y").unwrap().to_string(), "x/y");
        assert_eq!(parse("2/x").unwrap().to_string(), "2/x");
        assert_eq!(parse("x/(y + 1)").unwrap().to_string(), "x/(1 + y)");
        assert_eq!(parse("(x + 1)*y").unwrap().to_string(), "(1 + x)*y");
        // literal denominators factor out at construction
        assert_eq!(parse("x/(2*y)").unwrap().to_string(), "1/2*x/y");
    }

    #[test]
    fn prints_powers() {
        assert_eq!(parse("x^2").unwrap().to_string(), "x^2");
        assert_eq!(parse("x^(-2)").unwrap().to_string(), "x^(-2)");
        assert_eq!(parse("(x + 1)^2").unwrap().to_string(), "(1 + x)^2");
        assert_eq!(parse("2^x").unwrap().to_string(), "2^x");
        assert_eq!(parse("sin(x)^2").unwrap().to_string(), "sin(x)^2");
    }

    #[test]
    fn roundtrips_structurally() {
        for input in [
            "x",
            "-x",
            "1 + x",
            "x - y",
            "2*x + 3*y - 4",
            "x/y",
            "x/(2*y)",
            "1/x",
            "x^2",
            "x^y^2",
            "-x^2",
            "(-x)^2",
            "x^(1/2)",
            "(2*x)^y",
            "sin(x)^2 + cos(x)^2",
            "tan(x/2)",
            "log(x + 1)",
            "exp(-x)",
            "e^x",
            "2*pi*x",
            "x*y*z",
            "(x + y)*(x - y)",
            "1/(1 + x)",
            "x^2/2 - x/3 + 1/6",
            "1/0",
            "x/0",
        ] {
            roundtrip(input);
        }
    }

    #[test]
    fn rational_coefficients_print_parseably() {
        let e = parse("x/2").unwrap();
        assert_eq!(e.to_string(), "1/2*x");
        roundtrip("x/2");
    }

    #[test]
    fn denominator_products_are_parenthesized() {
        let e = parse("1/(x*y)").unwrap();
        let printed = e.to_string();
        assert_eq!(parse(&printed).unwrap(), e, "{printed}");
    }
}
