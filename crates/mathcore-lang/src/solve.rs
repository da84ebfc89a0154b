//! Polynomial equation solving in one variable.
//!
//! The equation `lhs = rhs` is normalized to `lhs - rhs = 0`, fully expanded,
//! and read off as a polynomial in the unknown. Degrees 0-2 are solved
//! symbolically; higher degrees fall back to exact rational-root search over
//! divisors of the constant and leading coefficients.

use crate::ast::{lit, Expr, Rational};
use crate::error::MathError;
use crate::expand::expand;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Solution set of a single equation.
#[derive(Clone, Debug, PartialEq)]
pub enum Solutions {
    /// Every value satisfies the equation (0 = 0).
    All,
    /// A finite set of roots, sorted by their printed form.
    Finite(Vec<Expr>),
}

impl Solutions {
    /// Render as the stable bracketed form: `[r1, r2, ...]`, or `all`.
    pub fn render(&self) -> String {
        match self {
            Solutions::All => "all".to_string(),
            Solutions::Finite(roots) => {
                let parts: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }
}

/// Solve `lhs = rhs` for the symbol named `var`.
pub fn solve(lhs: &Expr, rhs: &Expr, var: &str) -> Result<Solutions, MathError> {
    let equation = expand(&Expr::sub(lhs.clone(), rhs.clone()));
    let coeffs = polynomial_coefficients(&equation, var)?;

    let degree = coeffs
        .iter()
        .rev()
        .find(|(_, c)| !c.is_zero())
        .map(|(d, _)| *d);
    debug!("solving for {var}: degree {degree:?}");

    let coeff = |d: i64| coeffs.get(&d).cloned().unwrap_or(Expr::Integer(0));
    match degree {
        None => Ok(Solutions::All),
        Some(0) => Ok(Solutions::Finite(Vec::new())),
        Some(1) => {
            // a*v + b = 0  =>  v = -b/a
            let a = coeff(1);
            let b = coeff(0);
            Ok(sorted(vec![Expr::div(Expr::neg(b), a)]))
        }
        Some(2) => {
            let a = coeff(2);
            let b = coeff(1);
            let c = coeff(0);
            let discriminant = Expr::sub(
                Expr::pow(b.clone(), Expr::Integer(2)),
                Expr::mul_factors(vec![Expr::Integer(4), a.clone(), c]),
            );
            let sqrt_d = Expr::pow(discriminant, Expr::rational(1, 2));
            let two_a = Expr::mul(Expr::Integer(2), a);
            let r1 = Expr::div(
                Expr::add(Expr::neg(b.clone()), sqrt_d.clone()),
                two_a.clone(),
            );
            let r2 = Expr::div(Expr::sub(Expr::neg(b), sqrt_d), two_a);
            let mut roots = vec![r1, r2];
            roots.dedup();
            Ok(sorted(roots))
        }
        Some(d) => rational_root_fallback(&coeffs, d),
    }
}

fn sorted(mut roots: Vec<Expr>) -> Solutions {
    roots.sort_by_key(|r| r.to_string());
    roots.dedup();
    Solutions::Finite(roots)
}

/// Read the expanded sum as a polynomial: degree -> summed coefficient.
fn polynomial_coefficients(
    equation: &Expr,
    var: &str,
) -> Result<BTreeMap<i64, Expr>, MathError> {
    let terms: Vec<&Expr> = match equation {
        Expr::Add(terms) => terms.iter().collect(),
        single => vec![single],
    };
    let mut by_degree: BTreeMap<i64, Vec<Expr>> = BTreeMap::new();
    for term in terms {
        let (degree, coefficient) = monomial_degree(term, var)?;
        by_degree.entry(degree).or_default().push(coefficient);
    }
    Ok(by_degree
        .into_iter()
        .map(|(d, parts)| (d, Expr::add_terms(parts)))
        .collect())
}

/// Split one expanded term into (degree in `var`, coefficient).
fn monomial_degree(term: &Expr, var: &str) -> Result<(i64, Expr), MathError> {
    if !term.has_symbol(var) {
        return Ok((0, term.clone()));
    }
    match term {
        Expr::Symbol(_) => Ok((1, Expr::Integer(1))),
        Expr::Pow(base, exp) if **base == Expr::symbol(var) => match exp.as_integer() {
            Some(n) if n > 0 => Ok((n, Expr::Integer(1))),
            _ => Err(not_polynomial(var)),
        },
        Expr::Mul(factors) => {
            let mut degree = 0i64;
            let mut coefficient: Vec<Expr> = Vec::new();
            for factor in factors {
                if !factor.has_symbol(var) {
                    coefficient.push(factor.clone());
                    continue;
                }
                match factor {
                    Expr::Symbol(_) => degree += 1,
                    Expr::Pow(base, exp) if **base == Expr::symbol(var) => {
                        match exp.as_integer() {
                            Some(n) if n > 0 => degree += n,
                            _ => return Err(not_polynomial(var)),
                        }
                    }
                    _ => return Err(not_polynomial(var)),
                }
            }
            Ok((degree, Expr::mul_factors(coefficient)))
        }
        _ => Err(not_polynomial(var)),
    }
}

fn not_polynomial(var: &str) -> MathError {
    MathError::symbolic(format!("Equation is not polynomial in {var}"))
}

/// Try small exact rational roots p/q where p divides the constant term and
/// q divides the leading coefficient. Only runs when every coefficient is a
/// literal; returns whatever finite set survives exact verification.
fn rational_root_fallback(
    coeffs: &BTreeMap<i64, Expr>,
    degree: i64,
) -> Result<Solutions, MathError> {
    let mut literal: BTreeMap<i64, Rational> = BTreeMap::new();
    for (d, c) in coeffs {
        match c.as_literal() {
            Some(r) => {
                literal.insert(*d, r);
            }
            None => {
                return Err(MathError::symbolic(format!(
                    "Cannot solve degree {degree} equation with symbolic coefficients"
                )))
            }
        }
    }

    // Clear denominators so candidate enumeration works over integers.
    let scale = literal
        .values()
        .fold(1i64, |acc, r| lcm(acc, *r.denom()));
    let int_coeff = |d: i64| -> i64 {
        literal
            .get(&d)
            .map(|r| (*r * Rational::from_integer(scale)).to_integer())
            .unwrap_or(0)
    };

    let leading = int_coeff(degree);
    let mut roots: BTreeSet<Rational> = BTreeSet::new();

    // Strip zero constant terms: each factor of v contributes the root 0.
    let mut low = 0i64;
    while low < degree && int_coeff(low) == 0 {
        low += 1;
    }
    if low > 0 {
        roots.insert(Rational::from_integer(0));
    }
    let constant = int_coeff(low);

    let horner = |r: Rational| -> Rational {
        let mut acc = Rational::from_integer(0);
        for d in (0..=degree).rev() {
            acc = acc * r + Rational::from_integer(int_coeff(d));
        }
        acc
    };

    for p in divisors(constant) {
        for q in divisors(leading) {
            for candidate in [Rational::new(p, q), Rational::new(-p, q)] {
                if horner(candidate) == Rational::from_integer(0) {
                    roots.insert(candidate);
                }
            }
        }
    }

    debug!("rational-root fallback found {} root(s)", roots.len());
    Ok(sorted(roots.into_iter().map(lit).collect()))
}

fn divisors(n: i64) -> Vec<i64> {
    let n = n.abs();
    if n == 0 {
        return vec![1];
    }
    let mut out = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            out.push(d);
            if d != n / d {
                out.push(n / d);
            }
        }
        d += 1;
    }
    out
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn lcm(a: i64, b: i64) -> i64 {
    if a == 0 || b == 0 {
        0
    } else {
        (a / gcd(a, b)) * b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn solve_str(lhs: &str, rhs: &str) -> Result<String, MathError> {
        Ok(solve(&parse(lhs).unwrap(), &parse(rhs).unwrap(), "x")?.render())
    }

    #[test]
    fn linear_equation() {
        assert_eq!(solve_str("x", "5").unwrap(), "[5]");
        assert_eq!(solve_str("2*x + 6", "0").unwrap(), "[-3]");
        assert_eq!(solve_str("3*x - 1", "x + 5").unwrap(), "[3]");
    }

    #[test]
    fn linear_with_symbolic_coefficients() {
        // a*x + b = 0 -> x = -b/a
        let rendered = solve_str("a*x + b", "0").unwrap();
        assert_eq!(rendered, "[-b/a]");
    }

    #[test]
    fn quadratic_with_integer_roots() {
        assert_eq!(solve_str("x^2", "4").unwrap(), "[-2, 2]");
        assert_eq!(solve_str("x^2 - 5*x + 6", "0").unwrap(), "[2, 3]");
    }

    #[test]
    fn quadratic_with_irrational_roots_keeps_the_radical() {
        // discriminant 8 has no exact square root, so the radical survives
        let rendered = solve_str("x^2 - 2", "0").unwrap();
        assert_eq!(rendered, "[-1/2*8^(1/2), 1/2*8^(1/2)]");
    }

    #[test]
    fn quadratic_double_root_collapses() {
        assert_eq!(solve_str("x^2 - 2*x + 1", "0").unwrap(), "[1]");
    }

    #[test]
    fn degenerate_cases() {
        assert_eq!(solve_str("x", "x").unwrap(), "all");
        assert_eq!(solve_str("0", "5").unwrap(), "[]");
    }

    #[test]
    fn cubic_via_rational_roots() {
        // (x-1)(x-2)(x-3) = x^3 - 6x^2 + 11x - 6
        assert_eq!(
            solve_str("x^3 - 6*x^2 + 11*x - 6", "0").unwrap(),
            "[1, 2, 3]"
        );
        // x^3 = x has roots -1, 0, 1
        assert_eq!(solve_str("x^3", "x").unwrap(), "[-1, 0, 1]");
    }

    #[test]
    fn cubic_with_fractional_root() {
        // (2x-1)(x^2+1) = 2x^3 - x^2 + 2x - 1; only the rational root shows
        assert_eq!(solve_str("2*x^3 - x^2 + 2*x - 1", "0").unwrap(), "[1/2]");
    }

    #[test]
    fn non_polynomial_fails() {
        let err = solve_str("sin(x)", "0").unwrap_err();
        assert!(err.to_string().contains("not polynomial"), "{err}");
        let err = solve_str("x^y", "1").unwrap_err();
        assert!(err.to_string().contains("not polynomial"), "{err}");
    }

    #[test]
    fn symbolic_high_degree_fails() {
        let err = solve_str("a*x^3 + 1", "0").unwrap_err();
        assert!(err.to_string().contains("symbolic coefficients"), "{err}");
    }
}
