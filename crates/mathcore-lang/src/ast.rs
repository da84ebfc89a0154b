//! Expression AST with canonicalizing smart constructors.
//!
//! Nodes are immutable values; every constructor returns a canonical tree:
//! `Add`/`Mul` are flattened n-ary with sorted children and at most one
//! literal child, like terms are collected with exact rational coefficients,
//! repeated factors merge into powers, and literal powers fold. The derived
//! `Ord` on the enum is the canonical child ordering (literals sort before
//! symbols, symbols before compounds).

use num_rational::Ratio;
use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

/// Exact rational literal value.
pub type Rational = Ratio<i64>;

/// Known mathematical constants.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum MathConst {
    E,
    Pi,
}

impl MathConst {
    pub fn name(self) -> &'static str {
        match self {
            MathConst::E => "e",
            MathConst::Pi => "pi",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            MathConst::E => std::f64::consts::E,
            MathConst::Pi => std::f64::consts::PI,
        }
    }
}

/// The closed set of elementary functions.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum FuncKind {
    Sin,
    Cos,
    Tan,
    Log,
    Exp,
}

impl FuncKind {
    pub fn from_name(name: &str) -> Option<FuncKind> {
        match name {
            "sin" => Some(FuncKind::Sin),
            "cos" => Some(FuncKind::Cos),
            "tan" => Some(FuncKind::Tan),
            "log" => Some(FuncKind::Log),
            "exp" => Some(FuncKind::Exp),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FuncKind::Sin => "sin",
            FuncKind::Cos => "cos",
            FuncKind::Tan => "tan",
            FuncKind::Log => "log",
            FuncKind::Exp => "exp",
        }
    }
}

/// An expression node. Variant declaration order doubles as the canonical
/// sort order for `Add`/`Mul` children, so the derived `Ord` is the ranking.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Expr {
    Integer(i64),
    Rational(Rational),
    Real(OrderedFloat<f64>),
    Symbol(String),
    Constant(MathConst),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Func(FuncKind, Box<Expr>),
}

impl Expr {
    pub fn integer(n: i64) -> Expr {
        Expr::Integer(n)
    }

    /// Exact rational; collapses to `Integer` when the denominator divides out.
    /// The denominator must be non-zero.
    pub fn rational(numer: i64, denom: i64) -> Expr {
        lit(Rational::new(numer, denom))
    }

    pub fn real(x: f64) -> Expr {
        Expr::Real(OrderedFloat(x))
    }

    pub fn symbol(name: impl Into<String>) -> Expr {
        Expr::Symbol(name.into())
    }

    /// Sum with full canonicalization: flattening, literal folding, like-term
    /// collection, zero dropping, single-child collapse.
    pub fn add_terms(terms: Vec<Expr>) -> Expr {
        let mut constant = Rational::from_integer(0);
        let mut coeffs: BTreeMap<Expr, Rational> = BTreeMap::new();
        let mut work = terms;
        work.reverse();
        while let Some(term) = work.pop() {
            match term {
                Expr::Add(children) => {
                    for child in children.into_iter().rev() {
                        work.push(child);
                    }
                }
                Expr::Integer(n) => constant += Rational::from_integer(n),
                Expr::Rational(r) => constant += r,
                other => {
                    let (coef, key) = split_coefficient(other);
                    *coeffs.entry(key).or_insert_with(|| Rational::from_integer(0)) += coef;
                }
            }
        }

        let zero = Rational::from_integer(0);
        let one = Rational::from_integer(1);
        let mut out: Vec<Expr> = Vec::new();
        if constant != zero {
            out.push(lit(constant));
        }
        for (key, coef) in coeffs {
            if coef == zero {
                continue;
            }
            if coef == one {
                out.push(key);
            } else {
                out.push(attach_coefficient(coef, key));
            }
        }
        match out.len() {
            0 => Expr::Integer(0),
            1 => out.into_iter().next().expect("len checked"),
            _ => {
                out.sort();
                Expr::Add(out)
            }
        }
    }

    pub fn add(a: Expr, b: Expr) -> Expr {
        Expr::add_terms(vec![a, b])
    }

    /// Product with full canonicalization: flattening, literal folding, zero
    /// absorption, one dropping, and merging of repeated bases into powers.
    pub fn mul_factors(factors: Vec<Expr>) -> Expr {
        let mut coef = Rational::from_integer(1);
        // Group factors by base, accumulating exponents.
        let mut bases: BTreeMap<Expr, Vec<Expr>> = BTreeMap::new();
        let mut work = factors;
        work.reverse();
        while let Some(factor) = work.pop() {
            match factor {
                Expr::Mul(children) => {
                    for child in children.into_iter().rev() {
                        work.push(child);
                    }
                }
                Expr::Integer(n) => coef *= Rational::from_integer(n),
                Expr::Rational(r) => coef *= r,
                Expr::Pow(base, exp) => bases.entry(*base).or_default().push(*exp),
                other => bases.entry(other).or_default().push(Expr::Integer(1)),
            }
        }
        if coef == Rational::from_integer(0) {
            return Expr::Integer(0);
        }

        let mut out: Vec<Expr> = Vec::new();
        let mut reflatten = false;
        for (base, exps) in bases {
            let merged = Expr::pow(base, Expr::add_terms(exps));
            match merged {
                Expr::Integer(n) => coef *= Rational::from_integer(n),
                Expr::Rational(r) => coef *= r,
                Expr::Mul(children) => {
                    // An exponent sum collapsed to 1 and exposed a product
                    // base; fold it back in through a second pass.
                    reflatten = true;
                    out.extend(children);
                }
                other => out.push(other),
            }
        }
        if reflatten {
            out.push(lit(coef));
            return Expr::mul_factors(out);
        }
        if coef == Rational::from_integer(0) {
            return Expr::Integer(0);
        }
        if coef != Rational::from_integer(1) {
            out.push(lit(coef));
        }
        match out.len() {
            0 => lit(coef),
            1 => out.into_iter().next().expect("len checked"),
            _ => {
                out.sort();
                Expr::Mul(out)
            }
        }
    }

    pub fn mul(a: Expr, b: Expr) -> Expr {
        Expr::mul_factors(vec![a, b])
    }

    /// Power with the canonical shortcuts: `x^0 -> 1`, `x^1 -> x`,
    /// `1^e -> 1`, `0^n -> 0` for positive literal `n` (while `0^n` for
    /// negative `n` stays symbolic), literal folding including exact roots,
    /// and `(b^m)^n -> b^(m*n)` for integer literals `m`, `n`.
    pub fn pow(base: Expr, exp: Expr) -> Expr {
        if base == Expr::Integer(1) {
            return Expr::Integer(1);
        }
        if let Some(e) = as_literal(&exp) {
            let zero = Rational::from_integer(0);
            if e == zero {
                return Expr::Integer(1);
            }
            if e == Rational::from_integer(1) {
                return base;
            }
            if let Some(b) = as_literal(&base) {
                if b == zero {
                    if e > zero {
                        return Expr::Integer(0);
                    }
                    // 0 raised to a negative power: the well-known infinity
                    // escapes canonicalization untouched.
                    return Expr::Pow(Box::new(base), Box::new(exp));
                }
                if let Some(folded) = pow_literal(b, e) {
                    return lit(folded);
                }
            }
            if e.is_integer() {
                // (b^m)^n = b^(m*n) is safe when the outer exponent is an
                // integer and the inner one is a known literal.
                if let Expr::Pow(inner_base, inner_exp) = &base {
                    if let Some(m) = as_literal(inner_exp) {
                        return Expr::pow((**inner_base).clone(), lit(m * e));
                    }
                }
                // Integer powers distribute over products, keeping quotients
                // canonical regardless of how they were written.
                if let Expr::Mul(factors) = &base {
                    return Expr::mul_factors(
                        factors
                            .iter()
                            .map(|f| Expr::pow(f.clone(), exp.clone()))
                            .collect(),
                    );
                }
            }
        }
        Expr::Pow(Box::new(base), Box::new(exp))
    }

    /// Function application; folds `log(e) -> 1`.
    pub fn func(kind: FuncKind, arg: Expr) -> Expr {
        if kind == FuncKind::Log && arg == Expr::Constant(MathConst::E) {
            return Expr::Integer(1);
        }
        Expr::Func(kind, Box::new(arg))
    }

    pub fn neg(e: Expr) -> Expr {
        Expr::mul(Expr::Integer(-1), e)
    }

    /// Subtraction, represented as `a + (-1)*b`.
    pub fn sub(a: Expr, b: Expr) -> Expr {
        Expr::add(a, Expr::neg(b))
    }

    /// Division, represented as `a * b^-1`.
    pub fn div(a: Expr, b: Expr) -> Expr {
        Expr::mul(a, Expr::pow(b, Expr::Integer(-1)))
    }

    /// True iff a `Symbol` with this name occurs anywhere in the tree.
    pub fn has_symbol(&self, name: &str) -> bool {
        match self {
            Expr::Integer(_) | Expr::Rational(_) | Expr::Real(_) | Expr::Constant(_) => false,
            Expr::Symbol(s) => s == name,
            Expr::Add(children) | Expr::Mul(children) => {
                children.iter().any(|c| c.has_symbol(name))
            }
            Expr::Pow(base, exp) => base.has_symbol(name) || exp.has_symbol(name),
            Expr::Func(_, arg) => arg.has_symbol(name),
        }
    }

    /// Literal view of `Integer`/`Rational` nodes.
    pub fn as_literal(&self) -> Option<Rational> {
        as_literal(self)
    }

    /// Integer view, for exponent-specialized rules.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Expr::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Integer(0))
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Expr::Integer(1))
    }
}

/// Collapse a rational back to the canonical literal node.
pub fn lit(r: Rational) -> Expr {
    if r.is_integer() {
        Expr::Integer(*r.numer())
    } else {
        Expr::Rational(r)
    }
}

fn as_literal(e: &Expr) -> Option<Rational> {
    match e {
        Expr::Integer(n) => Some(Rational::from_integer(*n)),
        Expr::Rational(r) => Some(*r),
        _ => None,
    }
}

/// Split a canonical non-literal term into (rational coefficient, key).
/// A `Mul` whose leading child is a literal yields that literal; everything
/// else has coefficient 1 and is its own key.
fn split_coefficient(term: Expr) -> (Rational, Expr) {
    if let Expr::Mul(factors) = &term {
        if let Some(c) = as_literal(&factors[0]) {
            let rest = factors[1..].to_vec();
            let key = if rest.len() == 1 {
                rest.into_iter().next().expect("len checked")
            } else {
                Expr::Mul(rest)
            };
            return (c, key);
        }
    }
    (Rational::from_integer(1), term)
}

/// Rebuild `coef * key` without re-canonicalizing: `key` is a canonical
/// non-literal term and `coef` is neither 0 nor 1.
fn attach_coefficient(coef: Rational, key: Expr) -> Expr {
    let mut children = vec![lit(coef)];
    match key {
        Expr::Mul(factors) => children.extend(factors),
        other => children.push(other),
    }
    Expr::Mul(children)
}

/// Exact literal power, or `None` when folding would overflow or leave the
/// rationals (odd roots of non-perfect powers, negative bases under roots).
fn pow_literal(base: Rational, exp: Rational) -> Option<Rational> {
    if exp.is_integer() {
        let n = *exp.numer();
        if n.unsigned_abs() > 32 {
            return None;
        }
        let (numer, denom) = if n >= 0 {
            (*base.numer(), *base.denom())
        } else {
            (*base.denom(), *base.numer())
        };
        let k = n.unsigned_abs() as u32;
        let pn = numer.checked_pow(k)?;
        let pd = denom.checked_pow(k)?;
        if pd == 0 {
            return None;
        }
        return Some(Rational::new(pn, pd));
    }
    if base < Rational::from_integer(0) {
        return None;
    }
    let q = *exp.denom();
    if q > 64 {
        return None;
    }
    let root_numer = exact_nth_root(*base.numer(), q)?;
    let root_denom = exact_nth_root(*base.denom(), q)?;
    pow_literal(
        Rational::new(root_numer, root_denom),
        Rational::from_integer(*exp.numer()),
    )
}

/// The exact non-negative integer n-th root of `x`, if one exists.
fn exact_nth_root(x: i64, n: i64) -> Option<i64> {
    if x < 0 || n <= 0 {
        return None;
    }
    if x <= 1 {
        return Some(x);
    }
    let guess = (x as f64).powf(1.0 / n as f64).round() as i64;
    for candidate in guess.saturating_sub(2)..=guess.saturating_add(2) {
        if candidate >= 0 && candidate.checked_pow(n as u32) == Some(x) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    #[test]
    fn add_flattens_and_folds_literals() {
        let e = Expr::add(Expr::add(Expr::Integer(1), x()), Expr::Integer(2));
        assert_eq!(e, Expr::Add(vec![Expr::Integer(3), x()]));
    }

    #[test]
    fn add_collapses_single_child() {
        assert_eq!(Expr::add(x(), Expr::Integer(0)), x());
        assert_eq!(Expr::add(Expr::Integer(0), Expr::Integer(0)), Expr::Integer(0));
    }

    #[test]
    fn add_collects_like_terms() {
        // x + x -> 2*x
        assert_eq!(
            Expr::add(x(), x()),
            Expr::Mul(vec![Expr::Integer(2), x()])
        );
        // x - x -> 0
        assert_eq!(Expr::sub(x(), x()), Expr::Integer(0));
        // 2*x + 3*x -> 5*x
        let two_x = Expr::mul(Expr::Integer(2), x());
        let three_x = Expr::mul(Expr::Integer(3), x());
        assert_eq!(
            Expr::add(two_x, three_x),
            Expr::Mul(vec![Expr::Integer(5), x()])
        );
    }

    #[test]
    fn add_keeps_distinct_terms_sorted() {
        let e = Expr::add_terms(vec![y(), Expr::Integer(4), x()]);
        assert_eq!(e, Expr::Add(vec![Expr::Integer(4), x(), y()]));
    }

    #[test]
    fn mul_flattens_folds_and_absorbs_zero() {
        let e = Expr::mul(Expr::mul(Expr::Integer(2), x()), Expr::Integer(3));
        assert_eq!(e, Expr::Mul(vec![Expr::Integer(6), x()]));
        assert_eq!(Expr::mul(x(), Expr::Integer(0)), Expr::Integer(0));
        assert_eq!(Expr::mul(Expr::Integer(1), x()), x());
    }

    #[test]
    fn mul_merges_repeated_bases() {
        // x * x -> x^2
        assert_eq!(
            Expr::mul(x(), x()),
            Expr::Pow(Box::new(x()), Box::new(Expr::Integer(2)))
        );
        // x * x^-1 -> 1
        let inv = Expr::pow(x(), Expr::Integer(-1));
        assert_eq!(Expr::mul(x(), inv), Expr::Integer(1));
    }

    #[test]
    fn div_of_literals_folds_to_rational() {
        assert_eq!(
            Expr::div(Expr::Integer(1), Expr::Integer(2)),
            Expr::Rational(Rational::new(1, 2))
        );
        assert_eq!(Expr::div(Expr::Integer(4), Expr::Integer(2)), Expr::Integer(2));
    }

    #[test]
    fn div_by_zero_stays_symbolic() {
        let e = Expr::div(Expr::Integer(1), Expr::Integer(0));
        assert_eq!(
            e,
            Expr::Pow(Box::new(Expr::Integer(0)), Box::new(Expr::Integer(-1)))
        );
    }

    #[test]
    fn pow_shortcuts() {
        assert_eq!(Expr::pow(x(), Expr::Integer(0)), Expr::Integer(1));
        assert_eq!(Expr::pow(x(), Expr::Integer(1)), x());
        assert_eq!(Expr::pow(Expr::Integer(1), x()), Expr::Integer(1));
        assert_eq!(Expr::pow(Expr::Integer(0), Expr::Integer(3)), Expr::Integer(0));
        assert_eq!(Expr::pow(Expr::Integer(0), Expr::Integer(0)), Expr::Integer(1));
    }

    #[test]
    fn pow_folds_literals() {
        assert_eq!(Expr::pow(Expr::Integer(2), Expr::Integer(3)), Expr::Integer(8));
        assert_eq!(
            Expr::pow(Expr::Integer(2), Expr::Integer(-1)),
            Expr::Rational(Rational::new(1, 2))
        );
        // exact square root
        assert_eq!(
            Expr::pow(Expr::Integer(16), Expr::rational(1, 2)),
            Expr::Integer(4)
        );
        // inexact roots stay symbolic
        let e = Expr::pow(Expr::Integer(2), Expr::rational(1, 2));
        assert!(matches!(e, Expr::Pow(_, _)));
    }

    #[test]
    fn pow_of_pow_merges_integer_exponents() {
        let inner = Expr::pow(x(), Expr::Integer(2));
        assert_eq!(
            Expr::pow(inner, Expr::Integer(3)),
            Expr::Pow(Box::new(x()), Box::new(Expr::Integer(6)))
        );
    }

    #[test]
    fn log_of_e_folds_to_one() {
        assert_eq!(
            Expr::func(FuncKind::Log, Expr::Constant(MathConst::E)),
            Expr::Integer(1)
        );
    }

    #[test]
    fn sub_is_add_of_negated() {
        let e = Expr::sub(x(), y());
        assert_eq!(e, Expr::Add(vec![x(), Expr::Mul(vec![Expr::Integer(-1), y()])]));
    }

    #[test]
    fn has_symbol_walks_the_tree() {
        let e = Expr::add(Expr::mul(Expr::Integer(2), x()), Expr::func(FuncKind::Sin, y()));
        assert!(e.has_symbol("x"));
        assert!(e.has_symbol("y"));
        assert!(!e.has_symbol("z"));
    }

    #[test]
    fn literal_child_sorts_first() {
        let e = Expr::add_terms(vec![x(), Expr::Integer(7)]);
        match e {
            Expr::Add(children) => assert_eq!(children[0], Expr::Integer(7)),
            other => panic!("expected Add, got {other:?}"),
        }
    }
}
