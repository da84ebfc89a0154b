//! Polynomial expansion and the structural zero test used by the equality
//! verifier.
//!
//! `expand` distributes every product over every sum and unrolls non-negative
//! integer powers of sums into repeated multiplication. Because the `Add`
//! constructor collects like terms with exact coefficients, cancellation
//! falls out of construction and the zero test reduces to a structural
//! comparison with the integer 0.

use crate::ast::Expr;

/// How expansion bounds pathological inputs: powers above this are left
/// symbolic rather than unrolled.
const MAX_UNROLLED_POWER: i64 = 64;

/// Tri-state outcome of the structural zero test.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ZeroTest {
    Zero,
    NonZero,
    /// Symbolic residue survived expansion; nothing is decided.
    Indeterminate,
}

/// Fully distribute products over sums; repeated passes handle products that
/// expansion itself uncovers.
pub fn expand(expr: &Expr) -> Expr {
    let mut current = expr.clone();
    for _ in 0..32 {
        let next = expand_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn expand_pass(expr: &Expr) -> Expr {
    match expr {
        Expr::Add(terms) => Expr::add_terms(terms.iter().map(expand_pass).collect()),
        Expr::Mul(factors) => {
            let mut expanded = factors.iter().map(expand_pass);
            let first = expanded.next().expect("Mul has at least two children");
            expanded.fold(first, distribute)
        }
        Expr::Pow(base, exp) => {
            let base = expand_pass(base);
            let exp = expand_pass(exp);
            if let Some(n) = exp.as_integer() {
                if (2..=MAX_UNROLLED_POWER).contains(&n) && matches!(base, Expr::Add(_)) {
                    let mut acc = base.clone();
                    for _ in 1..n {
                        acc = distribute(acc, base.clone());
                    }
                    return acc;
                }
            }
            Expr::pow(base, exp)
        }
        Expr::Func(kind, arg) => Expr::func(*kind, expand_pass(arg)),
        atom => atom.clone(),
    }
}

/// Product of two expanded expressions, cross-multiplying sums.
fn distribute(a: Expr, b: Expr) -> Expr {
    let a_terms = into_terms(a);
    let b_terms = into_terms(b);
    if a_terms.len() == 1 && b_terms.len() == 1 {
        let mut a_terms = a_terms;
        let mut b_terms = b_terms;
        return Expr::mul(a_terms.remove(0), b_terms.remove(0));
    }
    let mut cross = Vec::with_capacity(a_terms.len() * b_terms.len());
    for ta in &a_terms {
        for tb in &b_terms {
            cross.push(Expr::mul(ta.clone(), tb.clone()));
        }
    }
    Expr::add_terms(cross)
}

fn into_terms(e: Expr) -> Vec<Expr> {
    match e {
        Expr::Add(terms) => terms,
        other => vec![other],
    }
}

/// Expand, then classify against the integer 0.
pub fn zero_test(expr: &Expr) -> ZeroTest {
    classify(&expand(expr))
}

/// Classify an already-expanded expression.
pub fn classify(expanded: &Expr) -> ZeroTest {
    match expanded {
        Expr::Integer(0) => ZeroTest::Zero,
        Expr::Integer(_) | Expr::Rational(_) | Expr::Constant(_) => ZeroTest::NonZero,
        Expr::Real(x) => {
            if x.0 == 0.0 {
                ZeroTest::Zero
            } else {
                ZeroTest::NonZero
            }
        }
        _ => ZeroTest::Indeterminate,
    }
}

/// Boundary form of the tri-state: only a definite zero counts.
pub fn is_zero(expr: &Expr) -> bool {
    zero_test(expr) == ZeroTest::Zero
}
