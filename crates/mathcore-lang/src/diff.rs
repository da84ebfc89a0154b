//! Symbolic differentiation by the standard rules. Results flow through the
//! smart constructors, so the output is canonical without a separate
//! simplification pass.

use crate::ast::{lit, Expr, FuncKind, MathConst, Rational};

/// Differentiate `expr` with respect to the symbol named `var`.
pub fn diff(expr: &Expr, var: &str) -> Expr {
    match expr {
        Expr::Integer(_) | Expr::Rational(_) | Expr::Real(_) | Expr::Constant(_) => {
            Expr::Integer(0)
        }
        Expr::Symbol(s) => {
            if s == var {
                Expr::Integer(1)
            } else {
                Expr::Integer(0)
            }
        }
        Expr::Add(terms) => Expr::add_terms(terms.iter().map(|t| diff(t, var)).collect()),
        Expr::Mul(factors) => {
            // Product rule over n factors: sum_i f_i' * prod_{j != i} f_j.
            let mut terms = Vec::with_capacity(factors.len());
            for (i, factor) in factors.iter().enumerate() {
                let derivative = diff(factor, var);
                if derivative.is_zero() {
                    continue;
                }
                let mut parts: Vec<Expr> = factors
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, g)| g.clone())
                    .collect();
                parts.push(derivative);
                terms.push(Expr::mul_factors(parts));
            }
            Expr::add_terms(terms)
        }
        Expr::Pow(base, exp) => {
            let base_derivative = diff(base, var);
            if let Some(n) = exp.as_literal() {
                // d/dx b^n = n * b^(n-1) * b'
                return Expr::mul_factors(vec![
                    lit(n),
                    Expr::pow((**base).clone(), lit(n - Rational::from_integer(1))),
                    base_derivative,
                ]);
            }
            let exp_derivative = diff(exp, var);
            if **base == Expr::Constant(MathConst::E) {
                // d/dx e^u = e^u * u'
                return Expr::mul(expr.clone(), exp_derivative);
            }
            // General case: b^e * (e' * log b + e * b' / b).
            let log_term = Expr::mul(exp_derivative, Expr::func(FuncKind::Log, (**base).clone()));
            let ratio_term = Expr::mul_factors(vec![
                (**exp).clone(),
                base_derivative,
                Expr::pow((**base).clone(), Expr::Integer(-1)),
            ]);
            Expr::mul(expr.clone(), Expr::add(log_term, ratio_term))
        }
        Expr::Func(kind, arg) => {
            let inner = diff(arg, var);
            let arg = (**arg).clone();
            let outer = match kind {
                FuncKind::Sin => Expr::func(FuncKind::Cos, arg),
                FuncKind::Cos => Expr::neg(Expr::func(FuncKind::Sin, arg)),
                // sec^2 written without introducing a new function tag
                FuncKind::Tan => Expr::add(
                    Expr::Integer(1),
                    Expr::pow(Expr::func(FuncKind::Tan, arg), Expr::Integer(2)),
                ),
                FuncKind::Log => Expr::pow(arg, Expr::Integer(-1)),
                FuncKind::Exp => Expr::func(FuncKind::Exp, arg),
            };
            Expr::mul(outer, inner)
        }
    }
}
