//! Numeric evaluation of an expression under an environment of symbol values.
//!
//! Folds `Add`/`Mul` left-to-right over the canonical child order, so the
//! result is reproducible. Non-finite values are returned as-is; callers
//! decide how to treat them.

use crate::ast::{Expr, FuncKind};
use crate::error::MathError;
use std::collections::HashMap;

/// Evaluate `expr` with each free symbol bound by `env`.
pub fn evaluate(expr: &Expr, env: &HashMap<String, f64>) -> Result<f64, MathError> {
    match expr {
        Expr::Integer(n) => Ok(*n as f64),
        Expr::Rational(r) => Ok(*r.numer() as f64 / *r.denom() as f64),
        Expr::Real(x) => Ok(x.0),
        Expr::Symbol(s) => env
            .get(s)
            .copied()
            .ok_or_else(|| MathError::numeric(format!("Undefined symbol: {s}"))),
        Expr::Constant(c) => Ok(c.value()),
        Expr::Add(terms) => {
            let mut sum = 0.0;
            for term in terms {
                sum += evaluate(term, env)?;
            }
            Ok(sum)
        }
        Expr::Mul(factors) => {
            let mut product = 1.0;
            for factor in factors {
                product *= evaluate(factor, env)?;
            }
            Ok(product)
        }
        Expr::Pow(base, exp) => {
            let base = evaluate(base, env)?;
            let exp = evaluate(exp, env)?;
            // IEEE semantics, including powf's 0^0 = 1 convention.
            Ok(base.powf(exp))
        }
        Expr::Func(kind, arg) => {
            let arg = evaluate(arg, env)?;
            Ok(match kind {
                FuncKind::Sin => arg.sin(),
                FuncKind::Cos => arg.cos(),
                FuncKind::Tan => arg.tan(),
                FuncKind::Log => arg.ln(),
                FuncKind::Exp => arg.exp(),
            })
        }
    }
}
