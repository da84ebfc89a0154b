//! Pattern-directed integration over a small integrable subclass.
//!
//! Rules are tried in a fixed order; anything outside the ruleset fails with
//! `SymbolicError("Unsupported integrand")` rather than guessing. No
//! integration constant is added.

use crate::ast::{Expr, FuncKind, MathConst};
use crate::error::MathError;

/// Antiderivative of `expr` with respect to the symbol named `var`.
pub fn integrate(expr: &Expr, var: &str) -> Result<Expr, MathError> {
    // Anything free of the variable integrates to expr * v.
    if !expr.has_symbol(var) {
        return Ok(Expr::mul(expr.clone(), Expr::symbol(var)));
    }
    match expr {
        Expr::Symbol(_) => {
            // has_symbol above guarantees this is the variable itself.
            Ok(Expr::div(
                Expr::pow(Expr::symbol(var), Expr::Integer(2)),
                Expr::Integer(2),
            ))
        }
        Expr::Add(terms) => {
            let integrated = terms
                .iter()
                .map(|t| integrate(t, var))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::add_terms(integrated))
        }
        Expr::Mul(factors) => {
            // Pull variable-free factors out; exactly one dependent factor
            // may remain.
            let mut constant: Vec<Expr> = Vec::new();
            let mut dependent: Option<&Expr> = None;
            for factor in factors {
                if factor.has_symbol(var) {
                    if dependent.is_some() {
                        return Err(unsupported());
                    }
                    dependent = Some(factor);
                } else {
                    constant.push(factor.clone());
                }
            }
            let dependent = dependent.expect("expr contains the variable");
            Ok(Expr::mul(
                Expr::mul_factors(constant),
                integrate(dependent, var)?,
            ))
        }
        Expr::Pow(base, exp) => {
            if **base == Expr::Constant(MathConst::E) {
                if **exp == Expr::symbol(var) {
                    return Ok(expr.clone());
                }
                return Err(unsupported());
            }
            if **base != Expr::symbol(var) {
                return Err(unsupported());
            }
            match exp.as_integer() {
                Some(-1) => Ok(Expr::func(FuncKind::Log, Expr::symbol(var))),
                Some(n) => Ok(Expr::div(
                    Expr::pow(Expr::symbol(var), Expr::Integer(n + 1)),
                    Expr::Integer(n + 1),
                )),
                None => Err(unsupported()),
            }
        }
        Expr::Func(FuncKind::Exp, arg) if **arg == Expr::symbol(var) => Ok(expr.clone()),
        Expr::Func(FuncKind::Sin, arg) if **arg == Expr::symbol(var) => {
            Ok(Expr::neg(Expr::func(FuncKind::Cos, Expr::symbol(var))))
        }
        Expr::Func(FuncKind::Cos, arg) if **arg == Expr::symbol(var) => {
            Ok(Expr::func(FuncKind::Sin, Expr::symbol(var)))
        }
        _ => Err(unsupported()),
    }
}

fn unsupported() -> MathError {
    MathError::symbolic("Unsupported integrand")
}
