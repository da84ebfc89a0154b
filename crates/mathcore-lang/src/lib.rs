//! mathcore: a small computer-algebra and numeric-verification core.
//!
//! Expressions are parsed from infix text into a canonical immutable AST,
//! and every analysis is a recursive walk over that shared structure:
//! differentiation, rule-directed integration, polynomial equation solving,
//! structural equality verification, random-point numeric probing, a
//! fixed-step RK4 initial-value solver, and SI dimensional analysis.
//!
//! The public entry points are string-in/string-out (or struct-out) pure
//! functions; every result string re-parses to the same tree it was printed
//! from. There is no global state — identical inputs give identical outputs,
//! including the probe verifier's error records.

pub mod ast;
pub mod diff;
pub mod error;
pub mod eval;
pub mod expand;
pub mod integrate;
pub mod lexer;
pub mod ode;
pub mod parser;
pub mod printer;
pub mod probe;
pub mod rng;
pub mod solve;
pub mod units;
pub mod verify;

pub use ast::{Expr, FuncKind, MathConst};
pub use error::MathError;
pub use ode::{solve_ivp, OdeResult};
pub use parser::parse;
pub use probe::{probe_equal, ProbeResult};
pub use solve::Solutions;
pub use units::{unit_check, Dimension, UnitCheckResult};
pub use verify::verify_equal;

/// Antiderivative of `expr` with respect to `var`, pretty-printed.
///
/// Only the bounded integrable subclass is supported; anything outside it
/// fails with `SymbolicError("Unsupported integrand")`.
pub fn integrate(expr: &str, var: &str) -> Result<String, MathError> {
    let parsed = parser::parse(expr)?;
    let result = integrate::integrate(&parsed, var)?;
    Ok(result.to_string())
}

/// Derivative of `expr` with respect to `var`, pretty-printed.
pub fn diff(expr: &str, var: &str) -> Result<String, MathError> {
    let parsed = parser::parse(expr)?;
    Ok(diff::diff(&parsed, var).to_string())
}

/// Solve `lhs = rhs` for `var`. Solution sets render as `[r1, r2, ...]` in
/// lexicographic order of the printed roots; identities render as `all`.
pub fn solve_equation(lhs: &str, rhs: &str, var: &str) -> Result<String, MathError> {
    let lhs = parser::parse(lhs)?;
    let rhs = parser::parse(rhs)?;
    Ok(solve::solve(&lhs, &rhs, var)?.render())
}
