//! Symbolic equality verification with a wall-clock budget.
//!
//! Forms `lhs - rhs`, expands, and asks the structural zero test. The
//! tri-state collapses at this boundary: an indeterminate residue reports
//! `false`, so a `true` is a proof while a `false` may only mean "unproven".
//! Callers needing more confidence pair this with the numeric probe.

use crate::ast::Expr;
use crate::error::MathError;
use crate::expand::{classify, expand, ZeroTest};
use crate::parser::parse;
use log::debug;
use std::time::Instant;

/// Decide whether `lhs` and `rhs` are structurally equal after expansion,
/// giving up with `VerifierError` once `timeout_ms` of wall time elapses.
pub fn verify_equal(lhs: &str, rhs: &str, timeout_ms: f64) -> Result<bool, MathError> {
    let start = Instant::now();

    let lhs = parse(lhs)?;
    let rhs = parse(rhs)?;
    check_deadline(&start, timeout_ms)?;

    let difference = Expr::sub(lhs, rhs);
    let expanded = expand(&difference);
    check_deadline(&start, timeout_ms)?;

    let verdict = classify(&expanded);
    debug!(
        "verify_equal: {verdict:?} after {:.3}ms",
        start.elapsed().as_secs_f64() * 1e3
    );
    Ok(verdict == ZeroTest::Zero)
}

fn check_deadline(start: &Instant, timeout_ms: f64) -> Result<(), MathError> {
    if start.elapsed().as_secs_f64() * 1e3 > timeout_ms {
        Err(MathError::verifier("Verification timeout exceeded"))
    } else {
        Ok(())
    }
}
