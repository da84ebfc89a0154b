//! Random-point numeric equality probing.
//!
//! Both sides are parsed once, then evaluated at deterministic random points
//! in the sampling domain. The verdict is bit-for-bit reproducible for a
//! given input tuple, because the PRNG stream and the evaluation order are
//! both fixed.

use crate::error::MathError;
use crate::eval::evaluate;
use crate::parser::parse;
use crate::rng::RngStream;
use std::collections::HashMap;

/// Outcome of a probe run.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeResult {
    pub equal: bool,
    pub trials_executed: u32,
    pub failures: u32,
    pub max_errors: Vec<f64>,
}

/// Default probe configuration for callers that do not care to tune it.
pub const DEFAULT_TRIALS: u32 = 10;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_DOMAIN: (f64, f64) = (0.5, 2.0);
pub const DEFAULT_THRESHOLD: f64 = 1e-6;

/// Draws with magnitude below this are nudged away from zero to avoid
/// division-by-tiny artifacts.
const TINY_DRAW: f64 = 1e-10;

/// Relative-error regularizer.
const REL_EPS: f64 = 1e-10;

/// Probe `lhs == rhs` at `trials` random points over `[domain_min, domain_max]`.
#[allow(clippy::too_many_arguments)]
pub fn probe_equal(
    lhs: &str,
    rhs: &str,
    symbols: &[&str],
    trials: u32,
    seed: u64,
    domain_min: f64,
    domain_max: f64,
    threshold: f64,
) -> Result<ProbeResult, MathError> {
    if symbols.is_empty() {
        return Err(MathError::numeric("No symbols provided for numeric probe"));
    }
    if trials == 0 {
        return Err(MathError::numeric("Number of trials must be positive"));
    }
    if domain_min >= domain_max {
        return Err(MathError::numeric("Invalid domain: min must be less than max"));
    }

    let lhs = parse(lhs)?;
    let rhs = parse(rhs)?;

    let mut rng = RngStream::new(seed);
    let mut failures = 0u32;
    let mut max_errors = Vec::with_capacity(trials as usize);

    for _ in 0..trials {
        let mut point: HashMap<String, f64> = HashMap::with_capacity(symbols.len());
        for sym in symbols {
            let mut value = rng.uniform_range(domain_min, domain_max);
            if value.abs() < TINY_DRAW {
                value = domain_min + 0.1;
            }
            point.insert((*sym).to_string(), value);
        }

        let (lhs_val, rhs_val) = match (evaluate(&lhs, &point), evaluate(&rhs, &point)) {
            (Ok(l), Ok(r)) => (l, r),
            _ => {
                failures += 1;
                max_errors.push(f64::INFINITY);
                continue;
            }
        };
        if !lhs_val.is_finite() || !rhs_val.is_finite() {
            failures += 1;
            max_errors.push(f64::INFINITY);
            continue;
        }

        let abs_error = (lhs_val - rhs_val).abs();
        let rel_error = abs_error / (rhs_val.abs() + REL_EPS);
        let error = abs_error.max(rel_error);
        max_errors.push(error);
        if error > threshold {
            failures += 1;
        }
    }

    Ok(ProbeResult {
        equal: failures == 0,
        trials_executed: trials,
        failures,
        max_errors,
    })
}
