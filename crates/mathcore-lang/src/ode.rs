//! Fixed-step classical Runge-Kutta (RK4) initial-value solver.
//!
//! The right-hand side is a parsed expression over the independent variable
//! (first symbol) and the state variable (second symbol). The step count is
//! fixed: `h = (t1 - t0) / max_steps`. The `rtol`/`atol` parameters are
//! accepted for API compatibility but the fixed-step scheme does not consult
//! them.

use crate::error::MathError;
use crate::eval::evaluate;
use crate::parser::parse;
use log::debug;
use std::collections::HashMap;

/// Trajectory and status of one integration run.
#[derive(Clone, Debug, PartialEq)]
pub struct OdeResult {
    pub success: bool,
    pub t: Vec<f64>,
    pub y: Vec<Vec<f64>>,
    pub steps_taken: usize,
    pub message: String,
}

impl OdeResult {
    fn failure(message: impl Into<String>) -> Self {
        OdeResult {
            success: false,
            t: Vec::new(),
            y: Vec::new(),
            steps_taken: 0,
            message: message.into(),
        }
    }
}

/// Any state component beyond this magnitude aborts the run.
const EXPLOSION_THRESHOLD: f64 = 1e10;

/// Solve `dy/dt = f(t, y)` from `t0` to `t1` with initial state `y0`.
#[allow(clippy::too_many_arguments)]
pub fn solve_ivp(
    expr: &str,
    t0: f64,
    t1: f64,
    y0: &[f64],
    symbols: &[&str],
    rtol: f64,
    atol: f64,
    max_steps: usize,
) -> Result<OdeResult, MathError> {
    if t1 <= t0 {
        return Ok(OdeResult::failure("t1 must be greater than t0"));
    }
    if y0.is_empty() {
        return Ok(OdeResult::failure("Initial conditions y0 cannot be empty"));
    }
    if symbols.is_empty() {
        return Ok(OdeResult::failure("Symbols list cannot be empty"));
    }
    if max_steps == 0 {
        return Ok(OdeResult::failure("max_steps must be positive"));
    }
    if y0.len() > 1 {
        // One scalar right-hand side cannot drive several state components.
        return Err(MathError::ode(
            "Multi-component systems require one expression per component",
        ));
    }
    if symbols.len() != y0.len() + 1 {
        return Ok(OdeResult::failure("Mismatch between y values and symbols"));
    }

    let rhs = parse(expr).map_err(|e| match e {
        MathError::Parse(msg) => {
            MathError::Parse(format!("Failed to parse ODE expression: {msg}"))
        }
        other => other,
    })?;
    debug!("solve_ivp: fixed-step RK4 ignores rtol={rtol} atol={atol}");

    let h = (t1 - t0) / max_steps as f64;
    let mut t = t0;
    let mut y = y0[0];

    let mut result = OdeResult {
        success: false,
        t: Vec::with_capacity(max_steps + 1),
        y: Vec::with_capacity(max_steps + 1),
        steps_taken: 0,
        message: String::new(),
    };
    result.t.push(t);
    result.y.push(vec![y]);

    let eval_rhs = |t: f64, y: f64| -> Result<f64, String> {
        let mut point = HashMap::with_capacity(2);
        point.insert(symbols[0].to_string(), t);
        point.insert(symbols[1].to_string(), y);
        let value = evaluate(&rhs, &point).map_err(|e| e.to_string())?;
        if !value.is_finite() {
            return Err("Invalid function evaluation: NaN or Inf".to_string());
        }
        Ok(value)
    };

    for _ in 0..max_steps {
        let step = (|| -> Result<f64, String> {
            let k1 = eval_rhs(t, y)?;
            let k2 = eval_rhs(t + 0.5 * h, y + 0.5 * h * k1)?;
            let k3 = eval_rhs(t + 0.5 * h, y + 0.5 * h * k2)?;
            let k4 = eval_rhs(t + h, y + h * k3)?;
            Ok(y + (h / 6.0) * (k1 + 2.0 * k2 + 2.0 * k3 + k4))
        })();
        match step {
            Ok(next) => y = next,
            Err(msg) => {
                result.message = format!("ODE evaluation failed: {msg}");
                return Ok(result);
            }
        }
        t += h;
        result.steps_taken += 1;

        if y.abs() > EXPLOSION_THRESHOLD {
            result.message = "Solution exploded (exceeded threshold)".to_string();
            return Ok(result);
        }

        result.t.push(t);
        result.y.push(vec![y]);

        if t >= t1 - 1e-10 {
            break;
        }
    }

    result.success = true;
    result.message = "Integration completed successfully".to_string();
    Ok(result)
}
