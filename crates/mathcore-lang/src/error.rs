//! Error taxonomy for the math core. One variant per failure kind; the
//! display form is `KindError: message`, which is what the CLI prints.

use thiserror::Error;

/// Errors surfaced by the public entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Input could not be tokenized or parsed.
    #[error("ParseError: {0}")]
    Parse(String),
    /// Parse succeeded but the transformation has no rule for this input.
    #[error("SymbolicError: {0}")]
    Symbolic(String),
    /// Timeout exceeded, or the zero-test machinery failed.
    #[error("VerifierError: {0}")]
    Verifier(String),
    /// Probe preconditions violated, or the evaluator hit an undefined symbol.
    #[error("NumericError: {0}")]
    Numeric(String),
    /// ODE validation or evaluation failure.
    #[error("ODEError: {0}")]
    Ode(String),
    /// Dimensional analysis could not proceed.
    #[error("UnitError: {0}")]
    Unit(String),
}

impl MathError {
    pub fn parse(msg: impl Into<String>) -> Self {
        MathError::Parse(msg.into())
    }

    pub fn symbolic(msg: impl Into<String>) -> Self {
        MathError::Symbolic(msg.into())
    }

    pub fn verifier(msg: impl Into<String>) -> Self {
        MathError::Verifier(msg.into())
    }

    pub fn numeric(msg: impl Into<String>) -> Self {
        MathError::Numeric(msg.into())
    }

    pub fn ode(msg: impl Into<String>) -> Self {
        MathError::Ode(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_kind_prefix() {
        let e = MathError::parse("unexpected token at position 3");
        assert_eq!(e.to_string(), "ParseError: unexpected token at position 3");
        let e = MathError::symbolic("Unsupported integrand");
        assert_eq!(e.to_string(), "SymbolicError: Unsupported integrand");
    }
}
