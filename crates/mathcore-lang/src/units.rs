//! Dimensional consistency analysis over the seven SI base dimensions.
//!
//! Symbols carry declared dimensions; the analyzer walks the expression and
//! checks that sums combine matching dimensions, exponents are dimensionless,
//! and elementary functions take dimensionless arguments. Unknown symbols
//! degrade to warnings, not errors.

use crate::ast::Expr;
use crate::error::MathError;
use crate::parser::parse;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Exponent vector over the SI base dimensions (L, M, T, I, K, N, J).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Dimension {
    pub length: i32,
    pub mass: i32,
    pub time: i32,
    pub current: i32,
    pub temperature: i32,
    pub amount: i32,
    pub luminosity: i32,
}

impl Dimension {
    pub const fn new(
        length: i32,
        mass: i32,
        time: i32,
        current: i32,
        temperature: i32,
        amount: i32,
        luminosity: i32,
    ) -> Self {
        Dimension {
            length,
            mass,
            time,
            current,
            temperature,
            amount,
            luminosity,
        }
    }

    pub const fn dimensionless() -> Self {
        Dimension::new(0, 0, 0, 0, 0, 0, 0)
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Dimension::dimensionless()
    }
}

impl Add for Dimension {
    type Output = Dimension;

    fn add(self, other: Dimension) -> Dimension {
        Dimension::new(
            self.length + other.length,
            self.mass + other.mass,
            self.time + other.time,
            self.current + other.current,
            self.temperature + other.temperature,
            self.amount + other.amount,
            self.luminosity + other.luminosity,
        )
    }
}

impl Sub for Dimension {
    type Output = Dimension;

    fn sub(self, other: Dimension) -> Dimension {
        Dimension::new(
            self.length - other.length,
            self.mass - other.mass,
            self.time - other.time,
            self.current - other.current,
            self.temperature - other.temperature,
            self.amount - other.amount,
            self.luminosity - other.luminosity,
        )
    }
}

impl Mul<i32> for Dimension {
    type Output = Dimension;

    fn mul(self, scalar: i32) -> Dimension {
        Dimension::new(
            self.length * scalar,
            self.mass * scalar,
            self.time * scalar,
            self.current * scalar,
            self.temperature * scalar,
            self.amount * scalar,
            self.luminosity * scalar,
        )
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return f.write_str("dimensionless");
        }
        let mut first = true;
        for (name, power) in [
            ("L", self.length),
            ("M", self.mass),
            ("T", self.time),
            ("A", self.current),
            ("K", self.temperature),
            ("mol", self.amount),
            ("cd", self.luminosity),
        ] {
            if power == 0 {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            f.write_str(name)?;
            if power != 1 {
                write!(f, "^{power}")?;
            }
        }
        Ok(())
    }
}

/// Diagnostics and inferred dimensions from one check.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitCheckResult {
    pub ok: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub inferred: BTreeMap<String, Dimension>,
}

/// Check the dimensional consistency of `expr` given declared symbol
/// dimensions. The overall inferred dimension is recorded under `"result"`.
pub fn unit_check(
    expr: &str,
    symbol_dims: &HashMap<String, Dimension>,
) -> Result<UnitCheckResult, MathError> {
    let parsed = parse(expr)?;
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let dim = infer(&parsed, symbol_dims, &mut warnings, &mut errors);

    let mut inferred = BTreeMap::new();
    inferred.insert("result".to_string(), dim);
    Ok(UnitCheckResult {
        ok: errors.is_empty(),
        warnings,
        errors,
        inferred,
    })
}

fn infer(
    expr: &Expr,
    dims: &HashMap<String, Dimension>,
    warnings: &mut Vec<String>,
    errors: &mut Vec<String>,
) -> Dimension {
    match expr {
        Expr::Integer(_) | Expr::Rational(_) | Expr::Real(_) | Expr::Constant(_) => {
            Dimension::dimensionless()
        }
        Expr::Symbol(s) => match dims.get(s) {
            Some(d) => *d,
            None => {
                warnings.push(format!("Unknown symbol dimension: {s}"));
                Dimension::dimensionless()
            }
        },
        Expr::Add(terms) => {
            let first = infer(&terms[0], dims, warnings, errors);
            for term in &terms[1..] {
                let dim = infer(term, dims, warnings, errors);
                if dim != first {
                    errors.push("Addition/subtraction requires matching dimensions".to_string());
                    return Dimension::dimensionless();
                }
            }
            first
        }
        Expr::Mul(factors) => factors
            .iter()
            .map(|f| infer(f, dims, warnings, errors))
            .fold(Dimension::dimensionless(), |acc, d| acc + d),
        Expr::Pow(base, exp) => {
            let base_dim = infer(base, dims, warnings, errors);
            let exp_dim = infer(exp, dims, warnings, errors);
            if !exp_dim.is_dimensionless() {
                errors.push("Exponent must be dimensionless".to_string());
                return Dimension::dimensionless();
            }
            match exp.as_ref() {
                Expr::Integer(n) => base_dim * (*n as i32),
                Expr::Rational(_) => {
                    if !base_dim.is_dimensionless() {
                        warnings.push("Fractional power of dimensional quantity".to_string());
                    }
                    Dimension::dimensionless()
                }
                _ => {
                    if !base_dim.is_dimensionless() {
                        errors.push("Non-integer power requires dimensionless base".to_string());
                    }
                    Dimension::dimensionless()
                }
            }
        }
        Expr::Func(kind, arg) => {
            let arg_dim = infer(arg, dims, warnings, errors);
            if !arg_dim.is_dimensionless() {
                errors.push(format!("{}() argument must be dimensionless", kind.name()));
            }
            Dimension::dimensionless()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(entries: &[(&str, Dimension)]) -> HashMap<String, Dimension> {
        entries
            .iter()
            .map(|(name, d)| (name.to_string(), *d))
            .collect()
    }

    fn meters() -> Dimension {
        Dimension::new(1, 0, 0, 0, 0, 0, 0)
    }

    fn seconds() -> Dimension {
        Dimension::new(0, 0, 1, 0, 0, 0, 0)
    }

    #[test]
    fn dimension_arithmetic() {
        let velocity = meters() - seconds();
        assert_eq!(velocity, Dimension::new(1, 0, -1, 0, 0, 0, 0));
        assert_eq!(velocity * 2, Dimension::new(2, 0, -2, 0, 0, 0, 0));
        assert!(Dimension::default().is_dimensionless());
    }

    #[test]
    fn dimension_display() {
        assert_eq!(Dimension::dimensionless().to_string(), "dimensionless");
        assert_eq!(meters().to_string(), "L");
        assert_eq!(
            Dimension::new(2, 1, -2, 0, 0, 0, 0).to_string(),
            "L^2 M T^-2"
        );
    }

    #[test]
    fn kinetic_energy_is_consistent() {
        let table = dims(&[
            ("m", Dimension::new(0, 1, 0, 0, 0, 0, 0)),
            ("v", Dimension::new(1, 0, -1, 0, 0, 0, 0)),
        ]);
        let result = unit_check("(1/2)*m*v^2", &table).unwrap();
        assert!(result.ok, "{:?}", result.errors);
        assert_eq!(
            result.inferred["result"],
            Dimension::new(2, 1, -2, 0, 0, 0, 0)
        );
    }

    #[test]
    fn mismatched_addition_is_an_error() {
        let table = dims(&[("distance", meters()), ("time", seconds())]);
        let result = unit_check("distance + time", &table).unwrap();
        assert!(!result.ok);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("matching dimensions")));
    }

    #[test]
    fn unknown_symbols_warn_but_pass() {
        let result = unit_check("a + b", &HashMap::new()).unwrap();
        assert!(result.ok);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("Unknown symbol dimension"));
    }

    #[test]
    fn dimensional_exponent_is_an_error() {
        let table = dims(&[("x", meters()), ("t", seconds())]);
        let result = unit_check("x^t", &table).unwrap();
        assert!(!result.ok);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("Exponent must be dimensionless")));
    }

    #[test]
    fn fractional_power_of_dimensional_base_warns() {
        let table = dims(&[("x", meters())]);
        let result = unit_check("x^(1/2)", &table).unwrap();
        assert!(result.ok);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Fractional power")));
    }

    #[test]
    fn symbolic_power_of_dimensional_base_is_an_error() {
        let table = dims(&[("x", meters())]);
        let result = unit_check("x^y", &table).unwrap();
        assert!(!result.ok);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("dimensionless base")));
    }

    #[test]
    fn function_arguments_must_be_dimensionless() {
        let table = dims(&[("t", seconds())]);
        let result = unit_check("sin(t)", &table).unwrap();
        assert!(!result.ok);
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("sin() argument must be dimensionless")));
        // a dimensionless ratio is fine
        let table = dims(&[("t", seconds()), ("T", seconds())]);
        let result = unit_check("sin(t/T)", &table).unwrap();
        assert!(result.ok, "{:?}", result.errors);
    }

    #[test]
    fn parse_failure_is_a_parse_error() {
        let err = unit_check("x +", &HashMap::new()).unwrap_err();
        assert!(matches!(err, MathError::Parse(_)));
    }
}
