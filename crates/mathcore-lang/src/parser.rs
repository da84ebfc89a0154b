//! Expression parser: precedence climbing over the lexer's token stream.
//!
//! Precedence, lowest to highest: `+ -` (left), `* /` (left), unary `-`,
//! `^` (right). Identifiers followed by `(` must name one of the known
//! elementary functions; `e` and `pi` parse as constants. The resulting
//! tree is canonical because every node is built through the smart
//! constructors.

use crate::ast::{Expr, FuncKind, MathConst};
use crate::error::MathError;
use crate::lexer::{Lexer, Tok};

const ADD_PREC: u8 = 40;
const MUL_PREC: u8 = 50;
const UNARY_PREC: u8 = 55;
const POW_PREC: u8 = 60;

/// Parse a single expression. Empty input and trailing tokens are errors.
pub fn parse(input: &str) -> Result<Expr, MathError> {
    let tokens: Vec<(usize, Tok, usize)> = Lexer::new(input).collect::<Result<_, _>>()?;
    if tokens.is_empty() {
        return Err(MathError::parse("empty input"));
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
    };
    let expr = parser.parse_expr(0)?;
    if let Some((start, tok, _)) = parser.current() {
        return Err(MathError::parse(format!(
            "unexpected {} at position {start}",
            tok.describe()
        )));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<(usize, Tok, usize)>,
    pos: usize,
    end: usize,
}

/// (precedence, right-associative) for binary operator tokens.
fn binary_op_info(tok: &Tok) -> Option<(u8, bool)> {
    match tok {
        Tok::Plus | Tok::Minus => Some((ADD_PREC, false)),
        Tok::Star | Tok::Slash => Some((MUL_PREC, false)),
        Tok::Caret => Some((POW_PREC, true)),
        _ => None,
    }
}

impl Parser {
    fn current(&self) -> Option<&(usize, Tok, usize)> {
        self.tokens.get(self.pos)
    }

    fn peek(&self) -> Option<&Tok> {
        self.current().map(|(_, t, _)| t)
    }

    fn advance(&mut self) -> Option<(usize, Tok, usize)> {
        let entry = self.tokens.get(self.pos).cloned();
        if entry.is_some() {
            self.pos += 1;
        }
        entry
    }

    fn expect(&mut self, expected: Tok) -> Result<(), MathError> {
        match self.advance() {
            Some((_, tok, _)) if tok == expected => Ok(()),
            Some((start, tok, _)) => Err(MathError::parse(format!(
                "expected {} but found {} at position {start}",
                expected.describe(),
                tok.describe()
            ))),
            None => Err(MathError::parse(format!(
                "expected {} but input ended at position {}",
                expected.describe(),
                self.end
            ))),
        }
    }

    fn parse_expr(&mut self, min_prec: u8) -> Result<Expr, MathError> {
        let mut left = self.parse_prefix()?;

        while let Some(tok) = self.peek() {
            let Some((prec, right_assoc)) = binary_op_info(tok) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            let (_, op, _) = self.advance().expect("peeked");
            let next_prec = if right_assoc { prec } else { prec + 1 };
            let right = self.parse_expr(next_prec)?;
            left = match op {
                Tok::Plus => Expr::add(left, right),
                Tok::Minus => Expr::sub(left, right),
                Tok::Star => Expr::mul(left, right),
                Tok::Slash => Expr::div(left, right),
                Tok::Caret => Expr::pow(left, right),
                _ => unreachable!("binary_op_info admits only operators"),
            };
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr, MathError> {
        if matches!(self.peek(), Some(Tok::Minus)) {
            self.advance();
            let operand = self.parse_expr(UNARY_PREC)?;
            return Ok(Expr::neg(operand));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, MathError> {
        match self.advance() {
            Some((_, Tok::Num(n), _)) => Ok(Expr::Integer(n)),
            Some((_, Tok::Ident(name), _)) => {
                Ok(match name.as_str() {
                    "e" => Expr::Constant(MathConst::E),
                    "pi" => Expr::Constant(MathConst::Pi),
                    _ => Expr::Symbol(name),
                })
            }
            Some((start, Tok::FuncIdent(name), _)) => {
                let kind = FuncKind::from_name(&name).ok_or_else(|| {
                    MathError::parse(format!(
                        "unknown function '{name}' at position {start}"
                    ))
                })?;
                self.expect(Tok::LParen)?;
                let arg = self.parse_expr(0)?;
                self.expect(Tok::RParen)?;
                Ok(Expr::func(kind, arg))
            }
            Some((_, Tok::LParen, _)) => {
                let inner = self.parse_expr(0)?;
                self.expect(Tok::RParen)?;
                Ok(inner)
            }
            Some((start, tok, _)) => Err(MathError::parse(format!(
                "unexpected {} at position {start}",
                tok.describe()
            ))),
            None => Err(MathError::parse(format!(
                "unexpected end of input at position {}",
                self.end
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Rational;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn parses_literals_and_symbols() {
        assert_eq!(parse("42").unwrap(), Expr::Integer(42));
        assert_eq!(parse("x").unwrap(), x());
        assert_eq!(parse("pi").unwrap(), Expr::Constant(MathConst::Pi));
        assert_eq!(parse("e").unwrap(), Expr::Constant(MathConst::E));
    }

    #[test]
    fn precedence_mul_binds_tighter_than_add() {
        assert_eq!(
            parse("1 + 2 * x").unwrap(),
            Expr::add(Expr::Integer(1), Expr::mul(Expr::Integer(2), x()))
        );
    }

    #[test]
    fn precedence_pow_binds_tighter_than_mul() {
        assert_eq!(
            parse("2 * x ^ 3").unwrap(),
            Expr::mul(Expr::Integer(2), Expr::pow(x(), Expr::Integer(3)))
        );
    }

    #[test]
    fn pow_is_right_associative() {
        assert_eq!(
            parse("x ^ y ^ 2").unwrap(),
            Expr::pow(x(), Expr::pow(Expr::symbol("y"), Expr::Integer(2)))
        );
    }

    #[test]
    fn unary_minus_binds_below_pow() {
        // -x^2 is -(x^2)
        assert_eq!(parse("-x^2").unwrap(), Expr::neg(Expr::pow(x(), Expr::Integer(2))));
        // (-x)^2 overrides
        assert_eq!(
            parse("(-x)^2").unwrap(),
            Expr::pow(Expr::neg(x()), Expr::Integer(2))
        );
        // but binds above multiplication: -x*y is (-x)*y, same tree as -(x*y)
        assert_eq!(
            parse("-x*y").unwrap(),
            Expr::neg(Expr::mul(x(), Expr::symbol("y")))
        );
    }

    #[test]
    fn division_is_mul_by_inverse() {
        assert_eq!(
            parse("x / y").unwrap(),
            Expr::mul(x(), Expr::pow(Expr::symbol("y"), Expr::Integer(-1)))
        );
        // literal division folds to an exact rational
        assert_eq!(parse("1/2").unwrap(), Expr::Rational(Rational::new(1, 2)));
    }

    #[test]
    fn subtraction_is_add_of_negated() {
        assert_eq!(parse("x - y").unwrap(), Expr::sub(x(), Expr::symbol("y")));
        assert_eq!(parse("3 - 1").unwrap(), Expr::Integer(2));
    }

    #[test]
    fn function_calls_parse() {
        assert_eq!(
            parse("sin(x)").unwrap(),
            Expr::func(FuncKind::Sin, x())
        );
        assert_eq!(
            parse("log(x + 1)").unwrap(),
            Expr::func(FuncKind::Log, Expr::add(x(), Expr::Integer(1)))
        );
    }

    #[test]
    fn unknown_function_is_a_parse_error() {
        let err = parse("sinh(x)").unwrap_err();
        assert!(err.to_string().contains("unknown function 'sinh'"), "{err}");
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let err = parse("1 2").unwrap_err();
        assert!(err.to_string().contains("position 2"), "{err}");
    }

    #[test]
    fn unbalanced_parens_are_rejected() {
        assert!(parse("(1 + 2").is_err());
        assert!(parse("1 + 2)").is_err());
        assert!(parse("sin(x").is_err());
    }

    #[test]
    fn dangling_operator_is_rejected() {
        let err = parse("1 +").unwrap_err();
        assert!(err.to_string().contains("end of input"), "{err}");
    }

    #[test]
    fn canonicalization_happens_at_parse_time() {
        // x + x collapses to 2*x straight out of the parser
        assert_eq!(parse("x + x").unwrap(), parse("2*x").unwrap());
        assert_eq!(parse("x * x").unwrap(), parse("x^2").unwrap());
        assert_eq!(parse("x - x").unwrap(), Expr::Integer(0));
    }

    #[test]
    fn exponent_may_be_negative() {
        assert_eq!(
            parse("2^-3").unwrap(),
            Expr::Rational(Rational::new(1, 8))
        );
        assert_eq!(
            parse("x^(-2)").unwrap(),
            Expr::pow(x(), Expr::Integer(-2))
        );
    }
}
