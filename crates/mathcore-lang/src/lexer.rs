//! Hand-written lexer: produces Ident or FuncIdent (identifier followed by
//! "(") so the parser can tell sin(1) from sin used as a plain symbol.

use crate::error::MathError;
use std::str::FromStr;

pub type Spanned = Result<(usize, Tok, usize), MathError>;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(i64),
    Ident(String),
    /// Identifier that is immediately followed by "(" (function call).
    FuncIdent(String),
    LParen,
    RParen,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Comma,
}

impl Tok {
    /// Human-readable token description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Tok::Num(n) => format!("number '{n}'"),
            Tok::Ident(s) => format!("identifier '{s}'"),
            Tok::FuncIdent(s) => format!("function '{s}'"),
            Tok::LParen => "'('".to_string(),
            Tok::RParen => "')'".to_string(),
            Tok::Plus => "'+'".to_string(),
            Tok::Minus => "'-'".to_string(),
            Tok::Star => "'*'".to_string(),
            Tok::Slash => "'/'".to_string(),
            Tok::Caret => "'^'".to_string(),
            Tok::Comma => "','".to_string(),
        }
    }
}

pub struct Lexer<'input> {
    input: &'input str,
    pos: usize,
}

impl<'input> Lexer<'input> {
    pub fn new(input: &'input str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let skipped = rest.bytes().take_while(|b| b" \t\n\r".contains(b)).count();
        self.pos += skipped;
    }

    fn peek_next_non_space(&self) -> Option<char> {
        let rest = &self.input[self.pos..];
        rest.chars().find(|c| !c.is_whitespace())
    }

    fn take_ident(&mut self) -> Option<String> {
        let rest = &self.input[self.pos..];
        let mut end = 0;
        for (i, c) in rest.char_indices() {
            if i == 0 {
                if c.is_ascii_alphabetic() || c == '_' {
                    end = i + c.len_utf8();
                } else {
                    return None;
                }
            } else if c.is_ascii_alphanumeric() || c == '_' {
                end = i + c.len_utf8();
            } else {
                break;
            }
        }
        if end > 0 {
            let s = rest[..end].to_string();
            self.pos += end;
            Some(s)
        } else {
            None
        }
    }

    fn take_num(&mut self) -> Result<i64, MathError> {
        let start = self.pos;
        let rest = &self.input[self.pos..];
        let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        let s = &rest[..digits];
        self.pos += digits;
        i64::from_str(s).map_err(|_| {
            MathError::parse(format!("integer literal '{s}' out of range at position {start}"))
        })
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = Spanned;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.input[self.pos..];

        let mut it = rest.chars();
        let c = it.next()?;
        self.pos += c.len_utf8();

        let tok = match c {
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            '+' => Tok::Plus,
            '-' => Tok::Minus,
            '*' => Tok::Star,
            '/' => Tok::Slash,
            '^' => Tok::Caret,
            ',' => Tok::Comma,
            'a'..='z' | 'A'..='Z' | '_' => {
                self.pos -= c.len_utf8(); // put back
                match self.take_ident() {
                    Some(s) => {
                        if self.peek_next_non_space() == Some('(') {
                            Tok::FuncIdent(s)
                        } else {
                            Tok::Ident(s)
                        }
                    }
                    None => return None,
                }
            }
            '0'..='9' => {
                self.pos -= c.len_utf8();
                match self.take_num() {
                    Ok(n) => Tok::Num(n),
                    Err(e) => return Some(Err(e)),
                }
            }
            other => {
                return Some(Err(MathError::parse(format!(
                    "unexpected character '{other}' at position {start}"
                ))));
            }
        };
        let end = self.pos;
        Some(Ok((start, tok, end)))
    }
}
