//! Value-transform formulas attached to equipment attributes.
//!
//! The dataset ships formulas such as `A*100` or `(1-A)*100` bound to the
//! single variable `A`. They are parsed once into a small expression tree
//! when the dataset loads and evaluated with the raw value afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parsed value-transform formula over the variable `A`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Formula {
    source: String,
    expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Var,
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Formula {
    /// Parse a formula string.
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = tokenize(source)?;
        let mut parser = Parser {
            source,
            tokens: &tokens,
            pos: 0,
        };
        let expr = parser.expression()?;
        if parser.pos != tokens.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// Evaluate the formula with `A` bound to `value`.
    pub fn evaluate(&self, value: f64) -> f64 {
        self.expr.eval(value)
    }

    /// Original formula text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Expr {
    fn eval(&self, a: f64) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Var => a,
            Expr::Neg(inner) => -inner.eval(a),
            Expr::Binary(op, lhs, rhs) => {
                let (l, r) = (lhs.eval(a), rhs.eval(a));
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                }
            }
        }
    }
}

impl FromStr for Formula {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Formula {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Formula> for String {
    fn from(formula: Formula) -> Self {
        formula.source
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Var,
    Op(char),
    Open,
    Close,
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let invalid = |message: String| Error::InvalidFormula {
        formula: source.to_string(),
        message,
    };

    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            c if c.is_whitespace() => {}
            'A' | 'a' => tokens.push(Token::Var),
            '+' | '-' | '*' | '/' => tokens.push(Token::Op(c)),
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, next)) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' || next == 'e' || next == 'E' {
                        end = idx + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &source[start..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| invalid(format!("bad number literal '{literal}'")))?;
                tokens.push(Token::Number(value));
            }
            other => return Err(invalid(format!("unexpected character '{other}'"))),
        }
    }

    if tokens.is_empty() {
        return Err(invalid("empty formula".to_string()));
    }
    Ok(tokens)
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &str) -> Error {
        Error::InvalidFormula {
            formula: self.source.to_string(),
            message: format!("{message} at token {}", self.pos),
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<Expr> {
        let mut lhs = self.term()?;
        while let Some(Token::Op(c @ ('+' | '-'))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            let op = if c == '+' { BinOp::Add } else { BinOp::Sub };
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr> {
        let mut lhs = self.factor()?;
        while let Some(Token::Op(c @ ('*' | '/'))) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            let op = if c == '*' { BinOp::Mul } else { BinOp::Div };
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Number(n)) => {
                self.pos += 1;
                Ok(Expr::Number(n))
            }
            Some(Token::Var) => {
                self.pos += 1;
                Ok(Expr::Var)
            }
            Some(Token::Op('-')) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.factor()?)))
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.factor()
            }
            Some(Token::Open) => {
                self.pos += 1;
                let inner = self.expression()?;
                if self.peek() != Some(Token::Close) {
                    return Err(self.error("missing closing parenthesis"));
                }
                self.pos += 1;
                Ok(inner)
            }
            _ => Err(self.error("expected a number, 'A' or '('")),
        }
    }
}
