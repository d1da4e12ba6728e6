//! Arithmetic expressions in amount positions, e.g. `(2 + 3 * 4) USD`.
//!
//! ```text
//! expr   -> term (('+' | '-') term)*
//! term   -> factor (('*' | '/') factor)*
//! factor -> number | '(' expr ')' | '-' factor | '+' factor
//! ```
//!
//! The lexer reads `-3` as one signed number, so a signed number where an
//! operator is expected is split back into operator and operand:
//! `2 -3` is `2 - 3`.
//!
//! All arithmetic is exact decimal arithmetic.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::lexer::{scan_all, Token, TokenKind};
use beanfront_core::RawNumber;

/// Parenthesis nesting deeper than this is rejected instead of recursing.
const MAX_DEPTH: usize = 128;

/// Errors from evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// Division by an exact zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A `(` without `)` or the reverse.
    #[error("unmatched parenthesis")]
    UnmatchedParen,
    /// An operator without a right-hand side, or an empty expression.
    #[error("missing operand")]
    MissingOperand,
    /// The result does not fit in a decimal.
    #[error("arithmetic overflow")]
    Overflow,
    /// Parentheses nested beyond the supported depth.
    #[error("expression nested too deeply")]
    TooDeep,
    /// A token that has no place in an expression.
    #[error("unexpected {0} in expression")]
    Unexpected(TokenKind),
    /// A number token that is not a valid decimal.
    #[error("invalid number \"{0}\"")]
    Number(String),
}

/// Evaluate an expression given as text.
///
/// ```
/// use beanfront_parser::evaluate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(evaluate("2 + 3 * 4"), Ok(dec!(14)));
/// assert_eq!(evaluate("(2 + 3) * 4"), Ok(dec!(20)));
/// ```
pub fn evaluate(text: &str) -> Result<Decimal, ExprError> {
    let (tokens, _) = scan_all(text.as_bytes(), "<expr>");
    let tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|t| !matches!(t.kind, TokenKind::Eof | TokenKind::BlankLine))
        .collect();
    evaluate_tokens(&tokens, text.as_bytes())
}

/// Evaluate an expression spanning exactly `tokens`.
pub fn evaluate_tokens(tokens: &[Token], source: &[u8]) -> Result<Decimal, ExprError> {
    let mut eval = Evaluator {
        tokens,
        source,
        pos: 0,
        depth: 0,
    };
    let value = eval.expr()?;
    match eval.peek() {
        None => Ok(value),
        Some(tok) if tok.kind == TokenKind::RParen => Err(ExprError::UnmatchedParen),
        Some(tok) => Err(ExprError::Unexpected(tok.kind)),
    }
}

struct Evaluator<'a> {
    tokens: &'a [Token],
    source: &'a [u8],
    pos: usize,
    depth: usize,
}

impl Evaluator<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens
            .get(self.pos)
            .copied()
            .filter(|t| t.kind != TokenKind::Eof)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek()?;
        self.pos += 1;
        Some(tok)
    }

    fn number(&self, tok: &Token) -> Result<Decimal, ExprError> {
        let text = tok.text(self.source);
        RawNumber::parse(&text)
            .ok()
            .and_then(|n| n.decimal())
            .ok_or_else(|| ExprError::Number(text.into_owned()))
    }

    fn is_signed_number(&self, tok: &Token) -> bool {
        tok.kind == TokenKind::Number
            && matches!(self.source.get(tok.start), Some(b'-' | b'+'))
    }

    fn expr(&mut self) -> Result<Decimal, ExprError> {
        let mut acc = self.term()?;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::Plus => {
                    self.pos += 1;
                    acc = add(acc, self.term()?)?;
                }
                TokenKind::Minus => {
                    self.pos += 1;
                    acc = sub(acc, self.term()?)?;
                }
                _ if self.is_signed_number(&tok) => {
                    self.pos += 1;
                    let magnitude = self.number(&tok)?.abs();
                    let rhs = self.term_rest(magnitude)?;
                    acc = if self.source.get(tok.start) == Some(&b'-') {
                        sub(acc, rhs)?
                    } else {
                        add(acc, rhs)?
                    };
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<Decimal, ExprError> {
        let first = self.factor()?;
        self.term_rest(first)
    }

    fn term_rest(&mut self, mut acc: Decimal) -> Result<Decimal, ExprError> {
        loop {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::Star) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    acc = acc.checked_mul(rhs).ok_or(ExprError::Overflow)?;
                }
                Some(TokenKind::Slash) => {
                    self.pos += 1;
                    let rhs = self.factor()?;
                    if rhs.is_zero() {
                        return Err(ExprError::DivisionByZero);
                    }
                    acc = acc.checked_div(rhs).ok_or(ExprError::Overflow)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn factor(&mut self) -> Result<Decimal, ExprError> {
        let tok = self.next().ok_or(ExprError::MissingOperand)?;
        match tok.kind {
            TokenKind::Number => self.number(&tok),
            TokenKind::LParen => {
                if self.depth >= MAX_DEPTH {
                    return Err(ExprError::TooDeep);
                }
                self.depth += 1;
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(close) if close.kind == TokenKind::RParen => Ok(value),
                    Some(other) => Err(ExprError::Unexpected(other.kind)),
                    None => Err(ExprError::UnmatchedParen),
                }
            }
            TokenKind::Minus | TokenKind::Plus => {
                if self.depth >= MAX_DEPTH {
                    return Err(ExprError::TooDeep);
                }
                self.depth += 1;
                let value = self.factor()?;
                self.depth -= 1;
                Ok(if tok.kind == TokenKind::Minus { -value } else { value })
            }
            TokenKind::RParen => Err(ExprError::MissingOperand),
            other => Err(ExprError::Unexpected(other)),
        }
    }
}

fn add(a: Decimal, b: Decimal) -> Result<Decimal, ExprError> {
    a.checked_add(b).ok_or(ExprError::Overflow)
}

fn sub(a: Decimal, b: Decimal) -> Result<Decimal, ExprError> {
    a.checked_sub(b).ok_or(ExprError::Overflow)
}

/// Offset just past the `)` matching the `(` at `start`, counting depth
/// over raw bytes. Expressions never span lines.
pub(crate) fn matching_paren(source: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in source.iter().enumerate().skip(start) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            b'\n' => return None,
            _ => {}
        }
    }
    None
}
