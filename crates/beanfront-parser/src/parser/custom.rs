//! `custom "name" value...` directives.

use beanfront_core::{validate_account, Amount, Custom, CustomValue, NaiveDate, Position};

use super::Parser;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::TokenKind;

impl Parser<'_> {
    pub(super) fn parse_custom(&mut self, pos: Position, date: NaiveDate) -> Result<Custom, ParseError> {
        self.advance();
        let name = self.expect_string()?;

        let mut values = Vec::new();
        loop {
            let tok = self.peek();
            if !self.on_current_line(&tok) || tok.kind == TokenKind::Comment {
                break;
            }
            let value = match tok.kind {
                TokenKind::String => {
                    self.advance();
                    CustomValue::String(self.unquote(&tok)?)
                }
                TokenKind::Date => {
                    self.advance();
                    CustomValue::Date(self.date(&tok)?)
                }
                TokenKind::Ident if matches!(self.text(&tok).as_ref(), "TRUE" | "FALSE") => {
                    self.advance();
                    CustomValue::Bool(self.text(&tok) == "TRUE")
                }
                TokenKind::Account => {
                    self.advance();
                    validate_account(&self.text(&tok)).map_err(|e| self.error_at(&tok, e))?;
                    CustomValue::Account(self.intern(&tok))
                }
                TokenKind::Number | TokenKind::LParen => {
                    let number = self.parse_number_or_expr()?;
                    match self.eat_same_line(TokenKind::Ident) {
                        Some(currency) => {
                            CustomValue::Amount(Amount::from_number(number, self.intern(&currency)))
                        }
                        None => CustomValue::Number(number),
                    }
                }
                kind => {
                    return Err(self.error_at(
                        &tok,
                        ParseErrorKind::Unexpected(format!("{} in custom directive", kind.describe())),
                    ))
                }
            };
            values.push(value);
        }

        let comment = self.finish_line()?;
        let meta = self.parse_metadata_block()?;
        Ok(Custom {
            pos,
            date,
            name,
            values,
            meta,
            comment,
        })
    }
}
