//! Fixed-shape dated directives.
//!
//! Each parser starts at the directive keyword (the date has already been
//! consumed), reads its arguments from the same line, then an optional
//! trailing comment and the indented metadata block.

use beanfront_core::{
    Amount, Balance, Close, Commodity, Document, Event, NaiveDate, Note, Open, Pad, Position, Price,
};

use super::Parser;
use crate::error::ParseError;
use crate::lexer::TokenKind;

impl Parser<'_> {
    pub(super) fn parse_open(&mut self, pos: Position, date: NaiveDate) -> Result<Open, ParseError> {
        self.advance();
        let account = self.expect_account()?;
        let mut open = Open::new(pos, date, account);

        if self.at_same_line(TokenKind::Ident) {
            loop {
                let currency = self.expect_currency()?;
                open.currencies.push(currency);
                if self.eat_same_line(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        if let Some(tok) = self.eat_same_line(TokenKind::String) {
            open.booking = Some(self.unquote(&tok)?);
        }

        open.comment = self.finish_line()?;
        open.meta = self.parse_metadata_block()?;
        Ok(open)
    }

    pub(super) fn parse_close(&mut self, pos: Position, date: NaiveDate) -> Result<Close, ParseError> {
        self.advance();
        let account = self.expect_account()?;
        let mut close = Close::new(pos, date, account);
        close.comment = self.finish_line()?;
        close.meta = self.parse_metadata_block()?;
        Ok(close)
    }

    pub(super) fn parse_commodity(
        &mut self,
        pos: Position,
        date: NaiveDate,
    ) -> Result<Commodity, ParseError> {
        self.advance();
        let currency = self.expect_currency()?;
        let comment = self.finish_line()?;
        let meta = self.parse_metadata_block()?;
        Ok(Commodity {
            pos,
            date,
            currency,
            meta,
            comment,
        })
    }

    /// `balance Account NUMBER [~ NUMBER] CURRENCY`
    pub(super) fn parse_balance(&mut self, pos: Position, date: NaiveDate) -> Result<Balance, ParseError> {
        self.advance();
        let account = self.expect_account()?;
        let number = self.parse_number_or_expr()?;
        let tolerance = match self.eat_same_line(TokenKind::Tilde) {
            Some(_) => Some(self.expect_number()?),
            None => None,
        };
        let currency = self.expect_currency()?;
        let comment = self.finish_line()?;
        let meta = self.parse_metadata_block()?;
        Ok(Balance {
            pos,
            date,
            account,
            amount: Amount::from_number(number, currency),
            tolerance,
            meta,
            comment,
        })
    }

    pub(super) fn parse_pad(&mut self, pos: Position, date: NaiveDate) -> Result<Pad, ParseError> {
        self.advance();
        let account = self.expect_account()?;
        let source_account = self.expect_account()?;
        let comment = self.finish_line()?;
        let meta = self.parse_metadata_block()?;
        Ok(Pad {
            pos,
            date,
            account,
            source_account,
            meta,
            comment,
        })
    }

    pub(super) fn parse_note(&mut self, pos: Position, date: NaiveDate) -> Result<Note, ParseError> {
        self.advance();
        let account = self.expect_account()?;
        let description = self.expect_string()?;
        let comment = self.finish_line()?;
        let meta = self.parse_metadata_block()?;
        Ok(Note {
            pos,
            date,
            account,
            description,
            meta,
            comment,
        })
    }

    pub(super) fn parse_document(
        &mut self,
        pos: Position,
        date: NaiveDate,
    ) -> Result<Document, ParseError> {
        self.advance();
        let account = self.expect_account()?;
        let path = self.expect_string()?;
        let mut tags = Vec::new();
        let mut links = Vec::new();
        self.parse_tags_links(&mut tags, &mut links);
        let comment = self.finish_line()?;
        let meta = self.parse_metadata_block()?;
        Ok(Document {
            pos,
            date,
            account,
            path,
            tags,
            links,
            meta,
            comment,
        })
    }

    pub(super) fn parse_price(&mut self, pos: Position, date: NaiveDate) -> Result<Price, ParseError> {
        self.advance();
        let commodity = self.expect_currency()?;
        let amount = self.parse_amount()?;
        let comment = self.finish_line()?;
        let meta = self.parse_metadata_block()?;
        Ok(Price {
            pos,
            date,
            commodity,
            amount,
            meta,
            comment,
        })
    }

    pub(super) fn parse_event(&mut self, pos: Position, date: NaiveDate) -> Result<Event, ParseError> {
        self.advance();
        let name = self.expect_string()?;
        let value = self.expect_string()?;
        let comment = self.finish_line()?;
        let meta = self.parse_metadata_block()?;
        Ok(Event {
            pos,
            date,
            name,
            value,
            meta,
            comment,
        })
    }
}
