//! `key: value` metadata lines and value typing.

use beanfront_core::{Amount, EscapeStyle, InternedStr, MetaValue, Metadata, RawString};

use super::Parser;
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::unquote::unquote;

impl Parser<'_> {
    /// Indented metadata lines after a directive, header or posting line.
    ///
    /// Comment lines inside the block are kept as trivia; a blank line or
    /// any line that is not `key: value` ends it.
    pub(super) fn parse_metadata_block(&mut self) -> Result<Vec<Metadata>, ParseError> {
        let mut meta = Vec::new();
        loop {
            let tok = self.peek();
            if tok.kind == TokenKind::Eof || tok.column <= 1 || self.on_current_line(&tok) {
                break;
            }
            if tok.kind == TokenKind::Comment {
                self.push_comment();
            } else if self.at_meta_key() {
                meta.push(self.parse_metadata_line()?);
            } else {
                break;
            }
        }
        Ok(meta)
    }

    /// A key is an identifier or keyword with a colon glued to it.
    fn at_meta_key(&self) -> bool {
        let key = self.peek();
        let colon = self.peek_nth(1);
        (key.kind == TokenKind::Ident || key.kind.is_keyword())
            && colon.kind == TokenKind::Colon
            && colon.start == key.end
    }

    /// A `key:` on the current line, as after `pushmeta` and `popmeta`.
    pub(super) fn expect_meta_key(&mut self) -> Result<InternedStr, ParseError> {
        if !self.on_current_line(&self.peek()) || !self.at_meta_key() {
            return Err(self.expected("metadata key"));
        }
        let key = self.advance();
        self.advance();
        Ok(self.intern(&key))
    }

    /// One block line. The caller has checked [`Self::at_meta_key`]; the key
    /// starts a fresh line, so it is consumed here without a same-line check.
    fn parse_metadata_line(&mut self) -> Result<Metadata, ParseError> {
        let key_tok = self.advance();
        self.advance();
        let pos = self.position_of(&key_tok);
        let key = self.intern(&key_tok);
        let value = self.parse_meta_value()?;
        let mut entry = Metadata::new(pos, key, value);
        entry.comment = self.finish_line()?;
        Ok(entry)
    }

    /// Returns true if the value starting at the next token is exactly
    /// `len` tokens long, i.e. the line (or a comment) follows.
    fn value_is(&self, len: usize) -> bool {
        let after = self.peek_nth(len);
        let line = self.peek().line;
        after.kind == TokenKind::Eof || after.kind == TokenKind::Comment || after.line != line
    }

    /// Type the value after `key:`, most specific shape first. Anything
    /// unrecognised becomes a string of the raw remaining text.
    pub(super) fn parse_meta_value(&mut self) -> Result<MetaValue, ParseError> {
        let tok = self.peek();
        if !self.on_current_line(&tok) || tok.kind == TokenKind::Comment {
            return Ok(self.meta_fallback());
        }

        let single = self.value_is(1);
        let value = match tok.kind {
            TokenKind::String if single => MetaValue::String(self.unquote(&tok)?),
            TokenKind::Date if single => MetaValue::Date(self.date(&tok)?),
            TokenKind::Tag if single => MetaValue::Tag(self.intern_marked(&tok)),
            TokenKind::Link if single => MetaValue::Link(self.intern_marked(&tok)),
            TokenKind::Account if single => MetaValue::Account(self.intern(&tok)),
            TokenKind::Number if single => MetaValue::Number(self.number(&tok)?),
            TokenKind::Number if self.peek_nth(1).kind == TokenKind::Ident && self.value_is(2) => {
                let number = self.number(&tok)?;
                let currency = self.peek_nth(1);
                self.advance();
                MetaValue::Amount(Amount::from_number(number, self.intern(&currency)))
            }
            TokenKind::Ident if single => {
                let text = self.text(&tok);
                match text.as_ref() {
                    "TRUE" => MetaValue::Bool(true),
                    "FALSE" => MetaValue::Bool(false),
                    t if t.contains(':') => MetaValue::Account(self.intern(&tok)),
                    _ => MetaValue::Currency(self.intern(&tok)),
                }
            }
            _ => return Ok(self.meta_fallback()),
        };
        self.advance();
        Ok(value)
    }

    /// The rest of the line (up to a comment) as a string. Never fails:
    /// text that does not unquote is kept verbatim.
    fn meta_fallback(&mut self) -> MetaValue {
        let mut first: Option<Token> = None;
        let mut last: Option<Token> = None;
        loop {
            let tok = self.peek();
            if !self.on_current_line(&tok) || tok.kind == TokenKind::Comment {
                break;
            }
            self.advance();
            first.get_or_insert(tok);
            last = Some(tok);
        }

        let raw = match (first, last) {
            (Some(first), Some(last)) => {
                String::from_utf8_lossy(&self.source[first.start..last.end]).trim().to_string()
            }
            _ => String::new(),
        };
        let value = unquote(&raw).unwrap_or_else(|_| RawString::new(raw.clone(), raw, EscapeStyle::None));
        MetaValue::String(value)
    }
}
