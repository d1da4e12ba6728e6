//! Recursive-descent parser over the token stream.
//!
//! The parser walks the tokens once, front to back, with at most two tokens
//! of lookahead. Lines are not tokens: "same line" and "indented" decisions
//! are made from the line and column recorded on each token. The first
//! error aborts the parse.

mod cost;
mod custom;
mod directives;
mod metadata;
mod transaction;

use std::borrow::Cow;

use beanfront_core::{
    parse_date, validate_account, Ast, BlankLine, Comment, CommentKind, Directive, Include,
    InternedStr, NaiveDate, OptionDirective, Plugin, Popmeta, Poptag, Position, Pushmeta, Pushtag,
    RawNumber, RawString, StringInterner,
};

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Token, TokenKind};
use crate::span::Span;
use crate::unquote::unquote;

/// Parse a token stream produced by [`crate::scan_all`] over `source`.
///
/// Directives are returned in file order; propagation and sorting are
/// separate passes.
pub fn parse_tokens(
    source: &[u8],
    tokens: &[Token],
    filename: &str,
    interner: &mut StringInterner,
) -> Result<Ast, ParseError> {
    Parser::new(source, tokens, filename, interner).parse_file()
}

pub(crate) struct Parser<'a> {
    source: &'a [u8],
    tokens: &'a [Token],
    pos: usize,
    /// The most recently consumed token.
    last: Option<Token>,
    eof: Token,
    filename: InternedStr,
    interner: &'a mut StringInterner,
    ast: Ast,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        source: &'a [u8],
        tokens: &'a [Token],
        filename: &str,
        interner: &'a mut StringInterner,
    ) -> Self {
        let eof = match tokens.last() {
            Some(last) if last.kind == TokenKind::Eof => *last,
            Some(last) => Token::new(TokenKind::Eof, source.len(), source.len(), last.line + 1, 1),
            None => Token::new(TokenKind::Eof, source.len(), source.len(), 1, 1),
        };
        let filename = interner.intern(filename);
        Self {
            source,
            tokens,
            pos: 0,
            last: None,
            eof,
            filename,
            interner,
            ast: Ast::new(),
        }
    }

    // ===== Token access =====

    fn peek(&self) -> Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Token {
        self.tokens.get(self.pos + n).copied().unwrap_or(self.eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
            self.last = Some(tok);
        }
        tok
    }

    /// Returns true if `tok` continues the line of the last consumed token.
    fn on_current_line(&self, tok: &Token) -> bool {
        tok.kind != TokenKind::Eof && self.last.is_some_and(|last| last.same_line(tok))
    }

    /// Returns true if the next token is `kind` on the current line.
    fn at_same_line(&self, kind: TokenKind) -> bool {
        let tok = self.peek();
        tok.kind == kind && self.on_current_line(&tok)
    }

    /// Consume the next token if it is `kind` on the current line.
    fn eat_same_line(&mut self, kind: TokenKind) -> Option<Token> {
        self.at_same_line(kind).then(|| self.advance())
    }

    // ===== Materialisation =====

    fn text(&self, tok: &Token) -> Cow<'a, str> {
        tok.text(self.source)
    }

    fn intern(&mut self, tok: &Token) -> InternedStr {
        tok.intern(self.source, self.interner)
    }

    /// Intern a tag or link without its `#`/`^` marker.
    fn intern_marked(&mut self, tok: &Token) -> InternedStr {
        let text = tok.text(self.source);
        self.interner.intern(text.get(1..).unwrap_or_default())
    }

    fn position_of(&self, tok: &Token) -> Position {
        Position::new(self.filename.clone(), tok.start, tok.line, tok.column)
    }

    fn position_at_end(&self, tok: &Token) -> Position {
        Position::new(
            self.filename.clone(),
            tok.end,
            tok.line,
            tok.end_column(self.source),
        )
    }

    // ===== Errors =====

    fn error_at(&self, tok: &Token, kind: impl Into<ParseErrorKind>) -> ParseError {
        ParseError::new(kind.into(), self.position_of(tok), tok.span())
    }

    /// Report a missing `what`.
    ///
    /// When the line has already ended, the error points just past the last
    /// token of that line rather than at whatever starts the next one.
    fn expected(&self, what: &str) -> ParseError {
        let kind = ParseErrorKind::Expected(what.to_string());
        let tok = self.peek();
        match self.last {
            Some(last) if !self.on_current_line(&tok) => {
                ParseError::new(kind, self.position_at_end(&last), Span::point(last.end))
            }
            _ => self.error_at(&tok, kind),
        }
    }

    /// Close the current line: accept a trailing comment, reject anything else.
    fn finish_line(&mut self) -> Result<Option<Comment>, ParseError> {
        let tok = self.peek();
        if !self.on_current_line(&tok) {
            return Ok(None);
        }
        match tok.kind {
            TokenKind::Comment => {
                self.advance();
                Ok(Some(self.comment(&tok, CommentKind::Inline)))
            }
            TokenKind::Illegal => Err(self.error_at(&tok, ParseErrorKind::Illegal(self.text(&tok).into_owned()))),
            kind => Err(self.error_at(&tok, ParseErrorKind::Unexpected(kind.describe().to_string()))),
        }
    }

    /// Like [`Self::finish_line`] for items that carry no comment field.
    fn finish_line_into_trivia(&mut self) -> Result<(), ParseError> {
        if let Some(comment) = self.finish_line()? {
            self.ast.comments.push(comment);
        }
        Ok(())
    }

    // ===== Trivia =====

    fn comment(&self, tok: &Token, kind: CommentKind) -> Comment {
        Comment::new(self.position_of(tok), self.text(tok), kind)
    }

    /// Consume a comment on its own line and record it as trivia.
    fn push_comment(&mut self) {
        let tok = self.advance();
        let kind = if self.peek().kind == TokenKind::BlankLine {
            CommentKind::Section
        } else {
            CommentKind::Standalone
        };
        let comment = self.comment(&tok, kind);
        self.ast.comments.push(comment);
    }

    fn push_blank_line(&mut self) {
        let tok = self.advance();
        let pos = self.position_of(&tok);
        self.ast.blank_lines.push(BlankLine { pos });
    }

    fn skip_line(&mut self) {
        let line = self.peek().line;
        while self.peek().kind != TokenKind::Eof && self.peek().line == line {
            self.advance();
        }
    }

    // ===== Shared value rules =====

    fn unquote(&self, tok: &Token) -> Result<RawString, ParseError> {
        unquote(&self.text(tok)).map_err(|e| self.error_at(tok, e))
    }

    fn date(&self, tok: &Token) -> Result<NaiveDate, ParseError> {
        parse_date(&self.text(tok)).map_err(|e| self.error_at(tok, e))
    }

    fn number(&self, tok: &Token) -> Result<RawNumber, ParseError> {
        RawNumber::parse(&self.text(tok)).map_err(|e| self.error_at(tok, e))
    }

    /// Validate and intern the next token as an account, wherever it is.
    fn take_account(&mut self) -> Result<InternedStr, ParseError> {
        let tok = self.peek();
        if !matches!(tok.kind, TokenKind::Account | TokenKind::Ident) {
            return Err(self.expected("account"));
        }
        self.advance();
        validate_account(&self.text(&tok)).map_err(|e| self.error_at(&tok, e))?;
        Ok(self.intern(&tok))
    }

    /// An account on the current line.
    fn expect_account(&mut self) -> Result<InternedStr, ParseError> {
        if !self.on_current_line(&self.peek()) {
            return Err(self.expected("account"));
        }
        self.take_account()
    }

    fn expect_string(&mut self) -> Result<RawString, ParseError> {
        match self.eat_same_line(TokenKind::String) {
            Some(tok) => self.unquote(&tok),
            None => Err(self.expected("string")),
        }
    }

    fn expect_currency(&mut self) -> Result<InternedStr, ParseError> {
        match self.eat_same_line(TokenKind::Ident) {
            Some(tok) => Ok(self.intern(&tok)),
            None => Err(self.expected("currency")),
        }
    }

    fn expect_number(&mut self) -> Result<RawNumber, ParseError> {
        match self.eat_same_line(TokenKind::Number) {
            Some(tok) => self.number(&tok),
            None => Err(self.expected("number")),
        }
    }

    fn expect_tag(&mut self) -> Result<InternedStr, ParseError> {
        match self.eat_same_line(TokenKind::Tag) {
            Some(tok) => Ok(self.intern_marked(&tok)),
            None => Err(self.expected("tag")),
        }
    }

    // ===== Top level =====

    fn parse_file(mut self) -> Result<Ast, ParseError> {
        loop {
            let tok = self.peek();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Comment => self.push_comment(),
                TokenKind::BlankLine => self.push_blank_line(),
                TokenKind::Option_ => self.parse_option()?,
                TokenKind::Include => self.parse_include()?,
                TokenKind::Plugin => self.parse_plugin()?,
                TokenKind::Pushtag => self.parse_pushtag()?,
                TokenKind::Poptag => self.parse_poptag()?,
                TokenKind::Pushmeta => self.parse_pushmeta()?,
                TokenKind::Popmeta => self.parse_popmeta()?,
                TokenKind::Date => {
                    let directive = self.parse_dated()?;
                    self.ast.directives.push(directive);
                }
                // Org-mode headings and other unrecognised lines.
                _ => {
                    tracing::trace!("skipping line {}", tok.line);
                    self.skip_line();
                }
            }
        }
        Ok(self.ast)
    }

    fn parse_dated(&mut self) -> Result<Directive, ParseError> {
        let date_tok = self.advance();
        let date = self.date(&date_tok)?;
        let pos = self.position_of(&date_tok);

        while self.peek().kind == TokenKind::BlankLine {
            self.push_blank_line();
        }

        let tok = self.peek();
        if tok.kind != TokenKind::Eof && tok.same_line(&date_tok) && tok.start == date_tok.end {
            return Err(self.error_at(
                &tok,
                ParseErrorKind::syntax("whitespace required between date and directive"),
            ));
        }

        let directive = match tok.kind {
            TokenKind::Txn | TokenKind::Star | TokenKind::Bang | TokenKind::String => {
                Directive::Transaction(self.parse_transaction(pos, date)?)
            }
            TokenKind::Balance => Directive::Balance(self.parse_balance(pos, date)?),
            TokenKind::Open => Directive::Open(self.parse_open(pos, date)?),
            TokenKind::Close => Directive::Close(self.parse_close(pos, date)?),
            TokenKind::Commodity => Directive::Commodity(self.parse_commodity(pos, date)?),
            TokenKind::Pad => Directive::Pad(self.parse_pad(pos, date)?),
            TokenKind::Note => Directive::Note(self.parse_note(pos, date)?),
            TokenKind::Document => Directive::Document(self.parse_document(pos, date)?),
            TokenKind::Price => Directive::Price(self.parse_price(pos, date)?),
            TokenKind::Event => Directive::Event(self.parse_event(pos, date)?),
            TokenKind::Custom => Directive::Custom(self.parse_custom(pos, date)?),
            _ => return Err(self.expected("directive")),
        };
        tracing::trace!("parsed {} at line {}", directive.type_name(), date_tok.line);
        Ok(directive)
    }

    // ===== Undated directives =====

    fn parse_option(&mut self) -> Result<(), ParseError> {
        let keyword = self.advance();
        let name = self.expect_string()?;
        let value = self.expect_string()?;
        self.finish_line_into_trivia()?;
        let pos = self.position_of(&keyword);
        self.ast.options.push(OptionDirective { pos, name, value });
        Ok(())
    }

    fn parse_include(&mut self) -> Result<(), ParseError> {
        let keyword = self.advance();
        let filename = self.expect_string()?;
        self.finish_line_into_trivia()?;
        let pos = self.position_of(&keyword);
        self.ast.includes.push(Include { pos, filename });
        Ok(())
    }

    fn parse_plugin(&mut self) -> Result<(), ParseError> {
        let keyword = self.advance();
        let name = self.expect_string()?;
        let config = match self.eat_same_line(TokenKind::String) {
            Some(tok) => Some(self.unquote(&tok)?),
            None => None,
        };
        self.finish_line_into_trivia()?;
        let pos = self.position_of(&keyword);
        self.ast.plugins.push(Plugin { pos, name, config });
        Ok(())
    }

    fn parse_pushtag(&mut self) -> Result<(), ParseError> {
        let keyword = self.advance();
        let tag = self.expect_tag()?;
        self.finish_line_into_trivia()?;
        let pos = self.position_of(&keyword);
        self.ast.pushtags.push(Pushtag { pos, tag });
        Ok(())
    }

    fn parse_poptag(&mut self) -> Result<(), ParseError> {
        let keyword = self.advance();
        let tag = self.expect_tag()?;
        self.finish_line_into_trivia()?;
        let pos = self.position_of(&keyword);
        self.ast.poptags.push(Poptag { pos, tag });
        Ok(())
    }

    fn parse_pushmeta(&mut self) -> Result<(), ParseError> {
        let keyword = self.advance();
        let key = self.expect_meta_key()?;
        let value = self.parse_meta_value()?;
        self.finish_line_into_trivia()?;
        let pos = self.position_of(&keyword);
        self.ast.pushmetas.push(Pushmeta { pos, key, value });
        Ok(())
    }

    fn parse_popmeta(&mut self) -> Result<(), ParseError> {
        let keyword = self.advance();
        let key = self.expect_meta_key()?;
        self.finish_line_into_trivia()?;
        let pos = self.position_of(&keyword);
        self.ast.popmetas.push(Popmeta { pos, key });
        Ok(())
    }
}
