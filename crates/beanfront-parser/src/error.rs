//! Parse error types.

use std::io::Write;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use beanfront_core::{AccountError, DateError, NumberError, Position};
use thiserror::Error;

use crate::expr::ExprError;
use crate::span::Span;
use crate::unquote::StringLiteralError;

/// A parse error with location information.
///
/// Parsing stops at the first error; there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {kind}")]
pub struct ParseError {
    /// The kind of error.
    #[source]
    pub kind: ParseErrorKind,
    /// Where the error was detected.
    pub position: Position,
    /// The offending byte range.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
    /// Source lines around the error, rendered for a terminal.
    pub snippet: Option<String>,
}

impl ParseError {
    /// Create a new parse error.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, position: Position, span: Span) -> Self {
        Self {
            kind,
            position,
            span,
            hint: None,
            snippet: None,
        }
    }

    /// The error reported when a parse is canceled before it starts.
    #[must_use]
    pub fn canceled(filename: &str) -> Self {
        Self::new(
            ParseErrorKind::Canceled,
            Position::new(filename, 0, 1, 1),
            Span::point(0),
        )
    }

    /// Add a hint for fixing this error.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attach a rendered source snippet.
    #[must_use]
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Get the span of this error.
    #[must_use]
    pub const fn span(&self) -> (usize, usize) {
        (self.span.start, self.span.end)
    }

    /// The file the error is in.
    pub fn filename(&self) -> &str {
        self.position.filename.as_str()
    }

    /// 1-based line.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.position.line
    }

    /// 1-based column.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.position.column
    }

    /// Byte offset from the start of the buffer.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.position.offset
    }

    /// Check whether this error reports cancellation.
    #[must_use]
    pub const fn is_canceled(&self) -> bool {
        matches!(self.kind, ParseErrorKind::Canceled)
    }

    /// Get a numeric code for the error kind.
    #[must_use]
    pub const fn kind_code(&self) -> u32 {
        match &self.kind {
            ParseErrorKind::Expected(_) => 1,
            ParseErrorKind::Unexpected(_) => 2,
            ParseErrorKind::Syntax(_) => 3,
            ParseErrorKind::Illegal(_) => 4,
            ParseErrorKind::StringLiteral(_) => 5,
            ParseErrorKind::Account(_) => 6,
            ParseErrorKind::Date(_) => 7,
            ParseErrorKind::Number(_) => 8,
            ParseErrorKind::Expression(_) => 9,
            ParseErrorKind::Canceled => 10,
        }
    }

    /// Get the error message, without position.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Get a short label for the error.
    #[must_use]
    pub const fn label(&self) -> &str {
        match &self.kind {
            ParseErrorKind::Expected(_) => "expected different token",
            ParseErrorKind::Unexpected(_) => "unexpected token",
            ParseErrorKind::Syntax(_) => "syntax error",
            ParseErrorKind::Illegal(_) => "illegal character",
            ParseErrorKind::StringLiteral(_) => "invalid string",
            ParseErrorKind::Account(_) => "invalid account",
            ParseErrorKind::Date(_) => "invalid date",
            ParseErrorKind::Number(_) => "invalid number",
            ParseErrorKind::Expression(_) => "invalid expression",
            ParseErrorKind::Canceled => "canceled",
        }
    }

    /// Render a terminal report with source context.
    pub fn write_report<W: Write>(&self, source: &str, color: bool, writer: &mut W) -> std::io::Result<()> {
        let path = self.filename();
        let start = self.span.start.min(source.len());
        let end = self.span.end.clamp(start, source.len());

        let mut report = Report::build(ReportKind::Error, (path, start..end))
            .with_code(format!("P{:04}", self.kind_code()))
            .with_message(self.message())
            .with_label(
                Label::new((path, start..end))
                    .with_message(self.label())
                    .with_color(Color::Red),
            )
            .with_config(Config::default().with_compact(false).with_color(color));
        if let Some(hint) = &self.hint {
            report = report.with_help(hint);
        }
        report.finish().write((path, Source::from(source)), writer)
    }
}

/// Kinds of parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A required token is missing.
    #[error("expected {0}")]
    Expected(String),
    /// A token that cannot appear here.
    #[error("unexpected {0}")]
    Unexpected(String),
    /// A structural rule was broken.
    #[error("{0}")]
    Syntax(String),
    /// A character that starts no token.
    #[error("invalid character '{0}'")]
    Illegal(String),
    /// Malformed string literal.
    #[error(transparent)]
    StringLiteral(#[from] StringLiteralError),
    /// Malformed account name.
    #[error(transparent)]
    Account(#[from] AccountError),
    /// Malformed or impossible date.
    #[error(transparent)]
    Date(#[from] DateError),
    /// Malformed number.
    #[error(transparent)]
    Number(#[from] NumberError),
    /// Expression evaluation failed.
    #[error(transparent)]
    Expression(#[from] ExprError),
    /// The caller canceled the parse.
    #[error("parse canceled")]
    Canceled,
}

impl ParseErrorKind {
    /// Build a [`ParseErrorKind::Syntax`] error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, Position::new("main.beancount", 12, 2, 5), Span::new(12, 16))
    }

    #[test]
    fn test_display_has_position_and_message() {
        let err = error(ParseErrorKind::Expected("account".to_string()));
        assert_eq!(err.message(), "expected account");
        assert_eq!(err.to_string(), "main.beancount:2:5: expected account");
        assert_eq!((err.line(), err.column(), err.offset()), (2, 5, 12));
        assert_eq!(err.span(), (12, 16));
    }

    #[test]
    fn test_leaf_errors_are_transparent() {
        let err = error(AccountError::UnexpectedType("Foo".to_string()).into());
        assert_eq!(err.message(), "unexpected account type \"Foo\"");
        assert_eq!(err.kind_code(), 6);
        assert_eq!(err.label(), "invalid account");

        let err = error(ExprError::DivisionByZero.into());
        assert_eq!(err.message(), "division by zero");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;
        let err = error(ParseErrorKind::syntax("x"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_canceled() {
        let err = ParseError::canceled("a.beancount");
        assert!(err.is_canceled());
        assert_eq!(err.to_string(), "a.beancount:1:1: parse canceled");
    }

    #[test]
    fn test_write_report() {
        let source = "2024-01-01 open\n";
        let err = ParseError::new(
            ParseErrorKind::Expected("account".to_string()),
            Position::new("main.beancount", 15, 1, 16),
            Span::point(15),
        )
        .with_hint("add an account name after 'open'");
        let mut out = Vec::new();
        err.write_report(source, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[P0001] Error: expected account"));
        assert!(text.contains("main.beancount"));
        assert!(text.contains("add an account name"));
    }
}
