//! Lexer and recursive-descent parser for beancount-style ledgers.
//!
//! The pipeline is a straightforward scan with no I/O of its own:
//!
//! 1. [`scan_all`] turns the byte buffer into tokens that borrow nothing and
//!    record their byte range, line and column.
//! 2. [`parse_tokens`] builds an [`Ast`] in file order, stopping at the
//!    first error.
//! 3. [`propagate`] applies `pushtag`/`pushmeta` scopes in file order.
//! 4. [`sort_directives`](beanfront_core::sort_directives) orders the
//!    directives by date, opens before closes before everything else.
//!
//! Either a complete tree or a single [`ParseError`] comes back; there is
//! no partial result.
//!
//! # Example
//!
//! ```
//! use beanfront_parser::parse;
//!
//! let source = r#"
//! 2024-01-15 * "Coffee Shop" "Morning coffee"
//!   Expenses:Food:Coffee  5.00 USD
//!   Assets:Cash
//! "#;
//!
//! let ast = parse(source).unwrap();
//! assert_eq!(ast.directives.len(), 1);
//! assert_eq!(ast.transactions().next().unwrap().postings.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod error;
pub mod expr;
pub mod lexer;
mod parser;
mod propagate;
mod snippet;
mod span;
mod unquote;

pub use config::ParseOptions;
pub use context::{CancellationToken, Collector, ParseContext, Timer, TracingCollector};
pub use error::{ParseError, ParseErrorKind};
pub use expr::{evaluate, evaluate_tokens, ExprError};
pub use lexer::{scan_all, LexError, Lexer, Token, TokenKind};
pub use parser::parse_tokens;
pub use propagate::propagate;
pub use snippet::render_snippet;
pub use span::Span;
pub use unquote::{unquote, StringLiteralError};

use beanfront_core::{sort_directives, Ast, StringInterner};

/// Parse a ledger held in memory with default options.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    parse_source(&ParseContext::new(), source.as_bytes(), &ParseOptions::default())
}

/// Parse a ledger with explicit options and collaborators.
///
/// Invalid UTF-8 is tolerated outside of tokens that need text.
pub fn parse_source(
    ctx: &ParseContext,
    source: &[u8],
    options: &ParseOptions,
) -> Result<Ast, ParseError> {
    let mut interner = StringInterner::new();
    parse_with_interner(ctx, source, options, &mut interner)
}

/// Parse a ledger, interning names into a caller-owned interner.
///
/// Sharing one interner across files lets every tree point at the same
/// account and currency strings.
pub fn parse_with_interner(
    ctx: &ParseContext,
    source: &[u8],
    options: &ParseOptions,
    interner: &mut StringInterner,
) -> Result<Ast, ParseError> {
    if ctx.is_canceled() {
        tracing::debug!("parse of {} canceled before start", options.filename);
        return Err(ParseError::canceled(&options.filename));
    }

    let timer = ctx.start("lex");
    let (tokens, lex_error) = scan_all(source, &options.filename);
    timer.end();
    tracing::debug!("lexed {} tokens from {}", tokens.len(), options.filename);
    if let Some(err) = &lex_error {
        tracing::debug!("lexer: {}", err);
    }

    let timer = ctx.start("parse");
    let result = parse_tokens(source, &tokens, &options.filename, interner);
    timer.end();
    let mut ast = result.map_err(|err| {
        let snippet = render_snippet(
            source,
            err.line(),
            err.column(),
            options.context_before,
            options.context_after,
        );
        err.with_snippet(snippet)
    })?;
    tracing::debug!("parsed {} directives", ast.directives.len());

    if options.propagate {
        let timer = ctx.start("propagate");
        propagate(&mut ast);
        timer.end();
    }

    if options.sort {
        let timer = ctx.start("sort");
        let reordered = sort_directives(&mut ast.directives);
        timer.end();
        if !reordered {
            tracing::debug!("directives already in order, sort skipped");
        }
    }

    Ok(ast)
}
