#![no_main]
//! Fuzz target for the full pipeline.
//!
//! Arbitrary bytes go straight in: the lexer accepts invalid UTF-8, and the
//! pipeline must return a tree or an error without panicking.

use beanfront_parser::{parse_source, scan_all, ParseContext, ParseOptions, TokenKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let (tokens, _) = scan_all(data, "fuzz");
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    assert!(tokens.iter().all(|t| t.start <= t.end && t.end <= data.len()));

    let _ = parse_source(&ParseContext::new(), data, &ParseOptions::default());
});
