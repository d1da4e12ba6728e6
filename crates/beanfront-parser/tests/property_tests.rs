//! Property-based tests for the lexer and parser.
//!
//! Run with: cargo test -p beanfront-parser --test `property_tests`

use beanfront_core::{
    sort_directives, Directive, DirectivePriority, Entry, NaiveDate, Positioned, RawString,
};
use beanfront_parser::{parse, scan_all, unquote, TokenKind};
use proptest::prelude::*;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_ledger_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("2024-01-01 open Assets:Cash USD".to_string()),
        Just("2024-01-02 * \"Shop\" \"Food\"".to_string()),
        Just("  Expenses:Food  12.50 USD".to_string()),
        Just("  Assets:Cash".to_string()),
        Just("  memo: \"x\"".to_string()),
        Just("; comment".to_string()),
        Just(String::new()),
        Just("pushtag #t".to_string()),
        Just("poptag #t".to_string()),
        Just("  Assets:Cash (1 + 2) USD {3 USD} @ 4 USD".to_string()),
        "[ -~]{0,40}",
    ]
}

/// (day, kind) pairs: kind 0 is open, 1 is close, anything else a transaction.
fn arb_dated_entries() -> impl Strategy<Value = Vec<(u32, u8)>> {
    prop::collection::vec((1u32..5, 0u8..4), 0..40)
}

fn render(entries: &[(u32, u8)]) -> String {
    let mut out = String::new();
    for (i, (day, kind)) in entries.iter().enumerate() {
        let line = match kind {
            0 => format!("2024-01-{day:02} open Assets:A{i}\n"),
            1 => format!("2024-01-{day:02} close Assets:A{i}\n"),
            _ => format!("2024-01-{day:02} * \"t{i}\"\n"),
        };
        out.push_str(&line);
    }
    out
}

fn sort_key(d: &Directive) -> (NaiveDate, DirectivePriority) {
    (d.date(), d.priority())
}

// ============================================================================
// Lexer
// ============================================================================

proptest! {
    #[test]
    fn prop_tokens_cover_input_in_order(source in prop::collection::vec(any::<u8>(), 0..256)) {
        let (tokens, _) = scan_all(&source, "prop");

        prop_assert!(!tokens.is_empty());
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);

        let mut previous_end = 0;
        for tok in &tokens {
            prop_assert!(tok.start <= tok.end);
            prop_assert!(tok.end <= source.len());
            prop_assert!(tok.start >= previous_end);
            prop_assert!(tok.line >= 1 && tok.column >= 1);
            if tok.kind != TokenKind::Eof && tok.kind != TokenKind::BlankLine {
                prop_assert!(tok.end > tok.start, "empty {:?} token", tok.kind);
            }
            previous_end = tok.end;
        }
    }

    #[test]
    fn prop_lines_never_decrease(source in "[ -~\n\t]{0,200}") {
        let (tokens, _) = scan_all(source.as_bytes(), "prop");
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].line <= pair[1].line);
        }
    }

    #[test]
    fn prop_parse_never_panics(lines in prop::collection::vec(arb_ledger_line(), 0..30)) {
        let source = lines.join("\n");
        let _ = parse(&source);
    }
}

// ============================================================================
// Sorting
// ============================================================================

proptest! {
    #[test]
    fn prop_parse_output_is_sorted(entries in arb_dated_entries()) {
        let ast = parse(&render(&entries)).unwrap();
        prop_assert_eq!(ast.directives.len(), entries.len());
        for pair in ast.directives.windows(2) {
            prop_assert!(sort_key(&pair[0]) <= sort_key(&pair[1]));
        }
    }

    #[test]
    fn prop_sort_is_stable(entries in arb_dated_entries()) {
        let ast = parse(&render(&entries)).unwrap();
        for pair in ast.directives.windows(2) {
            if sort_key(&pair[0]) == sort_key(&pair[1]) {
                prop_assert!(pair[0].position().line < pair[1].position().line);
            }
        }
    }

    #[test]
    fn prop_sort_is_idempotent(entries in arb_dated_entries()) {
        let ast = parse(&render(&entries)).unwrap();
        let mut again = ast.directives.clone();
        prop_assert!(!sort_directives(&mut again));
        prop_assert_eq!(again, ast.directives);
    }
}

// ============================================================================
// String literals
// ============================================================================

proptest! {
    #[test]
    fn prop_unquote_round_trip(value in "\\PC{0,40}") {
        let quoted = RawString::plain(value.clone());
        let parsed = unquote(&quoted.raw).unwrap();
        prop_assert_eq!(&parsed.value, &value);
        prop_assert_eq!(parsed.quoted(), quoted.quoted());
    }

    #[test]
    fn prop_narration_survives_parse(value in "[a-zA-Z0-9 ,.;#\"\\\\]{0,30}") {
        let quoted = RawString::plain(value.clone());
        let source = format!("2024-01-01 * {}\n", quoted.raw);
        let ast = parse(&source).unwrap();
        let txn = ast.transactions().next().unwrap();
        prop_assert_eq!(&txn.narration.value, &value);
        prop_assert_eq!(&txn.narration.raw, &quoted.raw);
    }
}
