//! Property-based tests for beanfront-core.
//!
//! Run with: cargo test -p beanfront-core --test `property_tests`

use beanfront_core::date::format_date;
use beanfront_core::{
    parse_date, sort_directives, validate_account, Close, Directive, Entry, Flag, NaiveDate, Open,
    Position, Positioned, RawNumber, RawString, StringInterner, Transaction,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..13, 1u32..29).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_account() -> impl Strategy<Value = String> {
    (
        prop_oneof![
            Just("Assets"),
            Just("Liabilities"),
            Just("Equity"),
            Just("Income"),
            Just("Expenses"),
        ],
        prop::collection::vec("[A-Z0-9][A-Za-z0-9-]{0,10}", 1..4),
    )
        .prop_map(|(root, parts)| format!("{root}:{}", parts.join(":")))
}

fn arb_directive() -> impl Strategy<Value = (NaiveDate, u8)> {
    ((2024i32..2025, 1u32..3, 1u32..4), 0u8..3)
        .prop_map(|((y, m, d), kind)| (NaiveDate::from_ymd_opt(y, m, d).unwrap(), kind))
}

fn build(entries: &[(NaiveDate, u8)]) -> Vec<Directive> {
    entries
        .iter()
        .enumerate()
        .map(|(line, (date, kind))| {
            let pos = Position::new("prop", line * 10, line + 1, 1);
            match kind {
                0 => Directive::Open(Open::new(pos, *date, "Assets:Cash")),
                1 => Directive::Close(Close::new(pos, *date, "Assets:Cash")),
                _ => Directive::Transaction(Transaction::new(
                    pos,
                    *date,
                    Flag::Cleared,
                    RawString::plain(format!("t{line}")),
                )),
            }
        })
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_date_round_trip(date in arb_date()) {
        prop_assert_eq!(parse_date(&format_date(date)).unwrap(), date);
    }

    #[test]
    fn prop_generated_accounts_validate(account in arb_account()) {
        prop_assert!(validate_account(&account).is_ok(), "{}", account);
    }

    #[test]
    fn prop_interner_returns_shared_handles(words in prop::collection::vec("[A-Z]{1,4}", 1..50)) {
        let mut interner = StringInterner::new();
        let handles: Vec<_> = words.iter().map(|w| interner.intern(w)).collect();
        for (word, handle) in words.iter().zip(&handles) {
            prop_assert!(interner.intern(word).ptr_eq(handle));
        }
        let mut distinct = words.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(interner.len(), distinct.len());
    }

    #[test]
    fn prop_number_keeps_value_and_spelling(cents in -10_000_000_000i64..10_000_000_000) {
        let value = Decimal::new(cents, 2);
        let plain = value.to_string();
        let (sign, digits) = plain.strip_prefix('-').map_or(("", plain.as_str()), |d| ("-", d));
        let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
        let grouped = int
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join(",");
        let text = if frac.is_empty() {
            format!("{sign}{grouped}")
        } else {
            format!("{sign}{grouped}.{frac}")
        };

        let number = RawNumber::parse(&text).unwrap();
        prop_assert_eq!(number.decimal(), Some(value));
        prop_assert_eq!(number.source_text(), text.as_str());
    }

    #[test]
    fn prop_sort_orders_and_keeps_file_order(entries in prop::collection::vec(arb_directive(), 0..30)) {
        let mut directives = build(&entries);
        sort_directives(&mut directives);

        for pair in directives.windows(2) {
            let a = (pair[0].date(), pair[0].priority());
            let b = (pair[1].date(), pair[1].priority());
            prop_assert!(a <= b);
            if a == b {
                prop_assert!(pair[0].position().line < pair[1].position().line);
            }
        }

        let sorted = directives.clone();
        prop_assert!(!sort_directives(&mut directives));
        prop_assert_eq!(directives, sorted);
    }
}
