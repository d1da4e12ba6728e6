//! Error reporting tests: positions, messages and rendered diagnostics.

use beanfront_parser::{parse, parse_source, ParseContext, ParseError, ParseErrorKind, ParseOptions};

fn parse_err(source: &str) -> ParseError {
    match parse(source) {
        Ok(ast) => panic!("expected an error, got {} directives", ast.directives.len()),
        Err(err) => err,
    }
}

const MISSING_CURRENCY: &str = r#"2014-05-05 * "Cafe Mogador" "Lamb tagine with wine"
  Liabilities:CreditCard  -37.45
  Expenses:Food
"#;

#[test]
fn test_missing_currency_position() {
    let err = parse_err(MISSING_CURRENCY);
    assert_eq!(err.message(), "expected currency");
    assert_eq!((err.line(), err.column(), err.offset()), (2, 33, 84));
    assert_eq!(err.span(), (84, 84));
    assert_eq!(err.to_string(), "<input>:2:33: expected currency");
}

#[test]
fn test_snippet_rendering() {
    let err = parse_err(MISSING_CURRENCY);
    insta::assert_snapshot!(err.snippet.as_deref().unwrap_or_default(), @r#"
  1 | 2014-05-05 * "Cafe Mogador" "Lamb tagine with wine"
> 2 |   Liabilities:CreditCard  -37.45
    |                                 ^
  3 |   Expenses:Food
"#);
}

#[test]
fn test_snippet_context_is_configurable() {
    let options = ParseOptions::new().with_context(0, 0);
    let err = parse_source(&ParseContext::new(), MISSING_CURRENCY.as_bytes(), &options).unwrap_err();
    let snippet = err.snippet.unwrap();
    assert_eq!(snippet.lines().count(), 2);
    assert!(snippet.starts_with("> 2 |"));
}

#[test]
fn test_contract_messages() {
    let cases = [
        ("2024-01-01 *\n", "expected transaction payee or narration string"),
        ("2024-01-01 open\n", "expected account"),
        ("option \"title\"\n", "expected string"),
        ("2024-01-01 price HOOL 10\n", "expected currency"),
        ("2024-01-01 * \"x\"\n  Assets:A (1 / 0) USD\n", "division by zero"),
        ("2024-01-01 open Foo:Bar\n", "unexpected account type \"Foo\""),
        ("2024-01-01open Assets:Cash\n", "whitespace required between date and directive"),
    ];
    for (source, message) in cases {
        assert_eq!(parse_err(source).message(), message, "source: {source:?}");
    }
}

#[test]
fn test_error_kinds() {
    assert!(matches!(
        parse_err("2024-01-01 open 42\n").kind,
        ParseErrorKind::Expected(_)
    ));
    assert!(matches!(
        parse_err("2024-01-01 open Assets:cash\n").kind,
        ParseErrorKind::Account(_)
    ));
    assert!(matches!(parse_err("2024-02-30 open Assets:Cash\n").kind, ParseErrorKind::Date(_)));
    assert!(matches!(
        parse_err("2024-01-01 note Assets:Cash \"bad \\q\"\n").kind,
        ParseErrorKind::StringLiteral(_)
    ));
    assert!(matches!(
        parse_err("2024-01-01 * \"x\"\n  Assets:A (1 +) USD\n").kind,
        ParseErrorKind::Expression(_)
    ));
}

#[test]
fn test_first_error_wins() {
    let err = parse_err("2024-01-01 open\n2024-01-02 close\n");
    assert_eq!(err.line(), 1);
}

#[test]
fn test_error_on_later_line_counts_lines() {
    let source = "; header\n\n2024-01-01 open Assets:Cash\n2024-01-02 close Liabilities:card\n";
    let err = parse_err(source);
    assert_eq!(err.line(), 4);
    assert_eq!(err.column(), 18);
    insta::assert_snapshot!(err.message(), @r#"invalid account component "card": must start with an uppercase letter or digit"#);
}

#[test]
fn test_columns_count_characters() {
    let err = parse_err("2024-01-01 * \"Café\" $\n");
    assert_eq!(err.message(), "invalid character '$'");
    assert_eq!(err.column(), 21);
    assert_eq!(err.offset(), 21);
}

#[test]
fn test_write_report() {
    let err = parse_err(MISSING_CURRENCY).with_hint("add a currency after the number");
    let mut out = Vec::new();
    err.write_report(MISSING_CURRENCY, false, &mut out).unwrap();
    let report = String::from_utf8(out).unwrap();

    assert!(report.contains("[P0001]"), "{report}");
    assert!(report.contains("expected currency"), "{report}");
    assert!(report.contains("Liabilities:CreditCard"), "{report}");
    assert!(report.contains("add a currency after the number"), "{report}");
}
