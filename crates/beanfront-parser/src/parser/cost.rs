//! Cost specifications: `{}`, `{*}`, `{amount, date, "label"}`, `{{total}}`.

use beanfront_core::{Cost, CostSpec};

use super::Parser;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::TokenKind;

const MERGE_WITH_TOTAL: &str = "cannot use merge/empty with total cost";

impl Parser<'_> {
    pub(super) fn parse_cost(&mut self) -> Result<Cost, ParseError> {
        let open = self.advance();
        let total = open.kind == TokenKind::LDoubleBrace;
        let (close, close_text) = if total {
            (TokenKind::RDoubleBrace, "'}}'")
        } else {
            (TokenKind::RBrace, "'}'")
        };

        if let Some(star) = self.eat_same_line(TokenKind::Star) {
            if total {
                return Err(self.error_at(&star, ParseErrorKind::syntax(MERGE_WITH_TOTAL)));
            }
            if self.eat_same_line(TokenKind::RBrace).is_none() {
                return Err(self.expected("'}' after '*'"));
            }
            return Ok(Cost::Merge);
        }

        // Components are comma-separated and come in a fixed order:
        // amount, then date, then label.
        let mut spec = CostSpec::default();
        let mut first = true;
        loop {
            if self.eat_same_line(close).is_some() {
                break;
            }
            if !first && self.eat_same_line(TokenKind::Comma).is_none() {
                return Err(self.expected(&format!("',' or {close_text}")));
            }
            first = false;

            let tok = self.peek();
            if !self.on_current_line(&tok) {
                return Err(self.expected(close_text));
            }
            match tok.kind {
                TokenKind::Number | TokenKind::LParen if spec.is_empty() => {
                    spec.amount = Some(self.parse_amount()?);
                }
                TokenKind::Date if spec.date.is_none() && spec.label.is_none() => {
                    self.advance();
                    spec.date = Some(self.date(&tok)?);
                }
                TokenKind::String if spec.label.is_none() => {
                    self.advance();
                    spec.label = Some(self.unquote(&tok)?);
                }
                _ => return Err(self.expected("cost amount, date or label")),
            }
        }

        if !total {
            return Ok(if spec.is_empty() {
                Cost::Empty
            } else {
                Cost::PerUnit(spec)
            });
        }
        if spec.is_empty() {
            return Err(self.error_at(&open, ParseErrorKind::syntax(MERGE_WITH_TOTAL)));
        }
        if spec.amount.is_none() {
            return Err(self.error_at(&open, ParseErrorKind::syntax("total cost requires an amount")));
        }
        Ok(Cost::Total(spec))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::tests_support::{parse_err, parse_ok};
    use beanfront_core::{Cost, NaiveDate};

    fn cost_of(posting_line: &str) -> Option<Cost> {
        let src = format!("2024-01-01 * \"x\"\n  {posting_line}\n");
        let ast = parse_ok(&src);
        let txn = ast.transactions().next().cloned();
        txn.and_then(|t| t.postings.into_iter().next()).and_then(|p| p.cost)
    }

    fn cost_err(posting_line: &str) -> String {
        parse_err(&format!("2024-01-01 * \"x\"\n  {posting_line}\n")).message()
    }

    #[test]
    fn test_empty_and_merge() {
        assert_eq!(cost_of("Assets:A 10 HOOL {}"), Some(Cost::Empty));
        assert_eq!(cost_of("Assets:A 10 HOOL {*}"), Some(Cost::Merge));
    }

    #[test]
    fn test_per_unit_components() {
        let Some(Cost::PerUnit(spec)) = cost_of("Assets:A 10 HOOL {500 USD, 2024-01-15, \"first\"}") else {
            panic!("expected per-unit cost");
        };
        assert_eq!(spec.amount.map(|a| a.value), Some("500".to_string()));
        assert_eq!(spec.date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(spec.label.map(|l| l.value), Some("first".to_string()));

        let Some(Cost::PerUnit(spec)) = cost_of("Assets:A 10 HOOL {2024-01-15}") else {
            panic!("expected per-unit cost");
        };
        assert!(spec.amount.is_none());
        assert!(spec.date.is_some());
    }

    #[test]
    fn test_total_cost() {
        let Some(Cost::Total(spec)) = cost_of("Assets:A 10 HOOL {{5000 USD}}") else {
            panic!("expected total cost");
        };
        assert_eq!(spec.amount.map(|a| a.value), Some("5000".to_string()));
    }

    #[test]
    fn test_total_cost_errors() {
        assert_eq!(cost_err("Assets:A 10 HOOL {{}}"), "cannot use merge/empty with total cost");
        assert_eq!(cost_err("Assets:A 10 HOOL {{*}}"), "cannot use merge/empty with total cost");
        assert_eq!(cost_err("Assets:A 10 HOOL {{2024-01-01}}"), "total cost requires an amount");
    }

    #[test]
    fn test_malformed_cost() {
        assert_eq!(cost_err("Assets:A 10 HOOL {* 5 USD}"), "expected '}' after '*'");
        assert_eq!(cost_err("Assets:A 10 HOOL {5 USD"), "expected ',' or '}'");
        assert_eq!(
            cost_err("Assets:A 10 HOOL {\"lbl\", 2024-01-01}"),
            "expected cost amount, date or label"
        );
    }
}
