//! Transactions, postings and amounts.

use beanfront_core::{
    Amount, Comment, Flag, InternedStr, NaiveDate, Position, Posting, PriceAnnotation, RawNumber,
    Transaction,
};

use super::Parser;
use crate::error::{ParseError, ParseErrorKind};
use crate::expr::{evaluate_tokens, matching_paren, ExprError};
use crate::lexer::TokenKind;
use crate::span::Span;

impl Parser<'_> {
    /// `[txn] flag [payee] narration (tag|link)*`, then metadata and postings.
    pub(super) fn parse_transaction(
        &mut self,
        pos: Position,
        date: NaiveDate,
    ) -> Result<Transaction, ParseError> {
        let flag = self.parse_flag()?;

        // One string is the narration; two are payee then narration.
        let (payee, narration) = match self.eat_same_line(TokenKind::String) {
            Some(first) => match self.eat_same_line(TokenKind::String) {
                Some(second) => (Some(self.unquote(&first)?), self.unquote(&second)?),
                None => (None, self.unquote(&first)?),
            },
            None => return Err(self.expected("transaction payee or narration string")),
        };

        let mut txn = Transaction::new(pos, date, flag, narration);
        txn.payee = payee;
        self.parse_tags_links(&mut txn.tags, &mut txn.links);
        txn.comment = self.finish_header()?;

        // Tags and links may continue on indented lines before anything else.
        loop {
            let tok = self.peek();
            if tok.column <= 1 || !matches!(tok.kind, TokenKind::Tag | TokenKind::Link) {
                break;
            }
            self.push_tag_or_link(&mut txn.tags, &mut txn.links);
            self.parse_tags_links(&mut txn.tags, &mut txn.links);
            self.finish_line_into_trivia()?;
        }

        txn.meta = self.parse_metadata_block()?;
        self.parse_postings(&mut txn.postings)?;
        Ok(txn)
    }

    fn parse_flag(&mut self) -> Result<Flag, ParseError> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Txn => {
                self.advance();
                if self.eat_same_line(TokenKind::Star).is_some() {
                    Ok(Flag::Cleared)
                } else if self.eat_same_line(TokenKind::Bang).is_some() {
                    Ok(Flag::Pending)
                } else {
                    Err(self.expected("transaction flag"))
                }
            }
            TokenKind::Star => {
                self.advance();
                Ok(Flag::Cleared)
            }
            TokenKind::Bang => {
                self.advance();
                Ok(Flag::Pending)
            }
            // The flagless shorthand: a bare string is a padding transaction.
            TokenKind::String => Ok(Flag::Padding),
            _ => Err(self.expected("transaction flag or payee/narration")),
        }
    }

    /// Tags and links on the current line, in order of first occurrence.
    pub(super) fn parse_tags_links(&mut self, tags: &mut Vec<InternedStr>, links: &mut Vec<InternedStr>) {
        while self.at_same_line(TokenKind::Tag) || self.at_same_line(TokenKind::Link) {
            self.push_tag_or_link(tags, links);
        }
    }

    fn push_tag_or_link(&mut self, tags: &mut Vec<InternedStr>, links: &mut Vec<InternedStr>) {
        let tok = self.advance();
        let name = self.intern_marked(&tok);
        let list = if tok.kind == TokenKind::Link { links } else { tags };
        if !list.contains(&name) {
            list.push(name);
        }
    }

    /// End of the header line: only a comment may follow.
    fn finish_header(&mut self) -> Result<Option<Comment>, ParseError> {
        let tok = self.peek();
        if !self.on_current_line(&tok) || matches!(tok.kind, TokenKind::Comment | TokenKind::Illegal) {
            return self.finish_line();
        }
        let kind = if tok.kind.starts_posting() {
            ParseErrorKind::syntax("postings must start on a new line")
        } else {
            ParseErrorKind::Unexpected(format!("{} in transaction header", tok.kind.describe()))
        };
        Err(self.error_at(&tok, kind))
    }

    /// The posting loop.
    ///
    /// Postings are indented lines starting with a flag or an account.
    /// Comment lines between postings are kept as trivia. A blank line is
    /// only part of the transaction when the token after it is indented:
    /// a blank line followed by a column-1 token or end of input ends the
    /// transaction and is left for the top level to record.
    fn parse_postings(&mut self, postings: &mut Vec<Posting>) -> Result<(), ParseError> {
        loop {
            let tok = self.peek();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::BlankLine => {
                    let next = self.peek_nth(1);
                    if next.kind == TokenKind::Eof || next.column <= 1 {
                        break;
                    }
                    self.push_blank_line();
                }
                _ if tok.column <= 1 => break,
                TokenKind::Comment => self.push_comment(),
                kind if kind.starts_posting() => postings.push(self.parse_posting()?),
                _ => break,
            }
        }
        Ok(())
    }

    /// `[flag] account [amount] [cost] [(@|@@) amount]`
    fn parse_posting(&mut self) -> Result<Posting, ParseError> {
        let first = self.peek();
        let pos = self.position_of(&first);
        let flag = match first.kind {
            TokenKind::Star => Some(Flag::Cleared),
            TokenKind::Bang => Some(Flag::Pending),
            _ => None,
        };
        let account = if flag.is_some() {
            self.advance();
            self.expect_account()?
        } else {
            self.take_account()?
        };

        let mut posting = Posting::new(pos, account);
        posting.flag = flag;

        if self.at_amount_start() {
            posting.amount = Some(self.parse_amount()?);
        }
        if self.at_same_line(TokenKind::LBrace) || self.at_same_line(TokenKind::LDoubleBrace) {
            posting.cost = Some(self.parse_cost()?);
        }
        if self.eat_same_line(TokenKind::At).is_some() {
            posting.price = Some(PriceAnnotation::Unit(self.parse_amount()?));
        } else if self.eat_same_line(TokenKind::AtAt).is_some() {
            posting.price = Some(PriceAnnotation::Total(self.parse_amount()?));
        }

        posting.comment = self.finish_line()?;
        posting.meta = self.parse_metadata_block()?;
        Ok(posting)
    }

    /// Returns true if a number or a parenthesised expression follows on
    /// the current line.
    pub(super) fn at_amount_start(&self) -> bool {
        let tok = self.peek();
        self.on_current_line(&tok)
            && (tok.kind == TokenKind::Number || self.source.get(tok.start) == Some(&b'('))
    }

    /// A number or expression followed by a currency.
    pub(super) fn parse_amount(&mut self) -> Result<Amount, ParseError> {
        let number = self.parse_number_or_expr()?;
        let currency = self.expect_currency()?;
        Ok(Amount::from_number(number, currency))
    }

    pub(super) fn parse_number_or_expr(&mut self) -> Result<RawNumber, ParseError> {
        let tok = self.peek();
        if !self.on_current_line(&tok) {
            return Err(self.expected("number"));
        }
        match tok.kind {
            TokenKind::Number => {
                self.advance();
                self.number(&tok)
            }
            TokenKind::LParen => self.parse_expression(),
            _ => Err(self.expected("number")),
        }
    }

    /// Evaluate `( ... )` starting at the next token.
    ///
    /// The closing parenthesis is found on the raw bytes; exactly the tokens
    /// inside that byte range are evaluated and consumed.
    fn parse_expression(&mut self) -> Result<RawNumber, ParseError> {
        let open = self.peek();
        let Some(end) = matching_paren(self.source, open.start) else {
            return Err(self.error_at(&open, ExprError::UnmatchedParen));
        };

        let first = self.pos;
        let mut last = first;
        while self
            .tokens
            .get(last)
            .is_some_and(|t| t.start < end && t.kind != TokenKind::Eof)
        {
            last += 1;
        }

        let span = Span::new(open.start, end);
        let value = evaluate_tokens(&self.tokens[first..last], self.source).map_err(|e| {
            ParseError::new(ParseErrorKind::Expression(e), self.position_of(&open), span)
        })?;
        while self.pos < last {
            self.advance();
        }

        let raw = String::from_utf8_lossy(span.bytes(self.source)).into_owned();
        Ok(RawNumber::from_decimal(value, Some(raw)))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::tests_support::{parse_err, parse_ok};
    use beanfront_core::{Cost, Flag, PriceAnnotation, Transaction};

    fn first_txn(source: &str) -> Transaction {
        let ast = parse_ok(source);
        let tx = ast.transactions().next().cloned().expect("a transaction");
        tx
    }

    #[test]
    fn test_cafe_mogador() {
        let txn = first_txn(
            "2014-05-05 * \"Cafe Mogador\" \"Lamb tagine with wine\"\n  Liabilities:CreditCard:CapitalOne  -37.45 USD\n  Expenses:Food:Restaurant\n",
        );
        assert_eq!(txn.flag, Flag::Cleared);
        assert_eq!(txn.payee.as_ref().map(|p| p.as_str()), Some("Cafe Mogador"));
        assert_eq!(txn.narration, "Lamb tagine with wine");
        assert_eq!(txn.postings.len(), 2);
        assert_eq!(txn.postings[0].amount.as_ref().map(|a| a.value.as_str()), Some("-37.45"));
        assert!(txn.postings[1].amount.is_none());
    }

    #[test]
    fn test_flag_forms() {
        assert_eq!(first_txn("2024-01-01 txn * \"x\"\n").flag, Flag::Cleared);
        assert_eq!(first_txn("2024-01-01 ! \"x\"\n").flag, Flag::Pending);
        let txn = first_txn("2024-01-01 \"Only narration\"\n");
        assert_eq!(txn.flag, Flag::Padding);
        assert_eq!(txn.narration, "Only narration");
        assert!(txn.payee.is_none());
    }

    #[test]
    fn test_header_errors() {
        assert_eq!(parse_err("2024-01-01 txn \"x\"\n").message(), "expected transaction flag");
        assert_eq!(
            parse_err("2024-01-01 *\n  Assets:Cash 1 USD\n").message(),
            "expected transaction payee or narration string"
        );
        assert_eq!(
            parse_err("2024-01-01 * \"x\" Assets:Cash 1 USD\n").message(),
            "postings must start on a new line"
        );
        assert_eq!(
            parse_err("2024-01-01 * \"x\" 42\n").message(),
            "unexpected number in transaction header"
        );
    }

    #[test]
    fn test_tags_links_and_comment() {
        let txn = first_txn(
            "2024-01-01 * \"Dinner\" #food ^inv-1 #trip #food ; split later\n  #extra ^inv-2\n  Expenses:Food 10 USD\n",
        );
        assert_eq!(txn.tags, vec!["food", "trip", "extra"]);
        assert_eq!(txn.links, vec!["inv-1", "inv-2"]);
        assert_eq!(txn.comment.as_ref().map(|c| c.text()), Some("split later"));
        assert_eq!(txn.postings.len(), 1);
    }

    #[test]
    fn test_blank_line_between_postings() {
        let ast = parse_ok("2024-01-01 * \"x\"\n  Assets:A 1 USD\n\n  Assets:B\n");
        let txn = ast.transactions().next().unwrap();
        assert_eq!(txn.postings.len(), 2);
        assert_eq!(ast.blank_lines.len(), 1);
    }

    #[test]
    fn test_blank_line_ends_transaction() {
        let ast = parse_ok("2024-01-01 * \"x\"\n  Assets:A 1 USD\n\n2024-01-02 open Assets:B\n");
        assert_eq!(ast.directives.len(), 2);
        assert_eq!(ast.transactions().next().unwrap().postings.len(), 1);
        assert_eq!(ast.blank_lines.len(), 1);
        assert_eq!(ast.blank_lines[0].pos.line, 3);

        let ast = parse_ok("2024-01-01 * \"x\"\n  Assets:A 1 USD\n\n");
        assert_eq!(ast.blank_lines.len(), 1);
    }

    #[test]
    fn test_comments_between_postings() {
        let ast = parse_ok("2024-01-01 * \"x\"\n  Assets:A 1 USD ; first\n  ; between\n  Assets:B\n");
        let txn = ast.transactions().next().unwrap();
        assert_eq!(txn.postings.len(), 2);
        assert_eq!(txn.postings[0].comment.as_ref().map(|c| c.text()), Some("first"));
        assert_eq!(ast.comments.len(), 1);
        assert_eq!(ast.comments[0].text(), "between");
    }

    #[test]
    fn test_posting_flag_cost_price() {
        let txn = first_txn(
            "2024-01-01 * \"Buy\"\n  ! Assets:Broker 10 HOOL {500.00 USD, 2024-01-01, \"lot-1\"} @ 510.00 USD\n  Assets:Cash -5000 USD @@ 5000 USD\n",
        );
        let p = &txn.postings[0];
        assert_eq!(p.flag, Some(Flag::Pending));
        let Some(Cost::PerUnit(spec)) = &p.cost else {
            panic!("expected per-unit cost, got {:?}", p.cost);
        };
        assert_eq!(spec.amount.as_ref().map(|a| a.value.as_str()), Some("500.00"));
        assert_eq!(spec.label.as_ref().map(|l| l.as_str()), Some("lot-1"));
        assert!(matches!(&p.price, Some(PriceAnnotation::Unit(a)) if a.value == "510.00"));
        assert!(txn.postings[1].price.as_ref().is_some_and(PriceAnnotation::is_total));
    }

    #[test]
    fn test_expression_amount() {
        let txn = first_txn("2024-01-01 * \"Split\"\n  Expenses:Food (2 + 3 * 4) USD\n  Assets:Cash\n");
        let amount = txn.postings[0].amount.as_ref().unwrap();
        assert_eq!(amount.value, "14");
        assert_eq!(amount.source_text(), "(2 + 3 * 4)");
        assert_eq!(amount.currency, "USD");
    }

    #[test]
    fn test_expression_errors() {
        let err = parse_err("2024-01-01 * \"x\"\n  Expenses:Food (10 / 0) USD\n");
        assert_eq!(err.message(), "division by zero");
        assert_eq!((err.line(), err.column()), (2, 17));
        assert_eq!(err.span(), (33, 41));

        let err = parse_err("2024-01-01 * \"x\"\n  Expenses:Food (10 / 2 USD\n");
        assert_eq!(err.message(), "unmatched parenthesis");

        let err = parse_err("2024-01-01 * \"x\"\n  Expenses:Food (2 USD) USD\n");
        assert_eq!(err.message(), "unexpected identifier in expression");
        assert_eq!((err.line(), err.column()), (2, 17));
    }

    #[test]
    fn test_posting_errors() {
        assert_eq!(
            parse_err("2024-01-01 * \"x\"\n  Assets:Cash 10\n").message(),
            "expected currency"
        );
        assert_eq!(
            parse_err("2024-01-01 * \"x\"\n  * 10 USD\n").message(),
            "expected account"
        );
        assert_eq!(
            parse_err("2024-01-01 * \"x\"\n  Assets:cash 10 USD\n").message(),
            "invalid account component \"cash\": must start with an uppercase letter or digit"
        );
    }
}
