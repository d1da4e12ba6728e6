//! Metadata entries (`key: value` lines) and their typed values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::date::format_date;
use crate::fidelity::{RawNumber, RawString};
use crate::intern::InternedStr;
use crate::position::{Position, Positioned};
use crate::trivia::Comment;
use crate::Amount;

/// A metadata value. Exactly one variant is populated; the parser infers
/// which from the shape of the value tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaValue {
    /// Quoted string (or the raw-text fallback).
    String(RawString),
    /// Calendar date.
    Date(NaiveDate),
    /// Account name.
    Account(InternedStr),
    /// Currency code or other bare identifier.
    Currency(InternedStr),
    /// Tag, without the `#`.
    Tag(InternedStr),
    /// Link, without the `^`.
    Link(InternedStr),
    /// Bare number.
    Number(RawNumber),
    /// Number followed by a currency.
    Amount(Amount),
    /// `TRUE` or `FALSE`.
    Bool(bool),
}

impl MetaValue {
    /// Short name of the variant, for diagnostics and tests.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Date(_) => "date",
            Self::Account(_) => "account",
            Self::Currency(_) => "currency",
            Self::Tag(_) => "tag",
            Self::Link(_) => "link",
            Self::Number(_) => "number",
            Self::Amount(_) => "amount",
            Self::Bool(_) => "boolean",
        }
    }

    /// The value as unquoted text.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::String(s) => s.value.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(&s.quoted()),
            Self::Date(d) => f.write_str(&format_date(*d)),
            Self::Account(a) => write!(f, "{a}"),
            Self::Currency(c) => write!(f, "{c}"),
            Self::Tag(t) => write!(f, "#{t}"),
            Self::Link(l) => write!(f, "^{l}"),
            Self::Number(n) => f.write_str(n.source_text()),
            Self::Amount(a) => write!(f, "{} {}", a.source_text(), a.currency),
            Self::Bool(true) => f.write_str("TRUE"),
            Self::Bool(false) => f.write_str("FALSE"),
        }
    }
}

/// One `key: value` metadata line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata {
    /// Position of the key.
    pub pos: Position,
    /// The key, without the colon.
    pub key: InternedStr,
    /// The typed value.
    pub value: MetaValue,
    /// Trailing comment on the same line.
    pub comment: Option<Comment>,
}

impl Metadata {
    /// Create a metadata entry.
    #[must_use]
    pub fn new(pos: Position, key: impl Into<InternedStr>, value: MetaValue) -> Self {
        Self {
            pos,
            key: key.into(),
            value,
            comment: None,
        }
    }
}

impl Positioned for Metadata {
    fn position(&self) -> &Position {
        &self.pos
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// Find the first entry with the given key.
pub fn find<'a>(meta: &'a [Metadata], key: &str) -> Option<&'a Metadata> {
    meta.iter().find(|m| m.key.as_str() == key)
}
