//! Source-fidelity wrappers for string and number literals.
//!
//! The parser keeps both the semantic value of a literal and the exact
//! text it was written as, so a formatter can reproduce the original
//! spelling (`1,234.50`, `"say \"hi\""`) instead of a re-rendered
//! canonical form.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a string literal was spelled in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EscapeStyle {
    /// No backslash escapes were present.
    #[default]
    None,
    /// At least one C-style backslash escape (`\" \\ \n \t \r`) was present.
    CStyle,
}

/// A string literal with its original quoted spelling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawString {
    /// The logical (unescaped) value.
    pub value: String,
    /// The original token text, including the surrounding quotes.
    pub raw: String,
    /// Whether the original used escapes.
    pub escape: EscapeStyle,
}

impl RawString {
    /// Create a literal from its parts.
    #[must_use]
    pub fn new(value: impl Into<String>, raw: impl Into<String>, escape: EscapeStyle) -> Self {
        Self {
            value: value.into(),
            raw: raw.into(),
            escape,
        }
    }

    /// Create a literal that was not read from source, spelled canonically.
    #[must_use]
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        let raw = quote(&value);
        let escape = if raw.len() == value.len() + 2 {
            EscapeStyle::None
        } else {
            EscapeStyle::CStyle
        };
        Self { value, raw, escape }
    }

    /// The logical value.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Rebuild the quoted form.
    ///
    /// Unescaped literals are re-quoted from the value; escaped ones return
    /// the original spelling verbatim.
    #[must_use]
    pub fn quoted(&self) -> String {
        match self.escape {
            EscapeStyle::None => format!("\"{}\"", self.value),
            EscapeStyle::CStyle => self.raw.clone(),
        }
    }
}

impl fmt::Display for RawString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl PartialEq<str> for RawString {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for RawString {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

/// Quote a value using C-style escapes where needed.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A number literal that could not be read as a decimal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid number \"{0}\"")]
pub struct NumberError(pub String);

/// A number literal: canonical decimal text plus the original spelling.
///
/// The value is kept as text, never as floating point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawNumber {
    /// Canonical decimal text (no thousands separators, no leading `+`).
    pub value: String,
    /// Original spelling, when it differs from `value`.
    pub raw: Option<String>,
}

impl RawNumber {
    /// Read a number literal such as `-1,234.50`.
    pub fn parse(text: &str) -> Result<Self, NumberError> {
        let trimmed = text.strip_prefix('+').unwrap_or(text);
        let value: String = trimmed.chars().filter(|c| *c != ',').collect();
        if value.is_empty() || Decimal::from_str(&value).is_err() {
            return Err(NumberError(text.to_string()));
        }
        let raw = (value != text).then(|| text.to_string());
        Ok(Self { value, raw })
    }

    /// Wrap a computed decimal (for example an evaluated expression).
    #[must_use]
    pub fn from_decimal(number: Decimal, raw: Option<String>) -> Self {
        Self {
            value: number.to_string(),
            raw,
        }
    }

    /// The value as an exact decimal.
    pub fn decimal(&self) -> Option<Decimal> {
        Decimal::from_str(&self.value).ok()
    }

    /// The text as written in the source.
    pub fn source_text(&self) -> &str {
        self.raw.as_deref().unwrap_or(&self.value)
    }
}

impl fmt::Display for RawNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
