//! Amount type: a number (kept as decimal text) with a currency.
//!
//! The number is never stored as floating point. `value` is the canonical
//! decimal text used for computation; `raw` keeps the original spelling
//! (thousands separators, an arithmetic expression) when it differs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fidelity::RawNumber;
use crate::intern::InternedStr;

/// An amount is a quantity paired with a currency.
///
/// # Examples
///
/// ```
/// use beanfront_core::Amount;
/// use rust_decimal_macros::dec;
///
/// let amount = Amount::new("-37.45", "USD");
/// assert_eq!(amount.decimal(), Some(dec!(-37.45)));
/// assert_eq!(amount.to_string(), "-37.45 USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    /// Canonical decimal text.
    pub value: String,
    /// Original spelling, when it differs from `value`.
    pub raw: Option<String>,
    /// The currency code (e.g. "USD", "EUR", "AAPL").
    pub currency: InternedStr,
}

impl Amount {
    /// Create an amount from canonical decimal text.
    #[must_use]
    pub fn new(value: impl Into<String>, currency: impl Into<InternedStr>) -> Self {
        Self {
            value: value.into(),
            raw: None,
            currency: currency.into(),
        }
    }

    /// Create an amount from a parsed number literal.
    #[must_use]
    pub fn from_number(number: RawNumber, currency: impl Into<InternedStr>) -> Self {
        Self {
            value: number.value,
            raw: number.raw,
            currency: currency.into(),
        }
    }

    /// The number part as a literal.
    #[must_use]
    pub fn number(&self) -> RawNumber {
        RawNumber {
            value: self.value.clone(),
            raw: self.raw.clone(),
        }
    }

    /// The value as an exact decimal.
    pub fn decimal(&self) -> Option<Decimal> {
        self.value.parse().ok()
    }

    /// The number as written in the source.
    pub fn source_text(&self) -> &str {
        self.raw.as_deref().unwrap_or(&self.value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}
