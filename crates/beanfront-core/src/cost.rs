//! Cost specifications attached to postings.
//!
//! A posting may carry a lot specification in braces:
//!
//! - `{}`: let the ledger pick a lot ([`Cost::Empty`])
//! - `{*}`: average all lots ([`Cost::Merge`])
//! - `{150.00 USD, 2024-01-15, "lot1"}`: per-unit cost ([`Cost::PerUnit`])
//! - `{{1500.00 USD}}`: total cost for the posting ([`Cost::Total`])
//!
//! A posting without braces has no cost (`Option::None` on the posting).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::date::format_date;
use crate::fidelity::RawString;
use crate::Amount;

/// The components written inside cost braces.
///
/// Each component is optional; when present they appear in the order
/// amount, date, label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CostSpec {
    /// Cost amount (per unit or total, depending on the enclosing variant).
    pub amount: Option<Amount>,
    /// Acquisition date.
    pub date: Option<NaiveDate>,
    /// Lot label.
    pub label: Option<RawString>,
}

impl CostSpec {
    /// Set the amount.
    #[must_use]
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the acquisition date.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the lot label.
    #[must_use]
    pub fn with_label(mut self, label: RawString) -> Self {
        self.label = Some(label);
        self
    }

    /// Check whether no component was given.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount.is_none() && self.date.is_none() && self.label.is_none()
    }
}

impl fmt::Display for CostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(amount) = &self.amount {
            parts.push(amount.to_string());
        }
        if let Some(date) = self.date {
            parts.push(format_date(date));
        }
        if let Some(label) = &self.label {
            parts.push(label.quoted());
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// A posting's lot specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cost {
    /// `{}`: the ledger selects a lot.
    Empty,
    /// `{*}`: merge (average) all lots.
    Merge,
    /// `{...}`: per-unit cost components.
    PerUnit(CostSpec),
    /// `{{...}}`: total cost; the amount is always present.
    Total(CostSpec),
}

impl Cost {
    /// The written components, if any.
    #[must_use]
    pub const fn spec(&self) -> Option<&CostSpec> {
        match self {
            Self::PerUnit(spec) | Self::Total(spec) => Some(spec),
            Self::Empty | Self::Merge => None,
        }
    }

    /// Check whether this is a `{{...}}` total cost.
    #[must_use]
    pub const fn is_total(&self) -> bool {
        matches!(self, Self::Total(_))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "{{}}"),
            Self::Merge => write!(f, "{{*}}"),
            Self::PerUnit(spec) => write!(f, "{{{spec}}}"),
            Self::Total(spec) => write!(f, "{{{{{spec}}}}}"),
        }
    }
}
