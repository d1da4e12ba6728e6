//! Syntax tree types for beanfront.
//!
//! This crate holds everything the parser produces and the ledger and
//! formatter consume:
//!
//! - [`Position`] - file, byte offset, line and column of a node
//! - [`StringInterner`] / [`InternedStr`] - shared account and currency names
//! - [`RawString`] / [`RawNumber`] - literal values with their source spelling
//! - [`Amount`], [`Cost`], [`MetaValue`] - typed values
//! - [`Directive`] - all dated directives, and [`sort_directives`]
//! - [`Ast`] - the top-level tree with its auxiliary collections
//!
//! # Example
//!
//! ```
//! use beanfront_core::{Amount, RawNumber, StringInterner};
//!
//! let mut interner = StringInterner::new();
//! let usd = interner.intern("USD");
//!
//! let amount = Amount::from_number(RawNumber::parse("1,234.50").unwrap(), usd);
//! assert_eq!(amount.value, "1234.50");
//! assert_eq!(amount.source_text(), "1,234.50");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod amount;
pub mod ast;
pub mod cost;
pub mod date;
pub mod directive;
pub mod fidelity;
pub mod intern;
pub mod metadata;
pub mod position;
pub mod trivia;

pub use account::{validate_account, AccountError};
pub use amount::Amount;
pub use ast::{Ast, Include, OptionDirective, Plugin, Popmeta, Poptag, Pushmeta, Pushtag};
pub use cost::{Cost, CostSpec};
pub use date::{parse_date, DateError};
pub use directive::{
    sort_directives, Balance, Close, Commodity, Custom, CustomValue, Directive, DirectivePriority,
    Document, Entry, Event, Flag, Note, Open, Pad, Posting, Price, PriceAnnotation, Transaction,
};
pub use fidelity::{EscapeStyle, NumberError, RawNumber, RawString};
pub use intern::{InternedStr, StringInterner};
pub use metadata::{MetaValue, Metadata};
pub use position::{Position, Positioned};
pub use trivia::{BlankLine, Comment, CommentKind};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
