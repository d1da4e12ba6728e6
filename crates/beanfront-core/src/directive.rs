//! Directive types: one dated statement in the ledger each.
//!
//! - [`Transaction`] - transfers between accounts, made of [`Posting`]s
//! - [`Balance`] - assert an account balance at the start of a date
//! - [`Open`] / [`Close`] - account lifetime
//! - [`Commodity`] - declare a currency or commodity
//! - [`Pad`] - fill an account up to the next balance assertion
//! - [`Note`] / [`Document`] - annotations on an account
//! - [`Price`] - a price quote
//! - [`Event`] - a named life event value
//! - [`Custom`] - user-defined directive with typed values
//!
//! Every variant carries a [`Position`], a date, an ordered list of
//! [`Metadata`] and an optional trailing comment. [`sort_directives`]
//! orders them chronologically.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::date::format_date;
use crate::fidelity::{RawNumber, RawString};
use crate::intern::InternedStr;
use crate::metadata::Metadata;
use crate::position::{Position, Positioned};
use crate::trivia::Comment;
use crate::{Amount, Cost};

/// Transaction or posting flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    /// `*`: cleared.
    Cleared,
    /// `!`: pending, needs review.
    Pending,
    /// `P`: padding; also used for the flagless string shorthand.
    Padding,
}

impl Flag {
    /// The flag character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Cleared => '*',
            Self::Pending => '!',
            Self::Padding => 'P',
        }
    }

    /// Read a flag character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '*' => Some(Self::Cleared),
            '!' => Some(Self::Pending),
            'P' => Some(Self::Padding),
            _ => None,
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Price annotation for a posting (`@` or `@@`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceAnnotation {
    /// `@`: price per unit.
    Unit(Amount),
    /// `@@`: total price for the posting.
    Total(Amount),
}

impl PriceAnnotation {
    /// The price amount.
    #[must_use]
    pub const fn amount(&self) -> &Amount {
        match self {
            Self::Unit(a) | Self::Total(a) => a,
        }
    }

    /// Check whether this is an `@@` total price.
    #[must_use]
    pub const fn is_total(&self) -> bool {
        matches!(self, Self::Total(_))
    }
}

impl fmt::Display for PriceAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(a) => write!(f, "@ {a}"),
            Self::Total(a) => write!(f, "@@ {a}"),
        }
    }
}

/// One account leg of a transaction.
///
/// A posting without an amount is left for the ledger to infer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Where the posting line starts.
    pub pos: Position,
    /// Optional per-posting flag.
    pub flag: Option<Flag>,
    /// The account.
    pub account: InternedStr,
    /// Units; `None` means "to be inferred".
    pub amount: Option<Amount>,
    /// Lot specification.
    pub cost: Option<Cost>,
    /// Price annotation.
    pub price: Option<PriceAnnotation>,
    /// Posting metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment on the posting line.
    pub comment: Option<Comment>,
    /// Set by the ledger when it fills in a missing amount.
    pub inferred: bool,
}

impl Posting {
    /// Create a posting without an amount.
    #[must_use]
    pub fn new(pos: Position, account: impl Into<InternedStr>) -> Self {
        Self {
            pos,
            flag: None,
            account: account.into(),
            amount: None,
            cost: None,
            price: None,
            meta: Vec::new(),
            comment: None,
            inferred: false,
        }
    }

    /// Set the amount.
    #[must_use]
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the flag.
    #[must_use]
    pub const fn with_flag(mut self, flag: Flag) -> Self {
        self.flag = Some(flag);
        self
    }

    /// Append a metadata entry.
    pub fn add_metadata(&mut self, meta: Metadata) {
        self.meta.push(meta);
    }
}

impl Positioned for Posting {
    fn position(&self) -> &Position {
        &self.pos
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        if let Some(flag) = self.flag {
            write!(f, "{flag} ")?;
        }
        write!(f, "{}", self.account)?;
        if let Some(amount) = &self.amount {
            write!(f, "  {amount}")?;
        }
        if let Some(cost) = &self.cost {
            write!(f, " {cost}")?;
        }
        if let Some(price) = &self.price {
            write!(f, " {price}")?;
        }
        Ok(())
    }
}

/// A transaction directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Position of the date.
    pub pos: Position,
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction flag.
    pub flag: Flag,
    /// Payee, when two strings were given.
    pub payee: Option<RawString>,
    /// Narration.
    pub narration: RawString,
    /// Tags in order of first occurrence, without `#`.
    pub tags: Vec<InternedStr>,
    /// Links in order of first occurrence, without `^`.
    pub links: Vec<InternedStr>,
    /// Transaction metadata.
    pub meta: Vec<Metadata>,
    /// Postings.
    pub postings: Vec<Posting>,
    /// Comment trailing the header line.
    pub comment: Option<Comment>,
}

impl Transaction {
    /// Create a transaction without postings.
    #[must_use]
    pub fn new(pos: Position, date: NaiveDate, flag: Flag, narration: RawString) -> Self {
        Self {
            pos,
            date,
            flag,
            payee: None,
            narration,
            tags: Vec::new(),
            links: Vec::new(),
            meta: Vec::new(),
            postings: Vec::new(),
            comment: None,
        }
    }

    /// Check whether the transaction carries a tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.as_str() == tag)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_date(self.date), self.flag)?;
        if let Some(payee) = &self.payee {
            write!(f, " {}", payee.quoted())?;
        }
        write!(f, " {}", self.narration.quoted())?;
        for tag in &self.tags {
            write!(f, " #{tag}")?;
        }
        for link in &self.links {
            write!(f, " ^{link}")?;
        }
        for posting in &self.postings {
            write!(f, "\n{posting}")?;
        }
        Ok(())
    }
}

/// A balance assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Position of the date.
    pub pos: Position,
    /// Assertion date.
    pub date: NaiveDate,
    /// Account to check.
    pub account: InternedStr,
    /// Expected amount.
    pub amount: Amount,
    /// Explicit tolerance (`~ 0.01`).
    pub tolerance: Option<RawNumber>,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

/// An open account directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Open {
    /// Position of the date.
    pub pos: Position,
    /// Opening date.
    pub date: NaiveDate,
    /// Account name.
    pub account: InternedStr,
    /// Allowed currencies (empty means any).
    pub currencies: Vec<InternedStr>,
    /// Booking method name (e.g. "FIFO"), recorded for the ledger.
    pub booking: Option<RawString>,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

impl Open {
    /// Create an open directive.
    #[must_use]
    pub fn new(pos: Position, date: NaiveDate, account: impl Into<InternedStr>) -> Self {
        Self {
            pos,
            date,
            account: account.into(),
            currencies: Vec::new(),
            booking: None,
            meta: Vec::new(),
            comment: None,
        }
    }
}

/// A close account directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Close {
    /// Position of the date.
    pub pos: Position,
    /// Closing date.
    pub date: NaiveDate,
    /// Account name.
    pub account: InternedStr,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

impl Close {
    /// Create a close directive.
    #[must_use]
    pub fn new(pos: Position, date: NaiveDate, account: impl Into<InternedStr>) -> Self {
        Self {
            pos,
            date,
            account: account.into(),
            meta: Vec::new(),
            comment: None,
        }
    }
}

/// A commodity declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    /// Position of the date.
    pub pos: Position,
    /// Declaration date.
    pub date: NaiveDate,
    /// Currency code.
    pub currency: InternedStr,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

/// A pad directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pad {
    /// Position of the date.
    pub pos: Position,
    /// Pad date.
    pub date: NaiveDate,
    /// Account to pad.
    pub account: InternedStr,
    /// Account the padding is drawn from.
    pub source_account: InternedStr,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

/// A note attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Position of the date.
    pub pos: Position,
    /// Note date.
    pub date: NaiveDate,
    /// Account.
    pub account: InternedStr,
    /// Note text.
    pub description: RawString,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

/// A document linked to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Position of the date.
    pub pos: Position,
    /// Document date.
    pub date: NaiveDate,
    /// Account.
    pub account: InternedStr,
    /// Path to the document file.
    pub path: RawString,
    /// Tags.
    pub tags: Vec<InternedStr>,
    /// Links.
    pub links: Vec<InternedStr>,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

/// A price quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Position of the date.
    pub pos: Position,
    /// Quote date.
    pub date: NaiveDate,
    /// Commodity being priced.
    pub commodity: InternedStr,
    /// Price in another currency.
    pub amount: Amount,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

/// A named event value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Position of the date.
    pub pos: Position,
    /// Event date.
    pub date: NaiveDate,
    /// Event name (e.g. "location").
    pub name: RawString,
    /// Event value.
    pub value: RawString,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

/// A value argument of a custom directive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomValue {
    /// Quoted string.
    String(RawString),
    /// Date.
    Date(NaiveDate),
    /// `TRUE` / `FALSE`.
    Bool(bool),
    /// Number with currency.
    Amount(Amount),
    /// Bare number.
    Number(RawNumber),
    /// Account name.
    Account(InternedStr),
}

/// A user-defined directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Custom {
    /// Position of the date.
    pub pos: Position,
    /// Directive date.
    pub date: NaiveDate,
    /// Custom type name (e.g. "budget").
    pub name: RawString,
    /// Arguments.
    pub values: Vec<CustomValue>,
    /// Metadata.
    pub meta: Vec<Metadata>,
    /// Trailing comment.
    pub comment: Option<Comment>,
}

/// The capability shared by every directive: a date, a position and an
/// append-only metadata list.
pub trait Entry: Positioned {
    /// The directive date.
    fn date(&self) -> NaiveDate;
    /// Metadata in source order.
    fn meta(&self) -> &[Metadata];
    /// Append a metadata entry after the existing ones.
    fn add_metadata(&mut self, meta: Metadata);
}

macro_rules! impl_entry {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Positioned for $ty {
                fn position(&self) -> &Position {
                    &self.pos
                }
            }

            impl Entry for $ty {
                fn date(&self) -> NaiveDate {
                    self.date
                }

                fn meta(&self) -> &[Metadata] {
                    &self.meta
                }

                fn add_metadata(&mut self, meta: Metadata) {
                    self.meta.push(meta);
                }
            }
        )*
    };
}

impl_entry!(Transaction, Balance, Open, Close, Commodity, Pad, Note, Document, Price, Event, Custom);

/// Same-date ordering bucket used by [`sort_directives`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DirectivePriority {
    /// Accounts are opened before anything can reference them.
    Open = 0,
    /// Accounts are closed before later same-date directives.
    Close = 1,
    /// Everything else keeps file order.
    Other = 2,
}

/// All directive types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Transaction.
    Transaction(Transaction),
    /// Balance assertion.
    Balance(Balance),
    /// Open account.
    Open(Open),
    /// Close account.
    Close(Close),
    /// Commodity declaration.
    Commodity(Commodity),
    /// Pad.
    Pad(Pad),
    /// Note.
    Note(Note),
    /// Document.
    Document(Document),
    /// Price quote.
    Price(Price),
    /// Event.
    Event(Event),
    /// Custom directive.
    Custom(Custom),
}

impl Directive {
    fn entry(&self) -> &dyn Entry {
        match self {
            Self::Transaction(d) => d,
            Self::Balance(d) => d,
            Self::Open(d) => d,
            Self::Close(d) => d,
            Self::Commodity(d) => d,
            Self::Pad(d) => d,
            Self::Note(d) => d,
            Self::Document(d) => d,
            Self::Price(d) => d,
            Self::Event(d) => d,
            Self::Custom(d) => d,
        }
    }

    fn entry_mut(&mut self) -> &mut dyn Entry {
        match self {
            Self::Transaction(d) => d,
            Self::Balance(d) => d,
            Self::Open(d) => d,
            Self::Close(d) => d,
            Self::Commodity(d) => d,
            Self::Pad(d) => d,
            Self::Note(d) => d,
            Self::Document(d) => d,
            Self::Price(d) => d,
            Self::Event(d) => d,
            Self::Custom(d) => d,
        }
    }

    /// The trailing comment on the directive's first line.
    #[must_use]
    pub const fn comment(&self) -> Option<&Comment> {
        match self {
            Self::Transaction(d) => d.comment.as_ref(),
            Self::Balance(d) => d.comment.as_ref(),
            Self::Open(d) => d.comment.as_ref(),
            Self::Close(d) => d.comment.as_ref(),
            Self::Commodity(d) => d.comment.as_ref(),
            Self::Pad(d) => d.comment.as_ref(),
            Self::Note(d) => d.comment.as_ref(),
            Self::Document(d) => d.comment.as_ref(),
            Self::Price(d) => d.comment.as_ref(),
            Self::Event(d) => d.comment.as_ref(),
            Self::Custom(d) => d.comment.as_ref(),
        }
    }

    /// Get as a transaction, if this is one.
    #[must_use]
    pub const fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Self::Transaction(t) => Some(t),
            _ => None,
        }
    }

    /// Get as a mutable transaction, if this is one.
    pub fn as_transaction_mut(&mut self) -> Option<&mut Transaction> {
        match self {
            Self::Transaction(t) => Some(t),
            _ => None,
        }
    }

    /// Check if this is a transaction.
    #[must_use]
    pub const fn is_transaction(&self) -> bool {
        matches!(self, Self::Transaction(_))
    }

    /// The directive type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Transaction(_) => "transaction",
            Self::Balance(_) => "balance",
            Self::Open(_) => "open",
            Self::Close(_) => "close",
            Self::Commodity(_) => "commodity",
            Self::Pad(_) => "pad",
            Self::Note(_) => "note",
            Self::Document(_) => "document",
            Self::Price(_) => "price",
            Self::Event(_) => "event",
            Self::Custom(_) => "custom",
        }
    }

    /// The same-date ordering bucket.
    #[must_use]
    pub const fn priority(&self) -> DirectivePriority {
        match self {
            Self::Open(_) => DirectivePriority::Open,
            Self::Close(_) => DirectivePriority::Close,
            _ => DirectivePriority::Other,
        }
    }

    fn sort_key(&self) -> (NaiveDate, DirectivePriority) {
        (self.date(), self.priority())
    }
}

impl Positioned for Directive {
    fn position(&self) -> &Position {
        self.entry().position()
    }
}

impl Entry for Directive {
    fn date(&self) -> NaiveDate {
        self.entry().date()
    }

    fn meta(&self) -> &[Metadata] {
        self.entry().meta()
    }

    fn add_metadata(&mut self, meta: Metadata) {
        self.entry_mut().add_metadata(meta);
    }
}

/// Sort directives by date, then by [`DirectivePriority`].
///
/// The sort is stable: same-date directives in the same bucket keep their
/// file order. Input that is already ordered is left untouched without
/// sorting. Returns whether any reordering was needed.
pub fn sort_directives(directives: &mut [Directive]) -> bool {
    let ordered = directives
        .windows(2)
        .all(|pair| pair[0].sort_key() <= pair[1].sort_key());
    if ordered {
        return false;
    }
    directives.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    true
}
