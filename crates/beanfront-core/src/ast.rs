//! The top-level syntax tree of one source buffer.
//!
//! [`Ast::directives`] is the only date-sorted collection; every other
//! collection keeps file order.

use serde::{Deserialize, Serialize};

use crate::directive::Directive;
use crate::fidelity::RawString;
use crate::intern::InternedStr;
use crate::metadata::MetaValue;
use crate::position::{Position, Positioned};
use crate::trivia::{BlankLine, Comment};

/// `option "name" "value"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDirective {
    /// Position of the keyword.
    pub pos: Position,
    /// Option name.
    pub name: RawString,
    /// Option value (not interpreted).
    pub value: RawString,
}

/// `include "path"`. Resolution is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Include {
    /// Position of the keyword.
    pub pos: Position,
    /// Path as written.
    pub filename: RawString,
}

/// `plugin "module" ["config"]`. Plugins are recorded, never run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Position of the keyword.
    pub pos: Position,
    /// Plugin module name.
    pub name: RawString,
    /// Optional configuration string.
    pub config: Option<RawString>,
}

/// `pushtag #tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pushtag {
    /// Position of the keyword.
    pub pos: Position,
    /// Tag, without `#`.
    pub tag: InternedStr,
}

/// `poptag #tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poptag {
    /// Position of the keyword.
    pub pos: Position,
    /// Tag, without `#`.
    pub tag: InternedStr,
}

/// `pushmeta key: value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pushmeta {
    /// Position of the keyword.
    pub pos: Position,
    /// Metadata key.
    pub key: InternedStr,
    /// Metadata value.
    pub value: MetaValue,
}

/// `popmeta key:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popmeta {
    /// Position of the keyword.
    pub pos: Position,
    /// Metadata key.
    pub key: InternedStr,
}

macro_rules! impl_positioned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Positioned for $ty {
                fn position(&self) -> &Position {
                    &self.pos
                }
            }
        )*
    };
}

impl_positioned!(OptionDirective, Include, Plugin, Pushtag, Poptag, Pushmeta, Popmeta);

/// The parsed content of one source buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ast {
    /// Dated directives, chronologically sorted after parsing.
    pub directives: Vec<Directive>,
    /// `option` lines.
    pub options: Vec<OptionDirective>,
    /// `include` lines.
    pub includes: Vec<Include>,
    /// `plugin` lines.
    pub plugins: Vec<Plugin>,
    /// `pushtag` lines.
    pub pushtags: Vec<Pushtag>,
    /// `poptag` lines.
    pub poptags: Vec<Poptag>,
    /// `pushmeta` lines.
    pub pushmetas: Vec<Pushmeta>,
    /// `popmeta` lines.
    pub popmetas: Vec<Popmeta>,
    /// Comment trivia: standalone and section comments, plus trailing
    /// comments on lines whose node has no comment field.
    pub comments: Vec<Comment>,
    /// Blank lines.
    pub blank_lines: Vec<BlankLine>,
}

impl Ast {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether nothing at all was parsed (trivia included).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
            && self.options.is_empty()
            && self.includes.is_empty()
            && self.plugins.is_empty()
            && self.pushtags.is_empty()
            && self.poptags.is_empty()
            && self.pushmetas.is_empty()
            && self.popmetas.is_empty()
            && self.comments.is_empty()
            && self.blank_lines.is_empty()
    }

    /// Number of directives of the given type name (see
    /// [`Directive::type_name`]).
    #[must_use]
    pub fn count(&self, type_name: &str) -> usize {
        self.directives
            .iter()
            .filter(|d| d.type_name() == type_name)
            .count()
    }

    /// Transactions in directive order.
    pub fn transactions(&self) -> impl Iterator<Item = &crate::Transaction> {
        self.directives.iter().filter_map(Directive::as_transaction)
    }

    /// Directives and push/pop markers together, in file order.
    #[must_use]
    pub fn positioned(&self) -> Vec<&dyn Positioned> {
        let mut items: Vec<&dyn Positioned> = Vec::with_capacity(
            self.directives.len()
                + self.pushtags.len()
                + self.poptags.len()
                + self.pushmetas.len()
                + self.popmetas.len(),
        );
        items.extend(self.directives.iter().map(|d| d as &dyn Positioned));
        items.extend(self.pushtags.iter().map(|p| p as &dyn Positioned));
        items.extend(self.poptags.iter().map(|p| p as &dyn Positioned));
        items.extend(self.pushmetas.iter().map(|p| p as &dyn Positioned));
        items.extend(self.popmetas.iter().map(|p| p as &dyn Positioned));
        items.sort_by(|a, b| a.position().file_order(b.position()));
        items
    }
}
