//! Source positions attached to syntax tree nodes.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::intern::InternedStr;

/// A location in a source file.
///
/// `line` and `column` are 1-based; columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Name of the file the node came from (diagnostics only).
    pub filename: InternedStr,
    /// Byte offset from the start of the buffer.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub fn new(filename: impl Into<InternedStr>, offset: usize, line: usize, column: usize) -> Self {
        Self {
            filename: filename.into(),
            offset,
            line,
            column,
        }
    }

    /// Compare two positions by file order: line, then column, then offset.
    ///
    /// File names are ignored; positions from different files have no
    /// meaningful order.
    #[must_use]
    pub fn file_order(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
            .then(self.offset.cmp(&other.offset))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new("<input>", 0, 1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// Anything that originates at a source position.
pub trait Positioned {
    /// The position where this node starts.
    fn position(&self) -> &Position;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let pos = Position::new("main.beancount", 10, 3, 5);
        assert_eq!(pos.to_string(), "main.beancount:3:5");
    }

    #[test]
    fn test_file_order() {
        let a = Position::new("f", 0, 1, 1);
        let b = Position::new("f", 12, 2, 1);
        let c = Position::new("f", 14, 2, 3);
        assert_eq!(a.file_order(&b), Ordering::Less);
        assert_eq!(c.file_order(&b), Ordering::Greater);
        assert_eq!(b.file_order(&b.clone()), Ordering::Equal);
    }
}
