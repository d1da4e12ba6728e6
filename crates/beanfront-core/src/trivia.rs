//! Comments and blank lines kept for round-trip formatting.
//!
//! Trivia carries no ledger semantics; the ledger never reads it.

use serde::{Deserialize, Serialize};

use crate::position::{Position, Positioned};

/// Where a comment sits relative to the surrounding code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentKind {
    /// Trailing a directive, posting or metadata line on the same line.
    Inline,
    /// On its own line.
    Standalone,
    /// On its own line and followed immediately by a blank line.
    Section,
}

/// A `;` comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comment {
    /// Where the `;` is.
    pub pos: Position,
    /// Comment text including the leading `;`.
    pub content: String,
    /// Placement of the comment.
    pub kind: CommentKind,
}

impl Comment {
    /// Create a comment.
    #[must_use]
    pub fn new(pos: Position, content: impl Into<String>, kind: CommentKind) -> Self {
        Self {
            pos,
            content: content.into(),
            kind,
        }
    }

    /// Comment text without the `;` markers and surrounding whitespace.
    pub fn text(&self) -> &str {
        self.content.trim_start_matches(';').trim()
    }
}

impl Positioned for Comment {
    fn position(&self) -> &Position {
        &self.pos
    }
}

/// An empty (or whitespace-only) source line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlankLine {
    /// Start of the blank line.
    pub pos: Position,
}

impl Positioned for BlankLine {
    fn position(&self) -> &Position {
        &self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_text() {
        let c = Comment::new(Position::default(), ";; Section: food", CommentKind::Section);
        assert_eq!(c.text(), "Section: food");
    }
}
