//! Byte ranges in the source buffer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A span in the source, represented as a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span at `offset`.
    #[must_use]
    pub const fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The bytes this span covers, clamped to the buffer.
    #[must_use]
    pub fn bytes<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        let end = self.end.min(source.len());
        &source[self.start.min(end)..end]
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_and_point() {
        assert_eq!(Span::new(2, 5).len(), 3);
        assert!(Span::point(7).is_empty());
        assert_eq!(Range::from(Span::new(4, 9)), 4..9);
    }

    #[test]
    fn test_bytes_clamped() {
        let src = b"abcdef";
        assert_eq!(Span::new(1, 3).bytes(src), b"bc");
        assert_eq!(Span::new(4, 40).bytes(src), b"ef");
        assert_eq!(Span::new(40, 50).bytes(src), b"");
    }
}
