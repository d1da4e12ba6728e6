//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Options for one parse.
///
/// Every field has a default, so partial configurations deserialize:
///
/// ```
/// use beanfront_parser::ParseOptions;
///
/// let options: ParseOptions = serde_json::from_str(r#"{"filename": "main.beancount"}"#).unwrap();
/// assert_eq!(options.filename, "main.beancount");
/// assert!(options.sort);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Name used in positions and diagnostics.
    pub filename: String,
    /// Source lines shown above an error.
    pub context_before: usize,
    /// Source lines shown below an error.
    pub context_after: usize,
    /// Sort directives chronologically after parsing.
    pub sort: bool,
    /// Apply `pushtag`/`pushmeta` scopes to directives.
    pub propagate: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            filename: "<input>".to_string(),
            context_before: 2,
            context_after: 1,
            sort: true,
            propagate: true,
        }
    }
}

impl ParseOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file name.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set the snippet context size.
    #[must_use]
    pub const fn with_context(mut self, before: usize, after: usize) -> Self {
        self.context_before = before;
        self.context_after = after;
        self
    }

    /// Enable or disable the chronological sort.
    #[must_use]
    pub const fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Enable or disable tag and metadata propagation.
    #[must_use]
    pub const fn with_propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }
}
