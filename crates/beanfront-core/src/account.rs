//! Lexical validation of account names.
//!
//! An account is a colon-separated path such as `Assets:Bank:Checking`.
//! The first component must be one of the five root categories; every
//! further component must start with an uppercase letter or a digit and
//! may otherwise contain letters (including non-ASCII), digits and `-`.
//!
//! Whether an account is opened or usable is decided by the ledger, not
//! here.

use thiserror::Error;

/// The five root account categories.
pub const ACCOUNT_TYPES: [&str; 5] = ["Assets", "Liabilities", "Equity", "Income", "Expenses"];

/// Why an account name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// The name has no `:` separator.
    #[error("invalid account \"{0}\": must have at least two components")]
    TooFewComponents(String),
    /// The first component is not a known root category.
    #[error("unexpected account type \"{0}\"")]
    UnexpectedType(String),
    /// Two separators in a row, or a trailing separator.
    #[error("invalid account \"{0}\": empty component")]
    EmptyComponent(String),
    /// A component does not start with an uppercase letter or digit.
    #[error("invalid account component \"{0}\": must start with an uppercase letter or digit")]
    InvalidComponentStart(String),
    /// A component contains a character outside letters, digits and `-`.
    #[error("invalid character '{1}' in account component \"{0}\"")]
    InvalidCharacter(String, char),
}

/// Check whether `name` is one of the root account categories.
pub fn is_account_type(name: &str) -> bool {
    ACCOUNT_TYPES.contains(&name)
}

/// Validate an account name.
///
/// # Examples
///
/// ```
/// use beanfront_core::account::{validate_account, AccountError};
///
/// assert!(validate_account("Expenses:Café:München").is_ok());
/// assert_eq!(
///     validate_account("Foo:Bar"),
///     Err(AccountError::UnexpectedType("Foo".to_string()))
/// );
/// ```
pub fn validate_account(name: &str) -> Result<(), AccountError> {
    let mut components = name.split(':');
    let root = components.next().unwrap_or_default();

    if !name.contains(':') {
        return Err(AccountError::TooFewComponents(name.to_string()));
    }
    if !is_account_type(root) {
        return Err(AccountError::UnexpectedType(root.to_string()));
    }

    for component in components {
        let mut chars = component.chars();
        let first = match chars.next() {
            Some(c) => c,
            None => return Err(AccountError::EmptyComponent(name.to_string())),
        };
        if !(first.is_uppercase() || first.is_ascii_digit()) {
            return Err(AccountError::InvalidComponentStart(component.to_string()));
        }
        if let Some(bad) = chars.find(|c| !(c.is_alphanumeric() || *c == '-')) {
            return Err(AccountError::InvalidCharacter(component.to_string(), bad));
        }
    }

    Ok(())
}

/// The root category of a (valid) account name.
pub fn account_type(name: &str) -> Option<&str> {
    name.split(':').next().filter(|root| is_account_type(root))
}
