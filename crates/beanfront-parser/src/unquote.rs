//! String literal unquoting.

use beanfront_core::{EscapeStyle, RawString};
use thiserror::Error;

/// A string token that could not be turned into a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StringLiteralError {
    /// The text does not start with `"`, or has content after the closing quote.
    #[error("string literal must be enclosed in double quotes")]
    NotQuoted,
    /// No closing quote before the end of the line.
    #[error("unterminated string literal")]
    Unterminated,
    /// A backslash at the very end of the literal.
    #[error("incomplete escape sequence at end of string")]
    IncompleteEscape,
    /// A backslash followed by something other than `" \ n t r`.
    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),
}

/// Turn a quoted string token into its value, keeping the original spelling.
///
/// ```
/// use beanfront_parser::unquote;
///
/// let s = unquote(r#""say \"hi\"""#).unwrap();
/// assert_eq!(s.value, "say \"hi\"");
/// assert_eq!(s.quoted(), r#""say \"hi\"""#);
/// ```
pub fn unquote(raw: &str) -> Result<RawString, StringLiteralError> {
    let inner = raw.strip_prefix('"').ok_or(StringLiteralError::NotQuoted)?;

    if !inner.contains('\\') {
        let value = inner
            .strip_suffix('"')
            .ok_or(StringLiteralError::Unterminated)?;
        if value.contains('"') {
            return Err(StringLiteralError::NotQuoted);
        }
        return Ok(RawString::new(value, raw, EscapeStyle::None));
    }

    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    loop {
        match chars.next() {
            None => return Err(StringLiteralError::Unterminated),
            Some('"') => break,
            Some('\\') => match chars.next() {
                None => return Err(StringLiteralError::IncompleteEscape),
                Some('"') => value.push('"'),
                Some('\\') => value.push('\\'),
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some(c) => return Err(StringLiteralError::UnknownEscape(c)),
            },
            Some(c) => value.push(c),
        }
    }
    if chars.next().is_some() {
        return Err(StringLiteralError::NotQuoted);
    }

    Ok(RawString::new(value, raw, EscapeStyle::CStyle))
}
