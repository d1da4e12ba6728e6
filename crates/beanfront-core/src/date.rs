//! Capture of `YYYY-MM-DD` date literals.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Why a date literal was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// The text is not of the shape `DDDD-DD-DD`.
    #[error("invalid date \"{0}\": expected YYYY-MM-DD")]
    Format(String),
    /// Month outside `1..=12`.
    #[error("invalid date \"{0}\": month {1} out of range")]
    Month(String, u32),
    /// Day not valid for the given month and year.
    #[error("invalid date \"{0}\": day {1} out of range")]
    Day(String, u32),
}

/// Parse a `YYYY-MM-DD` literal into a calendar date.
///
/// Leap years are respected: `2024-02-29` is accepted, `2023-02-29` is not.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateError> {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(DateError::Format(text.to_string()));
    }

    let number = |range: std::ops::Range<usize>| -> Result<u32, DateError> {
        text[range]
            .parse()
            .map_err(|_| DateError::Format(text.to_string()))
    };
    let year = number(0..4)?;
    let month = number(5..7)?;
    let day = number(8..10)?;

    if !(1..=12).contains(&month) {
        return Err(DateError::Month(text.to_string(), month));
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| DateError::Day(text.to_string(), day))
}

/// Render a date in the ledger's canonical `YYYY-MM-DD` form.
pub fn format_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let d = parse_date("2014-05-05").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2014, 5, 5).unwrap());
        assert_eq!(format_date(d), "2014-05-05");
    }

    #[test]
    fn test_leap_years() {
        assert!(parse_date("2024-02-29").is_ok());
        assert!(parse_date("2000-02-29").is_ok());
        assert_eq!(
            parse_date("2023-02-29"),
            Err(DateError::Day("2023-02-29".to_string(), 29))
        );
        assert!(parse_date("1900-02-29").is_err());
    }

    #[test]
    fn test_month_out_of_range() {
        let err = parse_date("2024-13-01").unwrap_err();
        assert_eq!(err.to_string(), "invalid date \"2024-13-01\": month 13 out of range");
        assert!(matches!(parse_date("2024-00-10"), Err(DateError::Month(_, 0))));
    }

    #[test]
    fn test_bad_shape() {
        assert!(matches!(parse_date("2024/01/01"), Err(DateError::Format(_))));
        assert!(matches!(parse_date("24-01-01"), Err(DateError::Format(_))));
    }
}
