//! Calendar dates and ages
//!
//! Every stored date is a plain calendar date rendered as `YYYY-MM-DD`.

use chrono::{Local, NaiveDate};

use super::DomainError;

/// Storage and wire format for dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
///
/// Only the canonical zero-padded form is accepted, so formatting the
/// result reproduces the input exactly.
pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
    let date = NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| DomainError::MalformedDate(s.to_string()))?;

    if format_date(date) != s {
        return Err(DomainError::MalformedDate(s.to_string()));
    }

    Ok(date)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's date in the farm's local time zone
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Whole days from `reference_date` to `as_of`.
///
/// Negative when `reference_date` lies in the future; callers treat that
/// as "not yet born".
pub fn age_in_days(reference_date: NaiveDate, as_of: NaiveDate) -> i64 {
    as_of.signed_duration_since(reference_date).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_age_same_day_is_zero() {
        let d = date("2024-03-10");
        assert_eq!(age_in_days(d, d), 0);
    }

    #[test]
    fn test_age_one_week() {
        let d = date("2024-03-10");
        assert_eq!(age_in_days(d, d + Duration::days(7)), 7);
    }

    #[test]
    fn test_age_negative_for_future_reference() {
        assert_eq!(age_in_days(date("2024-03-10"), date("2024-03-07")), -3);
    }

    #[test]
    fn test_age_monotonic_in_as_of() {
        let dob = date("2023-12-30");
        let mut previous = i64::MIN;
        for offset in 0..400 {
            let age = age_in_days(dob, dob + Duration::days(offset));
            assert!(age > previous);
            previous = age;
        }
    }

    #[test]
    fn test_age_across_leap_day() {
        assert_eq!(age_in_days(date("2024-02-28"), date("2024-03-01")), 2);
        assert_eq!(age_in_days(date("2023-02-28"), date("2023-03-01")), 1);
    }

    #[test]
    fn test_format_then_parse_is_identity() {
        for s in ["2024-01-01", "2024-02-29", "1999-12-31", "2030-07-04"] {
            assert_eq!(format_date(date(s)), s);
        }
    }

    #[test]
    fn test_malformed_dates_rejected() {
        for bad in ["", "2024/01/01", "01-01-2024", "2024-1-5", "2024-02-30", "2024-01-01T00:00"] {
            assert!(
                matches!(parse_date(bad), Err(DomainError::MalformedDate(_))),
                "expected {bad:?} to be rejected"
            );
        }
    }
}
