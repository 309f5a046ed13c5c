//! Calendar date parsing and formatting.
//!
//! Watering events are plain calendar dates with no time of day and no
//! timezone. The only accepted text form is ISO 8601 `YYYY-MM-DD`.

use chrono::NaiveDate;

use crate::error::{PlantsError, Result};

/// The one date format used on input and output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO `YYYY-MM-DD` date.
///
/// Surrounding whitespace is ignored. Anything else (timestamps, other
/// orderings, impossible days) is a [`PlantsError::MalformedDate`].
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    // chrono accepts unpadded fields; require the canonical 10-char form.
    if trimmed.len() != 10 {
        return Err(PlantsError::malformed_date(value));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| PlantsError::malformed_date(value))
}

/// Parse a whole sequence, failing on the first malformed entry.
pub fn parse_dates<S: AsRef<str>>(values: &[S]) -> Result<Vec<NaiveDate>> {
    values.iter().map(|v| parse_date(v.as_ref())).collect()
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date("2023-01-05").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_date_trims_whitespace() {
        let date = parse_date("  2023-01-05\n").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        for bad in ["", "yesterday", "2023-13-01", "2023-02-30", "05/01/2023", "2023-1-5"] {
            let err = parse_date(bad).unwrap_err();
            assert!(
                matches!(err, PlantsError::MalformedDate { .. }),
                "expected malformed date for {bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_date_rejects_timestamp() {
        assert!(parse_date("2023-01-05T10:00:00Z").is_err());
    }

    #[test]
    fn test_parse_dates_fails_whole_sequence() {
        let err = parse_dates(&["2023-01-01", "nope", "2023-01-10"]).unwrap_err();
        match err {
            PlantsError::MalformedDate { value } => assert_eq!(value, "nope"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_date(date), "2024-03-09");
    }
}
