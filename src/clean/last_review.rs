//! `last_review` parsing and rendering.
//!
//! Values are parsed leniently into a `NaiveDateTime`. Whatever cannot be
//! parsed becomes a null. On output the whole column is rendered with one
//! format: date-only when every value falls on midnight, full timestamp
//! otherwise.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a review timestamp. Blank or unrecognized input yields `None`.
pub fn parse_review_date(cell: &str) -> Option<NaiveDateTime> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(cell) {
        return Some(ts.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(cell, format) {
            return Some(ts);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(cell, format).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Render parsed values with a single column-wide format; `None` becomes an empty cell.
pub fn render_review_dates(values: &[Option<NaiveDateTime>]) -> Vec<String> {
    let date_only = values
        .iter()
        .flatten()
        .all(|ts| ts.time() == NaiveTime::MIN);
    let format = if date_only {
        "%Y-%m-%d"
    } else {
        "%Y-%m-%d %H:%M:%S"
    };

    values
        .iter()
        .map(|value| {
            value
                .map(|ts| ts.format(format).to_string())
                .unwrap_or_default()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_formats() {
        let midnight = NaiveDate::from_ymd_opt(2019, 5, 21)
            .unwrap()
            .and_time(NaiveTime::MIN);

        assert_eq!(parse_review_date("2019-05-21"), Some(midnight));
        assert_eq!(parse_review_date("05/21/2019"), Some(midnight));
        assert_eq!(parse_review_date(" 2019-05-21 "), Some(midnight));
        assert_eq!(parse_review_date("2019-05-21 00:00:00"), Some(midnight));
        assert_eq!(parse_review_date("2019-05-21T00:00:00"), Some(midnight));
        assert_eq!(parse_review_date("2019-05-21T02:00:00+02:00"), Some(midnight));
    }

    #[test]
    fn test_parse_unparseable_is_none() {
        assert_eq!(parse_review_date(""), None);
        assert_eq!(parse_review_date("yesterday"), None);
        assert_eq!(parse_review_date("2019-13-40"), None);
    }

    #[test]
    fn test_render_date_only_when_all_midnight() {
        let values = vec![
            parse_review_date("2019-05-21"),
            None,
            parse_review_date("07/01/2018"),
        ];

        assert_eq!(
            render_review_dates(&values),
            vec!["2019-05-21", "", "2018-07-01"]
        );
    }

    #[test]
    fn test_render_full_timestamp_when_any_has_time() {
        let values = vec![
            parse_review_date("2019-05-21"),
            parse_review_date("2019-05-22 13:45:00"),
        ];

        assert_eq!(
            render_review_dates(&values),
            vec!["2019-05-21 00:00:00", "2019-05-22 13:45:00"]
        );
    }
}
