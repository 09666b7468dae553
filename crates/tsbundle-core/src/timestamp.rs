//! Timestamp parsing and newest-first ordering.

use std::cmp::Reverse;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// Parses an ISO-8601 style timestamp.
///
/// Accepts RFC 3339, date-times with a `T` or a space separator and an
/// optional fraction, and bare dates. Values without an offset are taken
/// as UTC.
///
/// # Examples
///
/// ```
/// use tsbundle_core::timestamp::parse_timestamp;
///
/// let a = parse_timestamp("2024-03-01T10:00:00Z").unwrap();
/// let b = parse_timestamp("2024-03-01 10:00:00").unwrap();
/// assert_eq!(a, b);
/// assert!(parse_timestamp("Unknown Timestamp").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Sorts `records` newest first by the timestamp `key` returns.
///
/// The sort is stable. Records whose timestamp does not parse are moved
/// after every parseable one, in their original order, and their
/// timestamps are returned.
pub fn sort_newest_first<T, F>(records: &mut Vec<T>, key: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    let mut keyed: Vec<(Option<DateTime<Utc>>, T)> = records
        .drain(..)
        .map(|record| (parse_timestamp(key(&record)), record))
        .collect();

    let unparseable = keyed
        .iter()
        .filter(|(parsed, _)| parsed.is_none())
        .map(|(_, record)| key(record).to_string())
        .collect();

    // `None` orders below every `Some`, so reversing puts it last
    keyed.sort_by_key(|(parsed, _)| Reverse(*parsed));
    records.extend(keyed.into_iter().map(|(_, record)| record));
    unparseable
}
