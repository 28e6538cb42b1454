//! Date/time helpers.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// SQLite `datetime('now')` format.
const SQLITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a database timestamp (UTC, `YYYY-MM-DD HH:MM:SS`) or RFC 3339 string.
pub fn parse_db_datetime(datetime_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(datetime_str) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(datetime_str, SQLITE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Convert a database timestamp to RFC 3339 for API responses.
///
/// Unparseable input is returned unchanged.
pub fn to_rfc3339(datetime_str: &str) -> String {
    match parse_db_datetime(datetime_str) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
        None => datetime_str.to_string(),
    }
}
