//! Argument parsers for times and dates given on the command line.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Current local wall-clock time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse `HH:MM`.
pub fn time_of_day(value: &str) -> Result<NaiveTime, String> {
    taskboard_core::storage::parse_time_of_day(value)
        .ok_or_else(|| format!("invalid time '{value}', expected HH:MM"))
}

/// Parse `YYYY-MM-DD`.
pub fn date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{value}', expected YYYY-MM-DD"))
}

/// Parse `YYYY-MM-DD HH:MM` (a `T` separator and seconds are accepted).
pub fn datetime(value: &str) -> Result<NaiveDateTime, String> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| format!("invalid datetime '{value}', expected YYYY-MM-DD HH:MM"))
}
