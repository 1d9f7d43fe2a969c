//! Serializes transaction timestamps in the backend's local date-time format.
//!
//! The backend stores timestamps without an offset and writes them as ISO
//! 8601 local date-times, e.g. "2024-01-15T10:30:00", optionally followed by
//! a fraction of a second.

use serde::{Deserialize, Deserializer, Serializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::Error;

/// Date-time format written to the backend, e.g. "2024-01-15T10:30:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Date-time format read from the backend, with an optional fraction of a second.
const DATE_TIME_PARSE_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);

/// Plain date format, e.g. "2024-01-15".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The current time in UTC, used to stamp new transactions.
pub fn current_transaction_date() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();

    PrimitiveDateTime::new(now.date(), now.time())
}

/// Format a transaction timestamp the way the backend expects it.
pub fn format_transaction_date(date_time: &PrimitiveDateTime) -> Result<String, Error> {
    date_time
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDate(error.to_string(), date_time.to_string()))
}

/// Parse a transaction timestamp.
///
/// Accepts either a full local date-time, e.g. "2024-01-15T10:30:00", or a
/// plain date, e.g. "2024-01-15", which is taken to mean midnight.
///
/// # Errors
///
/// Returns an [Error::InvalidDate] if `text` matches neither format.
pub fn parse_transaction_date(text: &str) -> Result<PrimitiveDateTime, Error> {
    let text = text.trim();

    if let Ok(date_time) = PrimitiveDateTime::parse(text, DATE_TIME_PARSE_FORMAT) {
        return Ok(date_time);
    }

    Date::parse(text, DATE_FORMAT)
        .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
        .map_err(|error| Error::InvalidDate(error.to_string(), text.to_owned()))
}

pub(crate) fn serialize<S>(date_time: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = date_time
        .format(DATE_TIME_FORMAT)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    PrimitiveDateTime::parse(&s, DATE_TIME_PARSE_FORMAT).map_err(serde::de::Error::custom)
}
