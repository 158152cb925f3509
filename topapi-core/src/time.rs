//! Protocol timestamp formatting.
//!
//! The provider expects `YYYY-MM-DD HH:MM:SS` rendered from the caller's
//! local clock, both for the `timestamp` protocol field and for time-range
//! call parameters.

use chrono::{DateTime, Local, NaiveDateTime};

/// The protocol's datetime format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders the current call time for the `timestamp` protocol field.
#[must_use]
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Renders a local datetime as a protocol parameter value.
#[must_use]
pub fn format_datetime(datetime: &DateTime<Local>) -> String {
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// Renders a naive (wall-clock) datetime as a protocol parameter value.
#[must_use]
pub fn format_naive(datetime: &NaiveDateTime) -> String {
    datetime.format(TIMESTAMP_FORMAT).to_string()
}
