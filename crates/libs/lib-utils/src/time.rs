//! # Time Utilities
//!
//! Utilities for time formatting and manipulation using chrono.

use chrono::{DateTime, TimeZone, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Current unix timestamp in seconds.
pub fn unix_now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

/// Format time as RFC3339 string.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339()
}

/// Convert a unix timestamp in seconds (as reported by the ledger) to UTC.
pub fn from_unix(secs: u64) -> Result<DateTime<Utc>, Error> {
    Utc.timestamp_opt(secs as i64, 0)
        .single()
        .ok_or(Error::TimestampOutOfRange(secs))
}

/// Format how long ago a moment was, relative to `now`.
///
/// Mirrors the dashboard display: "just now" under a minute, then
/// minute/hour/day granularity.
pub fn format_relative(moment: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - moment).num_seconds().max(0);
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    TimestampOutOfRange(u64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
