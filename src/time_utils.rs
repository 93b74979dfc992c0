// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time parsing and formatting.
//!
//! Training timestamps arrive in one of a small set of textual layouts. They are
//! tried in order and the first layout that consumes the whole token wins.
//! Timestamps without an offset are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Accepted timestamp layouts, in match order.
pub const TIMESTAMP_FORMATS: [&str; 2] = [
    // 2024-05-01T10:00:00.000+00:00
    "%Y-%m-%dT%H:%M:%S%.3f+00:00",
    // 2024-05-01T10:00:00
    "%Y-%m-%dT%H:%M:%S",
];

/// Layout used when emitting timestamps.
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f+00:00";

/// Calendar date layout (`yyyy-MM-dd`).
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),
}

/// Parse a timestamp against [`TIMESTAMP_FORMATS`].
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, DateParseError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateParseError::InvalidFormat(text.to_string()))
}

/// Format a UTC timestamp with millisecond precision and a `+00:00` suffix.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(OUTPUT_FORMAT).to_string()
}

/// Parse a `yyyy-MM-dd` calendar date.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| DateParseError::InvalidFormat(text.to_string()))
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Serde adapter for timestamp fields on the wire.
///
/// Serializes with [`format_timestamp`] and deserializes with
/// [`parse_timestamp`], so either accepted layout can be sent in.
pub mod timestamp_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(*timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_timestamp(&text).map_err(serde::de::Error::custom)
    }
}
