//! Display time handling.
//!
//! Event times are shown either as a full ISO 8601 instant in the site
//! timezone, with centisecond precision (`2024-05-01T14:00:00.00+02:00`), or
//! as the bare date when the author chose not to show the time of day.

use std::fmt;

use chrono::{DateTime, TimeZone, Timelike};
use chrono_tz::Tz;
use thiserror::Error;

use crate::event::EventTime;

/// Default display timezone.
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";

/// Errors raised while resolving a display timezone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The name is not a known IANA timezone.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Resolves an IANA timezone name such as `Europe/Paris`.
pub fn parse_timezone(name: &str) -> Result<Tz, TimeError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| TimeError::UnknownTimezone(name.to_string()))
}

/// Formats an instant as ISO 8601 with exactly two fractional digits.
///
/// Sub-centisecond precision is truncated, not rounded.
pub fn format_iso8601_centis<Z>(dt: &DateTime<Z>) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    let centis = (dt.nanosecond() / 10_000_000).min(99);
    format!(
        "{}.{:02}{}",
        dt.format("%Y-%m-%dT%H:%M:%S"),
        centis,
        dt.format("%:z")
    )
}

/// Renders an event time for display.
///
/// With `show_time`, instants are moved into `tz` and printed with
/// [`format_iso8601_centis`]. Otherwise, and for date-only values, only the
/// date as published is kept.
pub fn display_time(time: &EventTime, show_time: bool, tz: &Tz) -> String {
    match time {
        EventTime::DateTime(dt) if show_time => format_iso8601_centis(&dt.with_timezone(tz)),
        other => other.date().format("%Y-%m-%d").to_string(),
    }
}
