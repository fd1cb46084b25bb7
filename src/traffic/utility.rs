use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};

use crate::traffic::types::{MINUTES_PER_DAY, MinuteOfDay};

/// Timestamp layouts accepted in trip exports, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parses a trip timestamp into its wall-clock date and time.
///
/// RFC 3339 values keep the local time as written; the offset is discarded.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("empty timestamp");
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .with_context(|| format!("unrecognized timestamp '{raw}'"))
}

/// Minutes elapsed since midnight, seconds truncated.
pub fn minutes_since_midnight(moment: &NaiveDateTime) -> MinuteOfDay {
    (moment.hour() * 60 + moment.minute()) as MinuteOfDay
}

/// Formats a minute-of-day the way the slider label shows it, e.g. `5:30 PM`.
pub fn format_time(minute: MinuteOfDay) -> String {
    let minute = u32::from(minute) % MINUTES_PER_DAY as u32;
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}
