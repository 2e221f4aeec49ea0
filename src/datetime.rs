//! Date/time utilities for Etsin.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Timezone used when a configured zone name cannot be resolved.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Helsinki;

/// Formats accepted for timestamps without an offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Resolve an IANA timezone name, falling back to Europe/Helsinki.
pub fn resolve_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!(timezone = name, "Unknown timezone, using Europe/Helsinki");
        DEFAULT_TIMEZONE
    })
}

/// Parse a catalog timestamp.
///
/// # Arguments
///
/// * `value` - RFC 3339 timestamp, naive date-time, or bare `YYYY-MM-DD` date
/// * `tz` - Timezone for values that carry no offset
///
/// # Returns
///
/// The instant in UTC, or `None` if the value cannot be parsed.
pub fn parse_timestamp(value: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        // Repeated wall-clock hour at DST end: take the earlier instant.
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        // Skipped wall-clock hour at DST start.
        LocalResult::None => None,
    }
}

/// Whether `value` lies strictly before `now`.
///
/// Unparseable values are never in the past.
pub fn is_before(value: &str, now: DateTime<Utc>, tz: Tz) -> bool {
    parse_timestamp(value, tz).is_some_and(|dt| dt < now)
}
