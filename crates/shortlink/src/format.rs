//! Human-readable timestamps.

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};

/// Shown in place of a timestamp that could not be parsed.
pub const INVALID_DATE: &str = "Invalid date";

/// Render a backend timestamp relative to `now`, in `now`'s time zone.
///
/// - under a day apart: `14:05`
/// - at most six days apart: `Tue 14:05`
/// - otherwise: `Mar 4, 2025`
///
/// Accepts RFC 3339 and `YYYY-MM-DD HH:MM:SS` (read as UTC).
pub fn format_timestamp<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(parsed) = parse(raw.trim()) else {
        return INVALID_DATE.to_string();
    };

    let local = parsed.with_timezone(&now.timezone());
    let age = now.clone().signed_duration_since(local.clone()).abs();

    if age < TimeDelta::days(1) {
        local.format("%H:%M").to_string()
    } else if age <= TimeDelta::days(6) {
        local.format("%a %H:%M").to_string()
    } else {
        local.format("%b %-d, %Y").to_string()
    }
}

fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
