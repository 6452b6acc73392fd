//! Timezone handling utilities.
//!
//! This module wraps the external IANA timezone capability: parsing zone
//! names and resolving civil (wall-clock) date-times to absolute instants
//! with a fixed DST policy.

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};

/// Parse an IANA timezone name into a [`chrono_tz::Tz`].
///
/// # Examples
///
/// ```
/// use tzwindow_core::tz::parse_tz;
///
/// let tz = parse_tz("America/Chicago").unwrap();
/// assert_eq!(tz.to_string(), "America/Chicago");
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Resolve a civil date-time in a zone to a concrete local instant.
///
/// DST policy, applied uniformly across the crate:
/// - Ambiguous times (fall back) resolve to the first occurrence.
/// - Nonexistent times (spring forward) shift forward to the next
///   wall-clock time that exists in the zone.
///
/// Total over any civil date-time chrono can represent.
pub fn resolve_local(civil: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&civil) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(first, _) => first,
        LocalResult::None => {
            // Inside a DST gap. Gaps are at most a few hours; probe
            // forward in half-hour steps until the wall clock exists.
            let mut probe = civil;
            for _ in 0..12 {
                probe += Duration::minutes(30);
                match tz.from_local_datetime(&probe) {
                    LocalResult::Single(dt) => return dt,
                    LocalResult::Ambiguous(first, _) => return first,
                    LocalResult::None => continue,
                }
            }
            // Unreachable for real tzdb data; interpret as UTC rather
            // than panic.
            tz.from_utc_datetime(&civil)
        }
    }
}

/// Format a datetime as RFC3339 with timezone offset.
pub fn format_rfc3339<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Format a UTC datetime as RFC3339 with Z suffix.
pub fn format_rfc3339_utc(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
