//! Weekly boundary calculation.
//!
//! A boundary is the occurrence of a weekly anchor (weekday + hour) nearest
//! to a local instant. Candidates are built in civil time and shifted by
//! whole civil weeks, never by fixed 168-hour blocks, so the returned wall
//! clock is always exactly `hour:00:00` on the anchor weekday even when a
//! DST transition changes how long that week really was.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime};
use chrono_tz::Tz;

use crate::models::AnchorPoint;
use crate::tz::resolve_local;

/// The anchor occurrence within the Monday-based week of `local`.
///
/// `hour` is validated to 0-23 at config load, so `and_hms_opt` cannot
/// fail here.
fn anchor_in_week(local: &DateTime<Tz>, anchor: AnchorPoint) -> NaiveDateTime {
    let date = local.date_naive();
    let offset = anchor.weekday.num_days_from_monday() as i64
        - date.weekday().num_days_from_monday() as i64;
    (date + Duration::days(offset))
        .and_hms_opt(anchor.hour, 0, 0)
        .unwrap()
}

/// Earliest occurrence of `anchor` at or after `local`.
///
/// Inclusive: if `local` is exactly on the boundary, that boundary is
/// returned rather than the one a week later. Total; no error path.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Weekday};
/// use tzwindow_core::boundary::next_boundary;
/// use tzwindow_core::models::AnchorPoint;
/// use tzwindow_core::tz::parse_tz;
///
/// let tz = parse_tz("UTC").unwrap();
/// // Monday 2024-04-01 10:00, anchor Monday 12:00: same-day boundary.
/// let local = tz.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).single().unwrap();
/// let boundary = next_boundary(local, AnchorPoint::new(Weekday::Mon, 12));
/// assert_eq!(boundary, tz.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).single().unwrap());
/// ```
pub fn next_boundary(local: DateTime<Tz>, anchor: AnchorPoint) -> DateTime<Tz> {
    let tz = local.timezone();
    let candidate = resolve_local(anchor_in_week(&local, anchor), tz);
    if candidate >= local {
        candidate
    } else {
        resolve_local(anchor_in_week(&local, anchor) + Duration::days(7), tz)
    }
}

/// Latest occurrence of `anchor` at or before `local`.
///
/// Inclusive on an exact hit, mirroring [`next_boundary`].
pub fn most_recent_boundary(local: DateTime<Tz>, anchor: AnchorPoint) -> DateTime<Tz> {
    let tz = local.timezone();
    let candidate = resolve_local(anchor_in_week(&local, anchor), tz);
    if candidate <= local {
        candidate
    } else {
        resolve_local(anchor_in_week(&local, anchor) - Duration::days(7), tz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    use crate::tz::{format_rfc3339, parse_tz};

    fn chicago() -> Tz {
        parse_tz("America/Chicago").unwrap()
    }

    fn chicago_local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Tz> {
        chicago().with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap()
    }

    #[test]
    fn next_boundary_same_week() {
        // Sunday 2024-03-03 10:00, anchor Sunday 12:00: later the same day.
        let local = chicago_local(2024, 3, 3, 10);
        let boundary = next_boundary(local, AnchorPoint::new(Weekday::Sun, 12));
        assert_eq!(format_rfc3339(&boundary), "2024-03-03T12:00:00-06:00");
    }

    #[test]
    fn next_boundary_wraps_to_next_week() {
        // Sunday 2024-03-03 13:00, anchor Sunday 12:00: already passed,
        // next occurrence is the following Sunday, after spring forward.
        let local = chicago_local(2024, 3, 3, 13);
        let boundary = next_boundary(local, AnchorPoint::new(Weekday::Sun, 12));
        assert_eq!(format_rfc3339(&boundary), "2024-03-10T12:00:00-05:00");
    }

    #[test]
    fn next_boundary_exact_hit_is_inclusive() {
        let local = chicago_local(2024, 3, 12, 12);
        let boundary = next_boundary(local, AnchorPoint::new(Weekday::Tue, 12));
        assert_eq!(boundary, local);
    }

    #[test]
    fn most_recent_boundary_same_week() {
        // Wednesday 2024-03-06, anchor Tuesday 12:00: the day before.
        let local = chicago_local(2024, 3, 6, 9);
        let boundary = most_recent_boundary(local, AnchorPoint::new(Weekday::Tue, 12));
        assert_eq!(format_rfc3339(&boundary), "2024-03-05T12:00:00-06:00");
    }

    #[test]
    fn most_recent_boundary_wraps_to_previous_week() {
        // Monday 2024-03-11 09:00, anchor Tuesday 12:00: previous Tuesday.
        let local = chicago_local(2024, 3, 11, 9);
        let boundary = most_recent_boundary(local, AnchorPoint::new(Weekday::Tue, 12));
        assert_eq!(format_rfc3339(&boundary), "2024-03-05T12:00:00-06:00");
    }

    #[test]
    fn most_recent_boundary_exact_hit_is_inclusive() {
        let local = chicago_local(2024, 3, 12, 12);
        let boundary = most_recent_boundary(local, AnchorPoint::new(Weekday::Tue, 12));
        assert_eq!(boundary, local);
    }

    #[test]
    fn week_shift_preserves_wall_clock_across_spring_forward() {
        // Anchor Sunday 12:00. The week containing 2024-03-10 is only
        // 167 real hours long; the boundary must stay at 12:00 wall clock.
        let before = chicago_local(2024, 3, 3, 13);
        let after = next_boundary(before, AnchorPoint::new(Weekday::Sun, 12));
        assert_eq!(format_rfc3339(&after), "2024-03-10T12:00:00-05:00");
        // 167 hours elapsed, not 168.
        assert_eq!(
            after.signed_duration_since(chicago_local(2024, 3, 3, 12)),
            Duration::hours(167)
        );
    }

    #[test]
    fn week_shift_preserves_wall_clock_across_fall_back() {
        // Fall back 2024-11-03: the week is 169 real hours long.
        let before = chicago_local(2024, 10, 27, 13);
        let after = next_boundary(before, AnchorPoint::new(Weekday::Sun, 12));
        assert_eq!(format_rfc3339(&after), "2024-11-03T12:00:00-06:00");
        assert_eq!(
            after.signed_duration_since(chicago_local(2024, 10, 27, 12)),
            Duration::hours(169)
        );
    }

    #[test]
    fn anchor_on_sunday_from_monday_looks_back_six_days() {
        // Monday-based weeks place Sunday at the end: from a Monday, the
        // most recent Sunday anchor is the day before.
        let local = chicago_local(2024, 3, 11, 15);
        let boundary = most_recent_boundary(local, AnchorPoint::new(Weekday::Sun, 12));
        assert_eq!(format_rfc3339(&boundary), "2024-03-10T12:00:00-05:00");
    }
}
