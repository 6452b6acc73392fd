//! Window schedule resolution.
//!
//! Pure functions deriving submission windows from an instant and a
//! tenant configuration. Dual-anchor resolution derives both anchors
//! independently instead of toggling running state, so repeated calls
//! with the same inputs are bit-identical and the schedule self-heals if
//! persisted history is lost.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::boundary::{most_recent_boundary, next_boundary};
use crate::config::{DualAnchorSchedule, FixedLengthSchedule};
use crate::models::{AnchorPoint, WindowDefinition, WindowKind, WindowSchedule};

/// Compute the `{current, next}` dual-anchor window pair at `now`.
///
/// The phase test: if the most recent night-start boundary is more recent
/// than the most recent play-end boundary, `now` is inside a Night
/// window; otherwise Daytime. The current window always satisfies
/// `current.start_at <= now < current.end_at` and
/// `next.start_at == current.end_at`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tzwindow_core::config::{DualAnchorSchedule, DEFAULT_NIGHT_START, DEFAULT_PLAY_END};
/// use tzwindow_core::models::WindowKind;
/// use tzwindow_core::schedule::compute_window_schedule;
/// use tzwindow_core::tz::parse_tz;
///
/// let tz = parse_tz("America/Chicago").unwrap();
/// let dual = DualAnchorSchedule {
///     night_start: DEFAULT_NIGHT_START,
///     play_end: DEFAULT_PLAY_END,
/// };
/// // Sunday 2024-03-10 10:00 CST, spring-forward day, before the noon anchor.
/// let now = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).single().unwrap();
/// let schedule = compute_window_schedule(now, tz, &dual);
/// assert_eq!(schedule.current.kind, Some(WindowKind::Night));
/// ```
pub fn compute_window_schedule(
    now: DateTime<Utc>,
    tz: Tz,
    schedule: &DualAnchorSchedule,
) -> WindowSchedule {
    let localized = now.with_timezone(&tz);

    let next_night_start = next_boundary(localized, schedule.night_start);
    let next_play_end = next_boundary(localized, schedule.play_end);
    let last_night_start = most_recent_boundary(localized, schedule.night_start);
    let last_play_end = most_recent_boundary(localized, schedule.play_end);

    // The next window's end is re-derived from its own start instead of
    // reusing the now-relative candidate: when `now` sits exactly on an
    // anchor, the inclusive boundary lookup would otherwise hand the next
    // window an end before its start.
    let is_night = last_night_start > last_play_end;
    let (current, next) = if is_night {
        let current = typed_window(WindowKind::Night, last_night_start, next_play_end);
        let daytime_end = next_boundary(next_play_end, schedule.night_start);
        let next = typed_window(WindowKind::Daytime, next_play_end, daytime_end);
        (current, next)
    } else {
        let current = typed_window(WindowKind::Daytime, last_play_end, next_night_start);
        let night_end = next_boundary(next_night_start, schedule.play_end);
        let next = typed_window(WindowKind::Night, next_night_start, night_end);
        (current, next)
    };

    WindowSchedule { current, next }
}

fn typed_window(kind: WindowKind, start: DateTime<Tz>, end: DateTime<Tz>) -> WindowDefinition {
    WindowDefinition {
        kind: Some(kind),
        start_at: start.with_timezone(&Utc),
        end_at: end.with_timezone(&Utc),
        label: kind.to_string(),
    }
}

/// Next anchor occurrence at or after `now`, as a UTC instant.
pub fn compute_next_anchor(now: DateTime<Utc>, tz: Tz, anchor: AnchorPoint) -> DateTime<Utc> {
    next_boundary(now.with_timezone(&tz), anchor).with_timezone(&Utc)
}

/// Fixed-length mode: the start of the next window.
///
/// With history, the previous start advances by exactly
/// `window_length_hours` of real time. This intentionally does not
/// re-anchor to a civil boundary, so chained starts drift by an hour of
/// wall clock across a DST transition while staying a fixed real-time
/// duration apart. Without history, the next anchor occurrence is used,
/// inclusive of `now` itself.
pub fn compute_next_window_start(
    latest_start: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    tz: Tz,
    schedule: &FixedLengthSchedule,
) -> DateTime<Utc> {
    match latest_start {
        Some(start) => start + Duration::hours(i64::from(schedule.window_length_hours)),
        None => compute_next_anchor(now, tz, schedule.anchor),
    }
}

/// Build the untyped window definition for a fixed-length start.
pub fn fixed_length_window(
    start_at: DateTime<Utc>,
    tz: Tz,
    schedule: &FixedLengthSchedule,
) -> WindowDefinition {
    let end_at = start_at + Duration::hours(i64::from(schedule.window_length_hours));
    WindowDefinition {
        kind: None,
        start_at,
        end_at,
        label: format!("Window {}", start_at.with_timezone(&tz).format("%Y-%m-%d")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    use crate::config::{DEFAULT_NIGHT_START, DEFAULT_PLAY_END};
    use crate::tz::{format_rfc3339_utc, parse_tz};

    fn chicago() -> Tz {
        parse_tz("America/Chicago").unwrap()
    }

    fn default_dual() -> DualAnchorSchedule {
        DualAnchorSchedule {
            night_start: DEFAULT_NIGHT_START,
            play_end: DEFAULT_PLAY_END,
        }
    }

    fn chicago_instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        chicago()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn night_window_spans_spring_forward() {
        // Sunday 2024-03-10 10:00 local, the day the clocks spring forward.
        let now = chicago_instant(2024, 3, 10, 10);
        let schedule = compute_window_schedule(now, chicago(), &default_dual());

        assert_eq!(schedule.current.kind, Some(WindowKind::Night));
        // Tue 2024-03-05 12:00 -06:00 = 18:00Z.
        assert_eq!(
            format_rfc3339_utc(&schedule.current.start_at),
            "2024-03-05T18:00:00Z"
        );
        // Sun 2024-03-10 12:00 -05:00 = 17:00Z; offset changed across the window.
        assert_eq!(
            format_rfc3339_utc(&schedule.current.end_at),
            "2024-03-10T17:00:00Z"
        );
        assert_eq!(schedule.next.kind, Some(WindowKind::Daytime));
        assert_eq!(schedule.next.start_at, schedule.current.end_at);
        // Tue 2024-03-12 12:00 -05:00 = 17:00Z.
        assert_eq!(
            format_rfc3339_utc(&schedule.next.end_at),
            "2024-03-12T17:00:00Z"
        );
    }

    #[test]
    fn daytime_window_after_spring_forward() {
        // Monday 2024-03-11 15:00 local.
        let now = chicago_instant(2024, 3, 11, 15);
        let schedule = compute_window_schedule(now, chicago(), &default_dual());

        assert_eq!(schedule.current.kind, Some(WindowKind::Daytime));
        assert_eq!(
            format_rfc3339_utc(&schedule.current.start_at),
            "2024-03-10T17:00:00Z"
        );
        assert_eq!(
            format_rfc3339_utc(&schedule.current.end_at),
            "2024-03-12T17:00:00Z"
        );
        assert_eq!(schedule.next.kind, Some(WindowKind::Night));
        assert_eq!(schedule.next.start_at, schedule.current.end_at);
    }

    #[test]
    fn exact_anchor_instant_flips_into_new_window() {
        // Exactly Tuesday 2024-03-12 12:00 -05:00: a fresh Night window
        // starting at now, not the tail of the previous one.
        let now = chicago_instant(2024, 3, 12, 12);
        let schedule = compute_window_schedule(now, chicago(), &default_dual());

        assert_eq!(schedule.current.kind, Some(WindowKind::Night));
        assert_eq!(schedule.current.start_at, now);
        // Sun 2024-03-17 12:00 -05:00.
        assert_eq!(
            format_rfc3339_utc(&schedule.current.end_at),
            "2024-03-17T17:00:00Z"
        );
        // The following Daytime window is well-formed, ending at the
        // Tuesday after it starts rather than collapsing onto now.
        assert_eq!(schedule.next.start_at, schedule.current.end_at);
        assert_eq!(
            format_rfc3339_utc(&schedule.next.end_at),
            "2024-03-19T17:00:00Z"
        );
    }

    #[test]
    fn current_window_contains_now() {
        let dual = default_dual();
        for &(y, m, d, h) in &[
            (2024, 3, 10, 10),
            (2024, 3, 11, 15),
            (2024, 3, 12, 12),
            (2024, 11, 3, 5),
            (2024, 7, 4, 23),
        ] {
            let now = chicago_instant(y, m, d, h);
            let schedule = compute_window_schedule(now, chicago(), &dual);
            assert!(
                schedule.current.start_at <= now && now < schedule.current.end_at,
                "window {:?} does not contain {}",
                schedule.current,
                now
            );
            assert_eq!(schedule.next.start_at, schedule.current.end_at);
            assert!(schedule.current.start_at < schedule.current.end_at);
            assert!(schedule.next.start_at < schedule.next.end_at);
        }
    }

    #[test]
    fn schedule_is_deterministic() {
        let now = chicago_instant(2024, 3, 10, 10);
        let first = compute_window_schedule(now, chicago(), &default_dual());
        let second = compute_window_schedule(now, chicago(), &default_dual());
        assert_eq!(first, second);
    }

    #[test]
    fn next_anchor_before_and_after_anchor_hour() {
        let utc = parse_tz("UTC").unwrap();
        let anchor = AnchorPoint::new(Weekday::Mon, 12);

        // Monday 2024-04-01 10:00Z: the anchor later that day.
        let before = Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).single().unwrap();
        assert_eq!(
            format_rfc3339_utc(&compute_next_anchor(before, utc, anchor)),
            "2024-04-01T12:00:00Z"
        );

        // Monday 2024-04-01 13:00Z: next week's anchor.
        let after = Utc.with_ymd_and_hms(2024, 4, 1, 13, 0, 0).single().unwrap();
        assert_eq!(
            format_rfc3339_utc(&compute_next_anchor(after, utc, anchor)),
            "2024-04-08T12:00:00Z"
        );
    }

    #[test]
    fn chained_start_advances_by_fixed_duration() {
        let utc = parse_tz("UTC").unwrap();
        let schedule = FixedLengthSchedule {
            anchor: AnchorPoint::new(Weekday::Mon, 12),
            window_length_hours: 24,
        };
        let latest = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).single().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).single().unwrap();
        let next = compute_next_window_start(Some(latest), now, utc, &schedule);
        assert_eq!(format_rfc3339_utc(&next), "2024-04-02T12:00:00Z");
    }

    #[test]
    fn chained_start_ignores_civil_boundaries_across_dst() {
        // 168 real hours across the 2024-03-10 spring forward: the wall
        // clock drifts from 12:00 CST to 13:00 CDT by design.
        let schedule = FixedLengthSchedule {
            anchor: AnchorPoint::new(Weekday::Sun, 12),
            window_length_hours: 168,
        };
        let latest = chicago_instant(2024, 3, 3, 12);
        let now = chicago_instant(2024, 3, 11, 9);
        let next = compute_next_window_start(Some(latest), now, chicago(), &schedule);
        assert_eq!(next, latest + Duration::hours(168));
        assert_eq!(
            next.with_timezone(&chicago())
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            "2024-03-10 13:00"
        );
    }

    #[test]
    fn missing_history_falls_back_to_anchor() {
        let utc = parse_tz("UTC").unwrap();
        let schedule = FixedLengthSchedule {
            anchor: AnchorPoint::new(Weekday::Mon, 12),
            window_length_hours: 24,
        };
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).single().unwrap();
        // Inclusive: now exactly on the anchor resolves to now.
        let next = compute_next_window_start(None, now, utc, &schedule);
        assert_eq!(next, now);
    }

    #[test]
    fn fixed_length_window_shape() {
        let utc = parse_tz("UTC").unwrap();
        let schedule = FixedLengthSchedule {
            anchor: AnchorPoint::new(Weekday::Mon, 12),
            window_length_hours: 24,
        };
        let start = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).single().unwrap();
        let window = fixed_length_window(start, utc, &schedule);
        assert_eq!(window.kind, None);
        assert_eq!(window.end_at - window.start_at, Duration::hours(24));
        assert_eq!(window.label, "Window 2024-04-01");
    }
}
