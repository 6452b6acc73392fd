//! Tenant schedule configuration.
//!
//! Tenants store a permissive JSON blob ([`RawScheduleConfig`]); loading
//! validates it into a [`ScheduleConfig`] with a tagged [`ScheduleMode`].
//! Validation never fails: malformed or missing fields fall back to the
//! documented defaults, so a broken config degrades to default behavior
//! instead of taking the tenant out of the schedule.

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::AnchorPoint;

/// Default timezone when none is configured or the name is invalid.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Chicago;
/// Default night-start anchor (dual-anchor mode): Tuesday 12:00.
pub const DEFAULT_NIGHT_START: AnchorPoint = AnchorPoint {
    weekday: Weekday::Tue,
    hour: 12,
};
/// Default play-end anchor (dual-anchor mode): Sunday 12:00.
pub const DEFAULT_PLAY_END: AnchorPoint = AnchorPoint {
    weekday: Weekday::Sun,
    hour: 12,
};
/// Default anchor (fixed-length mode): Sunday 12:00.
pub const DEFAULT_ANCHOR: AnchorPoint = AnchorPoint {
    weekday: Weekday::Sun,
    hour: 12,
};
/// Default window length in hours (one week).
pub const DEFAULT_WINDOW_LENGTH_HOURS: u32 = 168;

/// Raw per-tenant configuration as stored (camelCase JSON blob).
///
/// All fields are optional; unknown fields are ignored. Weekdays are
/// ISO numbered 1 (Monday) through 7 (Sunday).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScheduleConfig {
    /// IANA timezone name, e.g. `America/Chicago`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Fixed-length mode: anchor weekday (1=Mon .. 7=Sun).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_weekday: Option<u8>,
    /// Fixed-length mode: anchor hour of day (0-23).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_hour: Option<u32>,
    /// Fixed-length mode: window length in hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_length_hours: Option<u32>,
    /// Dual-anchor mode: night-start weekday (1=Mon .. 7=Sun).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub night_start_weekday: Option<u8>,
    /// Dual-anchor mode: night-start hour of day (0-23).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub night_start_hour: Option<u32>,
    /// Dual-anchor mode: play-end weekday (1=Mon .. 7=Sun).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_end_weekday: Option<u8>,
    /// Dual-anchor mode: play-end hour of day (0-23).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_end_hour: Option<u32>,
}

/// Fixed-length scheduling: windows chain forward from the last persisted
/// start by a fixed real-time duration, anchored when no history exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLengthSchedule {
    /// Anchor used when no window history exists.
    pub anchor: AnchorPoint,
    /// Window length as a fixed real-time duration in hours.
    pub window_length_hours: u32,
}

/// Dual-anchor scheduling: two weekly anchors partition the week into
/// alternating Night and Daytime windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DualAnchorSchedule {
    /// Start of the Night window.
    pub night_start: AnchorPoint,
    /// Start of the Daytime window (end of Night).
    pub play_end: AnchorPoint,
}

/// Validated scheduling mode for one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    /// Single anchor plus a fixed window length.
    FixedLength(FixedLengthSchedule),
    /// Two independent weekly anchors.
    DualAnchor(DualAnchorSchedule),
}

/// Validated per-tenant schedule configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Civil-time frame for all boundary math.
    pub timezone: Tz,
    /// Which scheduling mode this tenant uses.
    pub mode: ScheduleMode,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self::from_raw(&RawScheduleConfig::default())
    }
}

impl ScheduleConfig {
    /// Validate a raw configuration, falling back to defaults per field.
    ///
    /// Mode selection: any fixed-length field present (`anchorWeekday`,
    /// `anchorHour`, `windowLengthHours`) selects fixed-length mode,
    /// otherwise dual-anchor mode. A dual-anchor config whose two anchors
    /// coincide cannot partition the week and reverts to the default
    /// anchors.
    pub fn from_raw(raw: &RawScheduleConfig) -> Self {
        let timezone = raw
            .timezone
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok())
            .unwrap_or(DEFAULT_TIMEZONE);

        let fixed_length = raw.anchor_weekday.is_some()
            || raw.anchor_hour.is_some()
            || raw.window_length_hours.is_some();

        let mode = if fixed_length {
            let anchor = anchor_from_fields(raw.anchor_weekday, raw.anchor_hour, DEFAULT_ANCHOR);
            let window_length_hours = raw
                .window_length_hours
                .filter(|&h| h > 0)
                .unwrap_or(DEFAULT_WINDOW_LENGTH_HOURS);
            ScheduleMode::FixedLength(FixedLengthSchedule {
                anchor,
                window_length_hours,
            })
        } else {
            let night_start = anchor_from_fields(
                raw.night_start_weekday,
                raw.night_start_hour,
                DEFAULT_NIGHT_START,
            );
            let play_end =
                anchor_from_fields(raw.play_end_weekday, raw.play_end_hour, DEFAULT_PLAY_END);
            // Coinciding anchors cannot alternate phases.
            let (night_start, play_end) = if night_start == play_end {
                (DEFAULT_NIGHT_START, DEFAULT_PLAY_END)
            } else {
                (night_start, play_end)
            };
            ScheduleMode::DualAnchor(DualAnchorSchedule {
                night_start,
                play_end,
            })
        };

        Self { timezone, mode }
    }
}

/// Build an anchor from optional raw fields, falling back per field.
fn anchor_from_fields(weekday: Option<u8>, hour: Option<u32>, default: AnchorPoint) -> AnchorPoint {
    AnchorPoint {
        weekday: weekday
            .and_then(weekday_from_iso)
            .unwrap_or(default.weekday),
        hour: hour.filter(|&h| h < 24).unwrap_or(default.hour),
    }
}

/// Map an ISO weekday number (1=Monday .. 7=Sunday) to a [`Weekday`].
pub fn weekday_from_iso(n: u8) -> Option<Weekday> {
    match n {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}
