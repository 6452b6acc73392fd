//! Core data types for tzwindow.
//!
//! This module defines the primary types used throughout the library:
//! - [`WindowKind`] - Which phase a dual-anchor window belongs to
//! - [`AnchorPoint`] - A weekly (weekday, hour) recurrence point
//! - [`WindowDefinition`] - A computed, not-yet-persisted window
//! - [`WindowSchedule`] - The `{current, next}` pair for one instant
//! - [`SubmissionWindow`] - A persisted window record

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Which phase of the week a dual-anchor window covers.
///
/// Fixed-length windows are untyped and carry no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowKind {
    /// From the night-start anchor to the play-end anchor.
    Night,
    /// From the play-end anchor to the next night-start anchor.
    Daytime,
}

impl std::fmt::Display for WindowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowKind::Night => write!(f, "Night"),
            WindowKind::Daytime => write!(f, "Daytime"),
        }
    }
}

/// A weekly recurrence point: a weekday plus a wall-clock hour.
///
/// The hour is a local hour in the tenant's configured timezone and is
/// validated to `0..=23` when the configuration is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorPoint {
    /// Day of week for the anchor.
    pub weekday: Weekday,
    /// Local hour of day (0-23); minutes and seconds are always zero.
    pub hour: u32,
}

impl AnchorPoint {
    pub fn new(weekday: Weekday, hour: u32) -> Self {
        Self { weekday, hour }
    }
}

impl std::fmt::Display for AnchorPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:02}:00", self.weekday, self.hour)
    }
}

/// A computed window, expressed as absolute instants.
///
/// Boundaries are derived from civil time in the tenant's zone and then
/// converted to UTC, so `start_at < end_at` always compares instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowDefinition {
    /// Phase for dual-anchor windows; `None` for fixed-length windows.
    pub kind: Option<WindowKind>,
    /// Window start (inclusive).
    pub start_at: DateTime<Utc>,
    /// Window end (exclusive).
    pub end_at: DateTime<Utc>,
    /// Human-readable label stored alongside the window.
    pub label: String,
}

/// The currently active window and the one that follows it.
///
/// Invariant: `next.start_at == current.end_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSchedule {
    pub current: WindowDefinition,
    pub next: WindowDefinition,
}

/// A persisted submission window record.
///
/// Storage backends may attach their own surrogate row id; the logical
/// key is `(tenant_id, start_at)` and the store must never hold two
/// records for the same tenant with the same start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionWindow {
    /// The tenant (guild/community) this window belongs to.
    pub tenant_id: String,
    /// Window start (inclusive), UTC.
    pub start_at: DateTime<Utc>,
    /// Window end (exclusive), UTC.
    pub end_at: DateTime<Utc>,
    /// Label copied from the computed definition.
    pub label: String,
}

impl SubmissionWindow {
    /// Build a persistable record from a computed definition.
    pub fn from_definition(tenant_id: &str, def: &WindowDefinition) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            start_at: def.start_at,
            end_at: def.end_at,
            label: def.label.clone(),
        }
    }
}
