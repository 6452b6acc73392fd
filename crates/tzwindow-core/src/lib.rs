//! # tzwindow-core
//!
//! A DST-safe recurring submission window scheduler.
//!
//! Given a weekly anchor schedule and an instant, this library derives
//! the currently active submission window and the next one, correctly
//! across daylight-saving transitions, and idempotently materializes
//! those windows into a storage backend on a polling cadence.
//!
//! ## Features
//!
//! - **DST Safety**: Boundaries are computed in civil time in the
//!   tenant's IANA timezone and converted independently to UTC, so a
//!   weekly window spanning a transition is 167 or 169 real hours long
//!   while its wall-clock boundaries stay fixed.
//! - **Two scheduling modes**: dual-anchor (alternating Night/Daytime
//!   phases) and single-anchor with a fixed window length, validated
//!   into one tagged configuration per tenant.
//! - **Idempotent materialization**: re-running a pass with unchanged
//!   state performs zero writes; duplicate inserts are prevented by the
//!   store's `(tenant_id, start_at)` uniqueness.
//! - **Pure computation**: schedule resolution is synchronous, total and
//!   deterministic; all fallibility lives at the storage seam.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tzwindow_core::prelude::*;
//!
//! let store = MemoryStore::new();
//! store.put_config("guild-1", RawScheduleConfig::default());
//!
//! let now = Utc.with_ymd_and_hms(2024, 3, 10, 16, 0, 0).single().unwrap();
//! let summary = run_once(&store, now).unwrap();
//! assert_eq!(summary.inserted, 2);
//!
//! // A second pass at the same instant writes nothing.
//! assert_eq!(run_once(&store, now).unwrap().inserted, 0);
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod materialize;
pub mod models;
pub mod schedule;
pub mod store;
pub mod tz;

// Re-export commonly used types at the crate root
pub use boundary::{most_recent_boundary, next_boundary};
pub use config::{
    DualAnchorSchedule, FixedLengthSchedule, RawScheduleConfig, ScheduleConfig, ScheduleMode,
    weekday_from_iso,
};
pub use error::{Result, ScheduleError};
pub use materialize::{RunSummary, ensure_window_for_tenant, run_once};
pub use models::{AnchorPoint, SubmissionWindow, WindowDefinition, WindowKind, WindowSchedule};
pub use schedule::{compute_next_anchor, compute_next_window_start, compute_window_schedule};
pub use store::{MemoryStore, WindowStore};

/// Prelude module for convenient imports.
///
/// ```
/// use tzwindow_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::boundary::{most_recent_boundary, next_boundary};
    pub use crate::config::*;
    pub use crate::error::{Result, ScheduleError};
    pub use crate::materialize::{RunSummary, ensure_window_for_tenant, run_once};
    pub use crate::models::*;
    pub use crate::schedule::{
        compute_next_anchor, compute_next_window_start, compute_window_schedule,
    };
    pub use crate::store::{MemoryStore, WindowStore};
    pub use crate::tz::parse_tz;
}
