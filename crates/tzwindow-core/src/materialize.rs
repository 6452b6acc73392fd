//! Window materialization and the per-tick driver entry point.
//!
//! [`ensure_window_for_tenant`] reconciles the computed schedule against
//! persisted state for one tenant; [`run_once`] does so for every known
//! tenant, isolating failures so one broken tenant cannot starve the
//! rest. Both take the clock and the store as explicit parameters; there
//! is no ambient state and no in-process locking. Idempotency comes from
//! the store's `(tenant_id, start_at)` uniqueness.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{ScheduleConfig, ScheduleMode};
use crate::error::Result;
use crate::models::{SubmissionWindow, WindowDefinition};
use crate::schedule::{compute_next_window_start, compute_window_schedule, fixed_length_window};
use crate::store::WindowStore;

/// Outcome of one [`run_once`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Tenants processed.
    pub tenants: usize,
    /// Windows inserted across all tenants.
    pub inserted: usize,
    /// Tenants whose materialization failed this pass.
    pub failed: usize,
}

/// Reconcile computed windows against persisted state for one tenant.
///
/// Loads the tenant configuration (malformed or missing config degrades
/// to defaults), computes the due windows for `now`, and inserts any that
/// are not yet persisted. Re-running with unchanged inputs performs zero
/// writes. Returns the number of windows inserted: at most two in
/// dual-anchor mode, at most one in fixed-length mode.
pub fn ensure_window_for_tenant(
    store: &dyn WindowStore,
    tenant_id: &str,
    now: DateTime<Utc>,
) -> Result<usize> {
    let raw = store.config(tenant_id)?.unwrap_or_default();
    let config = ScheduleConfig::from_raw(&raw);
    let latest = store.most_recent_window(tenant_id)?;

    match config.mode {
        ScheduleMode::FixedLength(fixed) => {
            // Nothing is due while the latest persisted window is open.
            if let Some(ref window) = latest {
                if window.end_at > now {
                    return Ok(0);
                }
            }
            let start = compute_next_window_start(
                latest.map(|w| w.start_at),
                now,
                config.timezone,
                &fixed,
            );
            let definition = fixed_length_window(start, config.timezone, &fixed);
            ensure_persisted(store, tenant_id, &definition)
        }
        ScheduleMode::DualAnchor(dual) => {
            let schedule = compute_window_schedule(now, config.timezone, &dual);
            let mut inserted = ensure_persisted(store, tenant_id, &schedule.current)?;
            inserted += ensure_persisted(store, tenant_id, &schedule.next)?;
            Ok(inserted)
        }
    }
}

/// Insert the definition unless a window with its start already exists.
fn ensure_persisted(
    store: &dyn WindowStore,
    tenant_id: &str,
    definition: &WindowDefinition,
) -> Result<usize> {
    if store.window_by_start(tenant_id, definition.start_at)?.is_some() {
        return Ok(0);
    }
    let record = SubmissionWindow::from_definition(tenant_id, definition);
    store.insert_window(&record)?;
    debug!(
        tenant_id,
        label = %record.label,
        start_at = %record.start_at,
        end_at = %record.end_at,
        "persisted submission window"
    );
    Ok(1)
}

/// Materialize windows for every known tenant.
///
/// A failure for one tenant is logged and counted but does not prevent
/// processing the remaining tenants. Only tenant enumeration failures
/// propagate to the caller, to be logged there and retried on the next
/// tick. Safe to invoke repeatedly or concurrently: all writes are
/// guarded by the store's start-time uniqueness.
pub fn run_once(store: &dyn WindowStore, now: DateTime<Utc>) -> Result<RunSummary> {
    let tenant_ids = store.tenant_ids()?;
    let mut summary = RunSummary {
        tenants: tenant_ids.len(),
        ..RunSummary::default()
    };

    for tenant_id in &tenant_ids {
        match ensure_window_for_tenant(store, tenant_id, now) {
            Ok(inserted) => summary.inserted += inserted,
            Err(err) => {
                summary.failed += 1;
                warn!(tenant_id = %tenant_id, error = %err, "window materialization failed");
            }
        }
    }

    info!(
        tenants = summary.tenants,
        inserted = summary.inserted,
        failed = summary.failed,
        "materialization pass complete"
    );
    Ok(summary)
}
