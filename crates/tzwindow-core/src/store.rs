//! Window storage interface.
//!
//! The scheduling engine reads and writes persisted windows through the
//! [`WindowStore`] trait; backends decide serialization and enforce the
//! `(tenant_id, start_at)` uniqueness the materializer relies on.
//! [`MemoryStore`] is an in-process implementation used by the tests and
//! available to embedders.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::config::RawScheduleConfig;
use crate::error::{Result, ScheduleError};
use crate::models::SubmissionWindow;

/// Storage collaborator for tenant configuration and window records.
///
/// All methods are fallible; implementations map their native failures to
/// [`ScheduleError::StorageError`]. Implementations must reject (or make
/// idempotent) a second insert with an existing `(tenant_id, start_at)` —
/// that constraint is what makes concurrent `run_once` ticks safe without
/// in-process locking.
pub trait WindowStore {
    /// Stored raw configuration for a tenant, if any.
    fn config(&self, tenant_id: &str) -> Result<Option<RawScheduleConfig>>;

    /// The persisted window with the latest `start_at` for a tenant.
    fn most_recent_window(&self, tenant_id: &str) -> Result<Option<SubmissionWindow>>;

    /// The persisted window with exactly this `start_at`, if any.
    fn window_by_start(
        &self,
        tenant_id: &str,
        start_at: DateTime<Utc>,
    ) -> Result<Option<SubmissionWindow>>;

    /// Persist a new window record.
    fn insert_window(&self, window: &SubmissionWindow) -> Result<()>;

    /// All known tenant ids.
    fn tenant_ids(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Default)]
struct MemoryState {
    configs: HashMap<String, RawScheduleConfig>,
    windows: HashMap<String, Vec<SubmissionWindow>>,
}

/// In-memory [`WindowStore`] keyed by tenant id.
///
/// Enforces `(tenant_id, start_at)` uniqueness like a database unique
/// constraint would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tenant with its raw configuration.
    pub fn put_config(&self, tenant_id: &str, config: RawScheduleConfig) {
        let mut state = self.inner.lock().expect("store lock poisoned");
        state.configs.insert(tenant_id.to_string(), config);
    }

    /// All windows persisted for a tenant, ordered by `start_at`.
    pub fn windows_for(&self, tenant_id: &str) -> Vec<SubmissionWindow> {
        let state = self.inner.lock().expect("store lock poisoned");
        state.windows.get(tenant_id).cloned().unwrap_or_default()
    }
}

impl WindowStore for MemoryStore {
    fn config(&self, tenant_id: &str) -> Result<Option<RawScheduleConfig>> {
        let state = self.inner.lock().expect("store lock poisoned");
        Ok(state.configs.get(tenant_id).cloned())
    }

    fn most_recent_window(&self, tenant_id: &str) -> Result<Option<SubmissionWindow>> {
        let state = self.inner.lock().expect("store lock poisoned");
        Ok(state
            .windows
            .get(tenant_id)
            .and_then(|windows| windows.last())
            .cloned())
    }

    fn window_by_start(
        &self,
        tenant_id: &str,
        start_at: DateTime<Utc>,
    ) -> Result<Option<SubmissionWindow>> {
        let state = self.inner.lock().expect("store lock poisoned");
        Ok(state
            .windows
            .get(tenant_id)
            .and_then(|windows| windows.iter().find(|w| w.start_at == start_at))
            .cloned())
    }

    fn insert_window(&self, window: &SubmissionWindow) -> Result<()> {
        let mut state = self.inner.lock().expect("store lock poisoned");
        let windows = state.windows.entry(window.tenant_id.clone()).or_default();
        if windows.iter().any(|w| w.start_at == window.start_at) {
            return Err(ScheduleError::StorageError(format!(
                "duplicate window for tenant '{}' at {}",
                window.tenant_id, window.start_at
            )));
        }
        windows.push(window.clone());
        windows.sort_by_key(|w| w.start_at);
        Ok(())
    }

    fn tenant_ids(&self) -> Result<Vec<String>> {
        let state = self.inner.lock().expect("store lock poisoned");
        let mut ids: Vec<String> = state.configs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window(tenant: &str, start_hour: u32) -> SubmissionWindow {
        SubmissionWindow {
            tenant_id: tenant.to_string(),
            start_at: Utc
                .with_ymd_and_hms(2024, 4, 1, start_hour, 0, 0)
                .single()
                .unwrap(),
            end_at: Utc
                .with_ymd_and_hms(2024, 4, 2, start_hour, 0, 0)
                .single()
                .unwrap(),
            label: "Window 2024-04-01".to_string(),
        }
    }

    #[test]
    fn insert_and_query_by_start() {
        let store = MemoryStore::new();
        let w = window("guild-1", 12);
        store.insert_window(&w).unwrap();

        let found = store.window_by_start("guild-1", w.start_at).unwrap();
        assert_eq!(found, Some(w));
        assert_eq!(store.window_by_start("guild-2", window("guild-2", 12).start_at).unwrap(), None);
    }

    #[test]
    fn duplicate_start_is_rejected() {
        let store = MemoryStore::new();
        store.insert_window(&window("guild-1", 12)).unwrap();
        let err = store.insert_window(&window("guild-1", 12)).unwrap_err();
        assert!(matches!(err, ScheduleError::StorageError(_)));
    }

    #[test]
    fn most_recent_window_orders_by_start() {
        let store = MemoryStore::new();
        store.insert_window(&window("guild-1", 18)).unwrap();
        store.insert_window(&window("guild-1", 6)).unwrap();
        let latest = store.most_recent_window("guild-1").unwrap().unwrap();
        assert_eq!(latest.start_at.format("%H").to_string(), "18");
    }

    #[test]
    fn tenant_ids_come_from_registered_configs() {
        let store = MemoryStore::new();
        store.put_config("guild-b", RawScheduleConfig::default());
        store.put_config("guild-a", RawScheduleConfig::default());
        assert_eq!(store.tenant_ids().unwrap(), vec!["guild-a", "guild-b"]);
    }
}
