//! JSON-file window store for the `run` command.
//!
//! The whole tenant state lives in one JSON document: per tenant, the
//! raw schedule config blob plus the persisted windows. Every insert
//! rewrites the file, which is plenty for a polling cadence measured in
//! minutes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tzwindow_core::{
    RawScheduleConfig, Result as CoreResult, ScheduleError, SubmissionWindow, WindowStore,
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct TenantState {
    #[serde(default)]
    config: RawScheduleConfig,
    #[serde(default)]
    windows: Vec<SubmissionWindow>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    tenants: BTreeMap<String, TenantState>,
}

/// [`WindowStore`] backed by a single JSON file.
#[derive(Debug)]
pub struct JsonStateStore {
    path: PathBuf,
    state: Mutex<StateFile>,
}

impl JsonStateStore {
    /// Load tenant state from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read state file '{}'", path.display()))?;
        let state: StateFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse state file '{}'", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            state: Mutex::new(state),
        })
    }

    fn save(&self, state: &StateFile) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(state).map_err(ScheduleError::storage)?;
        fs::write(&self.path, json).map_err(ScheduleError::storage)
    }
}

impl WindowStore for JsonStateStore {
    fn config(&self, tenant_id: &str) -> CoreResult<Option<RawScheduleConfig>> {
        let state = self.state.lock().expect("state lock poisoned");
        Ok(state.tenants.get(tenant_id).map(|t| t.config.clone()))
    }

    fn most_recent_window(&self, tenant_id: &str) -> CoreResult<Option<SubmissionWindow>> {
        let state = self.state.lock().expect("state lock poisoned");
        Ok(state
            .tenants
            .get(tenant_id)
            .and_then(|t| t.windows.iter().max_by_key(|w| w.start_at))
            .cloned())
    }

    fn window_by_start(
        &self,
        tenant_id: &str,
        start_at: DateTime<Utc>,
    ) -> CoreResult<Option<SubmissionWindow>> {
        let state = self.state.lock().expect("state lock poisoned");
        Ok(state
            .tenants
            .get(tenant_id)
            .and_then(|t| t.windows.iter().find(|w| w.start_at == start_at))
            .cloned())
    }

    fn insert_window(&self, window: &SubmissionWindow) -> CoreResult<()> {
        let mut state = self.state.lock().expect("state lock poisoned");
        let tenant = state
            .tenants
            .get_mut(&window.tenant_id)
            .ok_or_else(|| {
                ScheduleError::StorageError(format!("unknown tenant '{}'", window.tenant_id))
            })?;
        if tenant.windows.iter().any(|w| w.start_at == window.start_at) {
            return Err(ScheduleError::StorageError(format!(
                "duplicate window for tenant '{}' at {}",
                window.tenant_id, window.start_at
            )));
        }
        tenant.windows.push(window.clone());
        tenant.windows.sort_by_key(|w| w.start_at);
        self.save(&state)
    }

    fn tenant_ids(&self) -> CoreResult<Vec<String>> {
        let state = self.state.lock().expect("state lock poisoned");
        Ok(state.tenants.keys().cloned().collect())
    }
}
