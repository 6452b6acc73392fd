//! Error types for tzwindow-core.
//!
//! Fallibility in this crate is confined to timezone parsing and the
//! storage trait: the boundary and schedule computations are total over
//! their documented input domain and have no error path.

use thiserror::Error;

/// The main error type for tzwindow operations.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Invalid IANA timezone name provided.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Read or write failure in the window store.
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ScheduleError {
    /// Wrap an arbitrary storage-layer failure.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        ScheduleError::StorageError(err.to_string())
    }
}

/// Result type alias for tzwindow operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
