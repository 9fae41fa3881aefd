//! Error types for the scheduler service and its collaborators

use thiserror::Error;

use crate::state::TimerId;

/// Errors surfaced by [`crate::state::AppState`] operations
#[derive(Error, Debug)]
pub enum TimerError {
    #[error("Timer {0} not found")]
    NotFound(TimerId),

    #[error("Invalid timer configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// The alarm facility refused an instruction
    #[error("Alarm scheduling failed for timer {id}: {message}")]
    Alarm { id: TimerId, message: String },

    /// The notification facility refused a show or cancel
    #[error("Notification failed for timer {id}: {message}")]
    Notify { id: TimerId, message: String },
}

/// Rejected timer settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be below 86400 seconds, got {value}")]
    TimeOfDayOutOfRange { field: &'static str, value: u32 },
}

/// Persistence failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}
