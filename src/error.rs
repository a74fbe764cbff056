//! Error types for the task tracker core.

use thiserror::Error;

use crate::models::TaskId;

/// Errors returned by lifecycle operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackerError {
    /// Project name was empty or whitespace only
    #[error("Enter Project Name")]
    Validation,

    /// No task with this id in the targeted collection
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// Freshly allocated id already present in one of the collections
    #[error("task id {0} is already in use")]
    DuplicateId(TaskId),

    /// Every id above the largest stored one is taken
    #[error("no task ids left")]
    IdsExhausted,
}

/// Errors raised by a key-value store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend can't be read or written at all
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Invalid stopwatch transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StopwatchError {
    #[error("stopwatch is already running")]
    AlreadyRunning,

    #[error("stopwatch is not running")]
    NotRunning,
}
