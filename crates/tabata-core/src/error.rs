//! Core error types for tabata-core.
//!
//! Failures in this crate are local and recoverable. The timer engine never
//! returns an error for port failures (cues, wake-lock); those are logged and
//! playback continues. Only lookup misses and storage problems surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tabata-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Workout validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Workout storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Timer engine errors
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A workout definition that must not reach the timer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Workout title cannot be empty")]
    EmptyTitle,

    #[error("A workout needs at least 1 set")]
    NoSets,

    #[error("A workout needs at least one step")]
    NoSteps,

    #[error("A workout titled '{title}' already exists")]
    DuplicateTitle { title: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Could not determine data directory: {0}")]
    DataDir(String),
}

/// Workout storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to open workout database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Database is locked")]
    Locked,

    #[error("Workout not found: {id}")]
    NotFound { id: String },

    #[error("Invalid workout file format: {0}")]
    InvalidFormat(String),
}

/// Timer engine errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// `start` was given an id the lookup does not know.
    #[error("Workout not found: {id}")]
    WorkoutNotFound { id: String },
}

/// Failure reported by a cue port. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cue playback failed: {0}")]
pub struct CueError(pub String);

/// Failure reported by the wake-lock port. Never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("wake lock unavailable: {0}")]
pub struct WakeLockError(pub String);

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
