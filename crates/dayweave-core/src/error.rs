//! Core error types for dayweave-core.
//!
//! This module defines the error hierarchy using thiserror. Nothing in the
//! engine is fatal to the process: integrity faults exclude one memo from a
//! scoring pass, invalid reactions are reported to the caller, and an
//! infeasible allocation is a normal outcome carried in the result, not an
//! error at all.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dayweave-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Data-integrity faults on a memo
    #[error("Integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// A user reaction that cannot be applied
    #[error("Invalid reaction: {0}")]
    Reaction(#[from] InvalidReaction),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A memo whose stored data violates the engine's invariants.
///
/// These are logged and the memo is skipped for the pass; they never
/// abort scoring for the remaining memos.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// The kind tag does not match the attached state record
    #[error("Memo '{memo_id}' is tagged {kind} but carries {state} state")]
    StateMismatch {
        memo_id: String,
        kind: &'static str,
        state: &'static str,
    },

    /// A deadline memo without a deadline date
    #[error("Deadline memo '{memo_id}' has no deadline date")]
    MissingDeadline { memo_id: String },

    /// A routine memo without a recurrence goal
    #[error("Routine memo '{memo_id}' has no recurrence goal")]
    MissingRecurrenceGoal { memo_id: String },

    /// Duration curve arrays no longer span the deadline window
    #[error("Memo '{memo_id}' duration curves hold {actual} entries, expected {expected}")]
    CurveLengthMismatch {
        memo_id: String,
        expected: usize,
        actual: usize,
    },
}

/// A reaction that cannot be applied to the memo's current state.
///
/// Reported to the caller as a rejected operation, never silently applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidReaction {
    /// Accept requested on a memo already rejected today
    #[error("Memo '{memo_id}' was already rejected today")]
    AcceptAfterReject { memo_id: String },

    /// Accept requested on a memo already accepted today
    #[error("Memo '{memo_id}' already has an accepted slot today")]
    AlreadyAccepted { memo_id: String },

    /// Undo requested after the day rolled over
    #[error("Undo for memo '{memo_id}' expired: the reaction is not from today")]
    UndoExpired { memo_id: String },

    /// Undo requested with no same-day accept/complete to reverse
    #[error("Memo '{memo_id}' has nothing to undo")]
    NothingToUndo { memo_id: String },
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Stored memo document could not be decoded
    #[error("Corrupt memo record '{memo_id}': {message}")]
    CorruptRecord { memo_id: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::QueryFailed(err.to_string())
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// No usable config directory on this platform
    #[error("Could not resolve a configuration directory")]
    NoConfigDir,
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
