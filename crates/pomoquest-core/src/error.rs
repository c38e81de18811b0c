//! Core error types for pomoquest-core.
//!
//! This module defines the error hierarchy using thiserror. Most failures in
//! the core degrade to a safe default instead of surfacing here; what remains
//! are the declined operations a caller has to report to the player.

use std::path::PathBuf;
use thiserror::Error;

use crate::tasks::TaskKey;

/// Core error type for pomoquest-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task list errors
    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    /// Coin ledger errors
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Character name not on the roster
    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be created
    #[error("Cannot prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Task list errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Title was empty or whitespace only
    #[error("Task title must not be empty")]
    EmptyTitle,

    /// The list is full
    #[error("You've reached the maximum number of tasks ({max})")]
    LimitReached { max: usize },

    /// No task with this key
    #[error("No task with id {0}")]
    NotFound(TaskKey),
}

/// Coin ledger errors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// Purchase declined, nothing was deducted
    #[error("Not enough coins: need {requested}, have {available}")]
    InsufficientFunds { requested: u64, available: u64 },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseBusy
                    || err.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
