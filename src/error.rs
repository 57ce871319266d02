//! Error types for the tracking core.
//!
//! None of these ever reach the page as a failure of a user action: the
//! emitter turns them into an [`EmitOutcome`](crate::tracking::EmitOutcome)
//! and a log line.

use thiserror::Error;

/// Persisted key-value storage failures.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures reported by an analytics transport.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("transport not initialized")]
    NotInitialized,

    #[error("transport rejected event: {0}")]
    Rejected(String),

    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// A required event field was missing or blank.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} event missing required field `{field}`")]
pub struct ValidationError {
    pub kind: &'static str,
    pub field: &'static str,
}

impl ValidationError {
    pub fn missing(kind: &'static str, field: &'static str) -> Self {
        Self { kind, field }
    }
}

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity must be a non-empty string")]
    Empty,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}
