//! Error types.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised by external data collaborators.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reasons a scheduling run aborted.
#[derive(Debug, Error)]
pub enum RunError {
    /// The snapshot could not be loaded. Nothing was cleared or written.
    #[error("snapshot load failed: {0}")]
    Load(#[source] StoreError),

    /// The snapshot is unusable for the requested term. Nothing was
    /// cleared or written.
    #[error("validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Clearing or writing placements failed.
    #[error("persistence failed: {0}")]
    Persistence(#[source] StoreError),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
