//! Evaluator error types.
//!
//! Only durable storage touches can fail: reading the counter file at
//! startup and the single write at finalize.

use std::path::PathBuf;
use thiserror::Error;

/// Evaluation log error.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// File I/O error.
    #[error("Failed to {operation} file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The identifier counter file is not valid JSON.
    #[error("Invalid evaluator config file: {path}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete write of {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `finalize` was called a second time.
    #[error("Evaluation log {identifier} was already finalized")]
    AlreadyFinalized { identifier: String },
}

impl EvaluatorError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the file at {}", operation, path.display())
            }
            Self::InvalidConfig { path, source } => {
                format!(
                    "The evaluator config at {} could not be read: {}",
                    path.display(),
                    source
                )
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save the evaluation log to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::AlreadyFinalized { identifier } => {
                format!("The evaluation log for session {identifier} has already been written.")
            }
        }
    }
}

/// Result type alias for evaluator operations.
pub type Result<T> = std::result::Result<T, EvaluatorError>;
