//! Error types for the doubles question deduplicator
//!
//! This module provides error handling using thiserror for structured
//! error definitions and anyhow for error propagation at the edges.

use thiserror::Error;

/// Main error type for doubles operations
#[derive(Error, Debug)]
pub enum DoublesError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or write failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A question record could not be parsed from the input
    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    /// Two input records share the same id
    #[error("Duplicate question id: {0}")]
    DuplicateId(i64),

    /// Similarity or language oracle failed; aborts the pass
    #[error("Oracle failure: {0}")]
    Oracle(String),

    /// Embedding model loading or inference failed
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for doubles operations
pub type Result<T> = std::result::Result<T, DoublesError>;

/// Convert anyhow::Error to DoublesError
impl From<anyhow::Error> for DoublesError {
    fn from(err: anyhow::Error) -> Self {
        DoublesError::Other(err.to_string())
    }
}
