//! Error types for buffered writer operations.

use thiserror::Error;

/// Errors that can occur while buffering, encoding or rotating output files.
#[derive(Error, Debug)]
pub enum WriterError {
    /// The file name template cannot produce a file name
    #[error("invalid file name template '{template}': {reason}")]
    InvalidFileNameTemplate { template: String, reason: String },

    /// No writer is registered under the requested format name
    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    /// I/O error while opening, writing or closing an output stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow conversion error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// Parquet encoder error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Data writer used out of order (e.g. data before header)
    #[error("writer protocol violation: {0}")]
    Protocol(String),
}

impl WriterError {
    /// Configuration problems are reported to the user as such and never retried
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            WriterError::InvalidFileNameTemplate { .. } | WriterError::UnknownFormat(_)
        )
    }
}

/// Result alias used across the writer crates
pub type Result<T, E = WriterError> = std::result::Result<T, E>;
