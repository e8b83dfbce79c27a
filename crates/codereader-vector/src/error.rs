//! Vector backend error types

use codereader_common::CommonError;
use thiserror::Error;

/// Errors surfaced by a vector search backend.
#[derive(Error, Debug)]
pub enum VectorError {
    /// The backend (the native MongoDB vector index) could not be reached or returned an
    /// error.
    #[error("vector backend error: {0}")]
    Backend(String),

    /// A query embedding's dimension did not match the collection's configured
    /// dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type for vector backend operations.
pub type VectorResult<T> = Result<T, VectorError>;

impl CommonError for VectorError {
    fn io_error(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    fn config_error(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    fn parse_error(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    fn other_error(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
