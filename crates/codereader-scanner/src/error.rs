//! Scanner error types

use codereader_common::CommonError;
use thiserror::Error;

/// Errors surfaced by the Scanner.
#[derive(Error, Debug)]
pub enum ScannerError {
    /// The repository path does not exist or is not a directory.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// An I/O error occurred while walking the tree.
    #[error("scan I/O error: {0}")]
    Io(String),
}

/// Result type for scanner operations.
pub type ScannerResult<T> = Result<T, ScannerError>;

impl CommonError for ScannerError {
    fn io_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    fn config_error(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    fn parse_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    fn other_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}
