//! Store error types

use codereader_common::CommonError;
use thiserror::Error;

/// Errors surfaced by the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No configured MongoDB URI candidate answered within the selection timeout.
    #[error("failed to connect to any configured MongoDB URI: {0}")]
    Connection(String),

    /// A driver-level operation (insert/find/update/delete) failed.
    #[error("document store operation failed: {0}")]
    Operation(String),

    /// A record expected to exist was not found.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// BSON (de)serialization failed.
    #[error("bson (de)serialization error: {0}")]
    Bson(String),

    /// Index creation failed during bootstrap.
    #[error("failed to create index: {0}")]
    Index(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl CommonError for StoreError {
    fn io_error(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    fn config_error(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }

    fn parse_error(msg: impl Into<String>) -> Self {
        Self::Bson(msg.into())
    }

    fn other_error(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Operation(err.to_string())
    }
}

impl From<bson::ser::Error> for StoreError {
    fn from(err: bson::ser::Error) -> Self {
        Self::Bson(err.to_string())
    }
}

impl From<bson::de::Error> for StoreError {
    fn from(err: bson::de::Error) -> Self {
        Self::Bson(err.to_string())
    }
}
