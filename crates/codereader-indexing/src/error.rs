//! Indexing-orchestration error types

use codereader_common::CommonError;
use thiserror::Error;

/// Errors surfaced by [`crate::JobService`] and [`crate::Processor`].
#[derive(Error, Debug)]
pub enum IndexingError {
    /// `repositoryPath` does not exist or is not a directory.
    #[error("invalid repository path: {0}")]
    InvalidPath(String),

    /// `identifier` failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The job does not exist.
    #[error("job not found: {0}")]
    JobNotFound(String),

    /// The job is already queued, or not in a state that can be (re)started.
    #[error("invalid job status for this operation: {0}")]
    InvalidStatus(String),

    #[error("config error: {0}")]
    Config(#[from] codereader_config::ConfigError),

    #[error("scanner error: {0}")]
    Scanner(#[from] codereader_scanner::ScannerError),

    #[error("parsing error: {0}")]
    Parsing(#[from] codereader_parsing::ParsingError),

    #[error("embedding error: {0}")]
    Embedding(#[from] codereader_embeddings::EmbeddingError),

    #[error("vector error: {0}")]
    Vector(#[from] codereader_vector::VectorError),

    #[error("store error: {0}")]
    Store(#[from] codereader_store::StoreError),
}

/// Result type for indexing operations.
pub type IndexingResult<T> = std::result::Result<T, IndexingError>;

impl CommonError for IndexingError {
    fn io_error(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    fn config_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    fn parse_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    fn other_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
