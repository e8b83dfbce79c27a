//! Search-specific error types

use codereader_common::CommonError;
use thiserror::Error;

/// Errors surfaced by [`crate::SearchService::search`].
#[derive(Error, Debug)]
pub enum SearchError {
    /// `query`/`limit`/`minScore` failed validation (spec.md §4.9 step 1).
    #[error("invalid search request: {0}")]
    Validation(String),

    /// No job matches the given id or identifier.
    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("embedding error: {0}")]
    Embedding(#[from] codereader_embeddings::EmbeddingError),

    #[error("vector backend error: {0}")]
    Vector(#[from] codereader_vector::VectorError),

    #[error("store error: {0}")]
    Store(#[from] codereader_store::StoreError),
}

/// Result type for search operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

impl CommonError for SearchError {
    fn io_error(msg: impl Into<String>) -> Self {
        Self::Store(codereader_store::StoreError::other_error(msg))
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
