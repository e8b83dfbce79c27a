//! Embedding provider error types

use codereader_common::CommonError;
use thiserror::Error;

/// Errors surfaced by the Embedder or its provider.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// The provider returned a rate-limit response (HTTP 429 or equivalent).
    #[error("embedding provider rate-limited the request")]
    RateLimited,

    /// The provider returned a transient server error (5xx or equivalent).
    #[error("embedding provider server error: {0}")]
    ServerError(String),

    /// The provider rejected the request for a non-retryable reason.
    #[error("embedding provider error: {0}")]
    Provider(String),

    /// A network-level failure occurred reaching the provider.
    #[error("network error calling embedding provider: {0}")]
    Network(String),

    /// Provider configuration (base URL, API key, model) was invalid.
    #[error("embedding provider configuration error: {0}")]
    Config(String),

    /// Any other failure.
    #[error("embedding error: {0}")]
    Other(String),
}

/// Result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

impl EmbeddingError {
    /// Whether the Embedder should retry the batch that produced this error.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError(_))
    }
}

impl CommonError for EmbeddingError {
    fn io_error(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    fn parse_error(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    fn other_error(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
