//! API error taxonomy and its HTTP/JSON:API rendering. See spec.md §7.
//!
//! Grounded in the teacher's `Error` type (codetriever-api/src/error.rs) for the
//! overall shape (a single enum implementing `CommonError`, converted to an HTTP
//! response at the edge), adapted to spec.md's JSON:API-style envelope and fixed
//! error-code vocabulary.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use codereader_common::CommonError;
use serde::Serialize;
use thiserror::Error;

/// The API's error taxonomy. Every variant maps to one spec.md §7 error code and HTTP
/// status.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CommonError for ApiError {
    fn io_error(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    fn config_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    fn parse_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    fn other_error(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::TaskNotFound(_) => "TASK_NOT_FOUND",
            Self::InvalidStatus(_) => "INVALID_STATUS",
            Self::Conflict(_) => "CONFLICT",
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::Database(_) => "DB_ERROR",
            Self::EmbeddingProvider(_) => "OPENAI_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidStatus(_) | Self::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Self::TaskNotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::EmbeddingProvider(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorObject {
    status: u16,
    code: &'static str,
    title: &'static str,
    detail: String,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    errors: Vec<ErrorObject>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status == StatusCode::INTERNAL_SERVER_ERROR {
            codereader_common::error_sanitizer::sanitize_error(&self, "api request")
        } else {
            self.to_string()
        };
        let body = ErrorEnvelope {
            errors: vec![ErrorObject {
                status: status.as_u16(),
                code: self.code(),
                title: status.canonical_reason().unwrap_or("Error"),
                detail,
            }],
        };
        (status, Json(body)).into_response()
    }
}

impl From<codereader_indexing::IndexingError> for ApiError {
    fn from(err: codereader_indexing::IndexingError) -> Self {
        use codereader_indexing::IndexingError as E;
        match err {
            E::InvalidPath(msg) => Self::InvalidPath(msg),
            E::Validation(msg) => Self::Validation(msg),
            E::JobNotFound(msg) => Self::TaskNotFound(msg),
            E::InvalidStatus(msg) => Self::InvalidStatus(msg),
            E::Config(inner) => Self::Validation(inner.to_string()),
            E::Scanner(inner) => Self::InvalidPath(inner.to_string()),
            E::Parsing(inner) => Self::Internal(inner.to_string()),
            E::Embedding(inner) => Self::EmbeddingProvider(inner.to_string()),
            E::Vector(inner) => Self::Database(inner.to_string()),
            E::Store(inner) => Self::Database(inner.to_string()),
        }
    }
}

impl From<codereader_search::SearchError> for ApiError {
    fn from(err: codereader_search::SearchError) -> Self {
        use codereader_search::SearchError as E;
        match err {
            E::Validation(msg) => Self::Validation(msg),
            E::JobNotFound(msg) => Self::TaskNotFound(msg),
            E::Embedding(inner) => Self::EmbeddingProvider(inner.to_string()),
            E::Vector(inner) => Self::Database(inner.to_string()),
            E::Store(inner) => Self::Database(inner.to_string()),
        }
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
