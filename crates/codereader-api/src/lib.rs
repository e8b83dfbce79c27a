//! HTTP API server for the code indexing and semantic search service. See spec.md §6.

pub mod bootstrap;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;
