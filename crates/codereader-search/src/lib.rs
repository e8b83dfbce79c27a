//! Semantic code search: embeds a query, picks a vector backend (native index or
//! in-memory cosine fallback), and assembles scored chunks. See spec.md §4.9.

pub mod error;
pub mod service;

pub use error::{SearchError, SearchResult};
pub use service::{DEFAULT_LIMIT, DEFAULT_MIN_SCORE, JobRef, SearchMatch, SearchService};
