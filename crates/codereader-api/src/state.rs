//! Application state for Axum handlers. Grounded in the teacher's `AppState`
//! (codetriever-api/src/state.rs): services are constructed once at startup and
//! shared across every request via `Arc`/`Clone`.

use codereader_indexing::{JobService, Processor, Queue};
use codereader_search::SearchService;
use std::sync::Arc;

/// Shared services every handler needs.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<JobService>,
    pub processor: Arc<Processor>,
    pub queue: Arc<Queue>,
    pub search: Arc<SearchService>,
}

impl AppState {
    #[must_use]
    pub fn new(
        jobs: Arc<JobService>,
        processor: Arc<Processor>,
        queue: Arc<Queue>,
        search: Arc<SearchService>,
    ) -> Self {
        Self {
            jobs,
            processor,
            queue,
            search,
        }
    }
}
