pub mod health;
pub mod process;
pub mod response;
pub mod search;
pub mod task;

use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

/// Assemble the full HTTP surface described in spec.md §6.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/task", post(task::create_task))
        .route("/task/{jobId}", get(task::get_task))
        .route("/task/by-identifier/{identifier}", get(task::get_task_by_identifier))
        .route("/process", post(process::process))
        .route("/process/stop", post(process::stop))
        .route("/search_code", post(search::search_code))
        .with_state(state)
}
