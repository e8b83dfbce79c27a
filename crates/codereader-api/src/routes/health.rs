//! `GET /health`

use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct Services {
    database: &'static str,
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    services: Services,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.jobs.get_by_id("__health_check__").await {
        Err(codereader_indexing::IndexingError::JobNotFound(_)) => "up",
        Err(_) => "down",
        Ok(_) => "up",
    };
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now(),
        services: Services { database },
    })
}
