//! `POST /task`, `GET /task/{jobId}`, `GET /task/by-identifier/{identifier}`

use crate::error::ApiResult;
use crate::routes::response::{DataEnvelope, JobView};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use codereader_config::JobConfigOverride;
use codereader_indexing::CreateJobInput;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub repository_path: String,
    pub identifier: String,
    pub config: Option<JobConfigOverride>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Json(body): Json<CreateTaskRequest>,
) -> ApiResult<Json<DataEnvelope<JobView>>> {
    let job = state
        .jobs
        .create(CreateJobInput {
            repository_path: body.repository_path,
            identifier: body.identifier,
            config: body.config,
        })
        .await?;
    Ok(Json(DataEnvelope::new(job.into())))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<DataEnvelope<JobView>>> {
    let job = state.jobs.get_by_id(&job_id).await?;
    Ok(Json(DataEnvelope::new(job.into())))
}

pub async fn get_task_by_identifier(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> ApiResult<Json<DataEnvelope<JobView>>> {
    let job = state.jobs.get_by_identifier(&identifier).await?;
    Ok(Json(DataEnvelope::new(job.into())))
}
