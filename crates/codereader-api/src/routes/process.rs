//! `POST /process`, `POST /process/stop`

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use codereader_indexing::JobAction;
use codereader_store::{Job, JobStatus};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub job_id: Option<String>,
    pub identifier: Option<String>,
    pub file_limit: Option<u64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessAccepted {
    pub job_id: String,
    pub queue_position: usize,
}

/// Resolve a job from an optional `jobId`/`identifier` pair, per spec.md §6: either field
/// is optional, but at least one must be present; `jobId` wins if both are given.
async fn resolve_job(
    state: &AppState,
    job_id: Option<&str>,
    identifier: Option<&str>,
) -> ApiResult<Job> {
    match (job_id, identifier) {
        (Some(job_id), _) => Ok(state.jobs.get_by_id(job_id).await?),
        (None, Some(identifier)) => Ok(state.jobs.get_by_identifier(identifier).await?),
        (None, None) => Err(ApiError::Validation(
            "either jobId or identifier must be provided".to_string(),
        )),
    }
}

pub async fn process(
    State(state): State<AppState>,
    Json(body): Json<ProcessRequest>,
) -> ApiResult<Json<ProcessAccepted>> {
    let job = resolve_job(&state, body.job_id.as_deref(), body.identifier.as_deref()).await?;

    if state.queue.is_job_queued(&job.job_id).await {
        return Err(ApiError::Conflict(format!(
            "job {} is already queued or processing",
            job.job_id
        )));
    }
    if !matches!(job.status, JobStatus::Pending | JobStatus::Failed) {
        return Err(ApiError::InvalidStatus(format!(
            "job {} must be pending or failed to process, was {:?}",
            job.job_id, job.status
        )));
    }

    state
        .queue
        .enqueue(
            job.job_id.clone(),
            JobAction::Process {
                file_limit: body.file_limit,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

    let queue_position = state.queue.queue_length().await;
    Ok(Json(ProcessAccepted {
        job_id: job.job_id,
        queue_position,
    }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRequest {
    pub job_id: Option<String>,
    pub identifier: Option<String>,
}

pub async fn stop(State(state): State<AppState>, Json(body): Json<StopRequest>) -> ApiResult<Json<()>> {
    let job = resolve_job(&state, body.job_id.as_deref(), body.identifier.as_deref()).await?;
    state.processor.stop_processing(&job.job_id).await;
    Ok(Json(()))
}
