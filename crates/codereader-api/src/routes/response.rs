//! JSON:API-style response envelope and Job view models. See spec.md §6.

use codereader_store::{Job, Progress};
use serde::Serialize;

/// Wraps a successful response body as `{data: ...}`.
#[derive(Serialize)]
pub struct DataEnvelope<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `Progress` plus the derived `percentComplete` spec.md §6 says is never stored.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub total_files: u64,
    pub processed_files: u64,
    pub current_batch: u64,
    pub total_batches: u64,
    pub percent_complete: u64,
}

impl From<Progress> for ProgressView {
    fn from(progress: Progress) -> Self {
        Self {
            total_files: progress.total_files,
            processed_files: progress.processed_files,
            current_batch: progress.current_batch,
            total_batches: progress.total_batches,
            percent_complete: progress.percent_complete(),
        }
    }
}

/// A Job as rendered to API callers, with `progress.percentComplete` filled in.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub job_id: String,
    pub identifier: String,
    pub version: u32,
    pub repository_path: String,
    pub status: &'static str,
    pub progress: ProgressView,
    pub recommended_file_limit: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub error: Option<String>,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.job_id,
            identifier: job.identifier,
            version: job.version,
            repository_path: job.repository_path,
            status: status_str(job.status),
            progress: job.progress.into(),
            recommended_file_limit: job.recommended_file_limit,
            created_at: job.created_at,
            updated_at: job.updated_at,
            completed_at: job.completed_at,
            error: job.error,
        }
    }
}

fn status_str(status: codereader_store::JobStatus) -> &'static str {
    use codereader_store::JobStatus::{Completed, Failed, Pending, Processing};
    match status {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
        Failed => "failed",
    }
}
