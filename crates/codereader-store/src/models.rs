//! Document models for the `jobs`, `files`, `chunks` and `embeddings` collections

use chrono::{DateTime, Utc};
use codereader_config::JobConfig;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an indexing job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether `self -> next` is an allowed transition per the job status state machine.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        use JobStatus::{Completed, Failed, Pending, Processing};
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Completed)
                | (Processing, Failed)
                | (Processing, Pending)
                | (Failed, Processing)
        )
    }
}

/// Per-job progress counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total_files: u64,
    pub processed_files: u64,
    pub current_batch: u64,
    pub total_batches: u64,
}

impl Progress {
    /// `round(currentBatch/totalBatches * 100)`, or 0 when `totalBatches == 0`.
    #[must_use]
    pub fn percent_complete(&self) -> u64 {
        if self.total_batches == 0 {
            return 0;
        }
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (self.current_batch as f64 / self.total_batches as f64 * 100.0).round() as u64;
        pct
    }
}

/// An indexing job for one `(identifier, version)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_id: String,
    pub identifier: String,
    pub version: u32,
    pub repository_path: String,
    pub status: JobStatus,
    pub progress: Progress,
    pub config: JobConfig,
    pub recommended_file_limit: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

/// A scanned source file belonging to a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub file_id: String,
    pub job_id: String,
    pub absolute_path: String,
    pub relative_path: String,
    pub language: String,
    pub size_bytes: u64,
    pub line_count: u64,
    pub content_hash: String,
    pub batch_number: u32,
}

/// A token-bounded span of a file's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub chunk_id: String,
    pub job_id: String,
    pub file_id: String,
    pub relative_path: String,
    pub content: String,
    pub start_line: u64,
    pub end_line: u64,
    pub token_count: u32,
}

/// A dense vector produced by the embedding provider for one Chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embedding {
    pub chunk_id: String,
    pub job_id: String,
    pub vector: Vec<f32>,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transitions_match_spec_state_machine() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Pending));
        assert!(JobStatus::Failed.can_transition_to(JobStatus::Processing));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Processing));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Completed));
    }

    #[test]
    fn percent_complete_is_zero_with_no_batches() {
        let progress = Progress::default();
        assert_eq!(progress.percent_complete(), 0);
    }

    #[test]
    fn percent_complete_rounds() {
        let progress = Progress {
            total_files: 10,
            processed_files: 5,
            current_batch: 1,
            total_batches: 3,
        };
        assert_eq!(progress.percent_complete(), 33);
    }
}
