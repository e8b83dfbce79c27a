//! `JobService`: creates and queries jobs. See spec.md §4.7.

use crate::error::{IndexingError, IndexingResult};
use codereader_config::{JobConfig, JobConfigOverride, Validate, validate_identifier};
use codereader_store::{Job, JobStatus, Progress, Store};
use std::path::Path;

/// Caller-supplied input to [`JobService::create`].
#[derive(Debug, Clone)]
pub struct CreateJobInput {
    pub repository_path: String,
    pub identifier: String,
    pub config: Option<JobConfigOverride>,
}

/// A partial update to a job's progress counters; unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    pub total_files: Option<u64>,
    pub processed_files: Option<u64>,
    pub current_batch: Option<u64>,
    pub total_batches: Option<u64>,
}

/// Keeps the last three versions of a job per identifier, per spec.md §4.7.
const RETAINED_VERSIONS: i64 = 3;

/// Creates and queries jobs.
pub struct JobService {
    store: Store,
}

impl JobService {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a new job for `input`, running the Scanner synchronously to compute
    /// `totalFiles`, then pruning versions beyond the last three for the identifier.
    ///
    /// # Errors
    /// Returns `IndexingError::InvalidPath` if `repositoryPath` doesn't exist or isn't
    /// a directory, `IndexingError::Validation` for a malformed identifier or
    /// out-of-range config, or a wrapped store/scanner error.
    pub async fn create(&self, input: CreateJobInput) -> IndexingResult<Job> {
        let path = Path::new(&input.repository_path);
        if !path.is_dir() {
            return Err(IndexingError::InvalidPath(input.repository_path.clone()));
        }
        validate_identifier(&input.identifier).map_err(IndexingError::Config)?;

        let config = JobConfig::merge_over_defaults(input.config)?;
        config.validate()?;

        let next_version = self.next_version(&input.identifier).await?;

        let scan_result = codereader_scanner::scan(path, &config)?;
        let total_files = scan_result.files.len() as u64;
        let recommended_file_limit = config.recommended_file_limit();

        let now = chrono::Utc::now();
        let job = Job {
            job_id: uuid::Uuid::new_v4().to_string(),
            identifier: input.identifier.clone(),
            version: next_version,
            repository_path: input.repository_path,
            status: JobStatus::Pending,
            progress: Progress {
                total_files,
                processed_files: 0,
                current_batch: 0,
                total_batches: 0,
            },
            config,
            recommended_file_limit,
            created_at: now,
            updated_at: now,
            completed_at: None,
            error: None,
        };

        self.store.jobs.insert(&job).await?;
        self.prune_old_versions(&input.identifier).await?;
        Ok(job)
    }

    async fn next_version(&self, identifier: &str) -> IndexingResult<u32> {
        let sort = bson::doc! { "version": -1 };
        let latest = self
            .store
            .jobs
            .find(bson::doc! { "identifier": identifier }, Some(sort), Some(1))
            .await?;
        Ok(latest.first().map_or(1, |job| job.version + 1))
    }

    async fn prune_old_versions(&self, identifier: &str) -> IndexingResult<()> {
        let sort = bson::doc! { "version": -1 };
        let versions = self
            .store
            .jobs
            .find(bson::doc! { "identifier": identifier }, Some(sort), None)
            .await?;
        for job in versions.into_iter().skip(RETAINED_VERSIONS as usize) {
            self.store.prune_job(&job.job_id).await?;
        }
        Ok(())
    }

    /// Look up a job by id.
    ///
    /// # Errors
    /// Returns `IndexingError::JobNotFound` if no such job exists.
    pub async fn get_by_id(&self, job_id: &str) -> IndexingResult<Job> {
        self.store
            .jobs
            .find_one(bson::doc! { "jobId": job_id })
            .await?
            .ok_or_else(|| IndexingError::JobNotFound(job_id.to_string()))
    }

    /// Look up the latest version of a job by identifier.
    ///
    /// # Errors
    /// Returns `IndexingError::JobNotFound` if no job exists for `identifier`.
    pub async fn get_by_identifier(&self, identifier: &str) -> IndexingResult<Job> {
        let sort = bson::doc! { "version": -1 };
        let mut jobs = self
            .store
            .jobs
            .find(bson::doc! { "identifier": identifier }, Some(sort), Some(1))
            .await?;
        jobs.pop()
            .ok_or_else(|| IndexingError::JobNotFound(identifier.to_string()))
    }

    /// Transition a job's status, setting `completedAt`/`error` as the state machine
    /// requires.
    ///
    /// # Errors
    /// Returns `IndexingError::InvalidStatus` if the transition isn't allowed by
    /// [`JobStatus::can_transition_to`].
    pub async fn update_status(
        &self,
        job_id: &str,
        next: JobStatus,
        error: Option<String>,
    ) -> IndexingResult<()> {
        let job = self.get_by_id(job_id).await?;
        if !job.status.can_transition_to(next) {
            return Err(IndexingError::InvalidStatus(format!(
                "cannot transition from {:?} to {next:?}",
                job.status
            )));
        }

        let mut patch = bson::doc! {
            "status": status_str(next),
            "updatedAt": bson::DateTime::from(chrono::Utc::now()),
        };
        if next == JobStatus::Completed {
            patch.insert("completedAt", bson::DateTime::from(chrono::Utc::now()));
        }
        if next == JobStatus::Failed {
            patch.insert("error", error);
        }

        self.store
            .jobs
            .update_one(bson::doc! { "jobId": job_id }, patch)
            .await?;
        Ok(())
    }

    /// Apply a partial progress update.
    ///
    /// # Errors
    /// Returns a wrapped store error if the update fails.
    pub async fn update_progress(&self, job_id: &str, update: ProgressUpdate) -> IndexingResult<()> {
        let mut patch = bson::doc! { "updatedAt": bson::DateTime::from(chrono::Utc::now()) };
        if let Some(total_files) = update.total_files {
            patch.insert("progress.totalFiles", total_files as i64);
        }
        if let Some(processed_files) = update.processed_files {
            patch.insert("progress.processedFiles", processed_files as i64);
        }
        if let Some(current_batch) = update.current_batch {
            patch.insert("progress.currentBatch", current_batch as i64);
        }
        if let Some(total_batches) = update.total_batches {
            patch.insert("progress.totalBatches", total_batches as i64);
        }
        self.store
            .jobs
            .update_one(bson::doc! { "jobId": job_id }, patch)
            .await?;
        Ok(())
    }
}

fn status_str(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "pending",
        JobStatus::Processing => "processing",
        JobStatus::Completed => "completed",
        JobStatus::Failed => "failed",
    }
}
