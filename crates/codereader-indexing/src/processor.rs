//! `Processor`: runs a job's scan → extract → chunk → embed → persist pipeline in
//! atomic batches, with rollback on failure. See spec.md §4.8.

use crate::error::{IndexingError, IndexingResult};
use crate::job_service::{JobService, ProgressUpdate};
use codereader_embeddings::Embedder;
use codereader_parsing::{chunk as chunk_content, extract};
use codereader_scanner::{ScannedFile, partition_into_batches, scan};
use codereader_store::{Chunk, Embedding, FileRecord, Job, JobStatus, Store};
use codereader_vector::BackendSelector;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Runs the batch pipeline for one job at a time (the Queue enforces that
/// constraint; `Processor` itself is safe to share across jobs).
pub struct Processor {
    store: Store,
    jobs: JobService,
    embedder: Embedder,
    backends: Arc<BackendSelector>,
    cancellation_flags: Mutex<HashMap<String, Arc<AtomicBool>>>,
}

impl Processor {
    #[must_use]
    pub fn new(store: Store, embedder: Embedder, backends: Arc<BackendSelector>) -> Self {
        Self {
            jobs: JobService::new(store.clone()),
            store,
            embedder,
            backends,
            cancellation_flags: Mutex::new(HashMap::new()),
        }
    }

    /// Set the cancellation flag a running `processJob` checks between batches.
    pub async fn stop_processing(&self, job_id: &str) {
        let flags = self.cancellation_flags.lock().await;
        if let Some(flag) = flags.get(job_id) {
            flag.store(true, Ordering::SeqCst);
        }
    }

    async fn cancellation_flag(&self, job_id: &str) -> Arc<AtomicBool> {
        let mut flags = self.cancellation_flags.lock().await;
        flags
            .entry(job_id.to_string())
            .or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone()
    }

    /// Run the full batch pipeline for `job_id`, starting from `progress.currentBatch`.
    ///
    /// # Errors
    /// Returns `IndexingError::InvalidStatus` if the job isn't in `{pending, failed}`,
    /// or a wrapped scanner/store error.
    pub async fn process_job(&self, job_id: &str, file_limit: Option<u64>) -> IndexingResult<()> {
        let job = self.jobs.get_by_id(job_id).await?;
        if !matches!(job.status, JobStatus::Pending | JobStatus::Failed) {
            return Err(IndexingError::InvalidStatus(format!(
                "job {job_id} is {:?}, not pending or failed",
                job.status
            )));
        }

        self.jobs
            .update_status(job_id, JobStatus::Processing, None)
            .await?;

        let scan_result = scan(Path::new(&job.repository_path), &job.config)?;
        if scan_result.files.is_empty() {
            self.jobs
                .update_status(job_id, JobStatus::Completed, None)
                .await?;
            return Ok(());
        }

        let batches = partition_into_batches(&scan_result.files, job.config.batch_size);
        #[allow(clippy::cast_possible_truncation)]
        let total_files = scan_result.files.len() as u64;
        #[allow(clippy::cast_possible_truncation)]
        let total_batches = batches.len() as u64;
        self.jobs
            .update_progress(
                job_id,
                ProgressUpdate {
                    total_files: Some(total_files),
                    total_batches: Some(total_batches),
                    ..Default::default()
                },
            )
            .await?;

        let cancel = self.cancellation_flag(job_id).await;
        cancel.store(false, Ordering::SeqCst);

        let start_index = job.progress.current_batch as usize;
        let batch_size = u64::from(job.config.batch_size);

        for (i, batch) in batches.iter().enumerate().skip(start_index) {
            let reached_file_limit = file_limit.is_some_and(|limit| {
                #[allow(clippy::cast_possible_truncation)]
                let processed_so_far = (i as u64) * batch_size;
                processed_so_far >= limit
            });
            if cancel.load(Ordering::SeqCst) || reached_file_limit {
                self.jobs
                    .update_status(job_id, JobStatus::Pending, None)
                    .await?;
                return Ok(());
            }

            #[allow(clippy::cast_possible_truncation)]
            let batch_number = (i + 1) as u32;
            match self.process_batch(&job, batch, batch_number).await {
                Ok(()) => {
                    #[allow(clippy::cast_possible_truncation)]
                    let processed_files = total_files.min((i as u64 + 1) * batch_size);
                    self.jobs
                        .update_progress(
                            job_id,
                            ProgressUpdate {
                                current_batch: Some(i as u64 + 1),
                                processed_files: Some(processed_files),
                                ..Default::default()
                            },
                        )
                        .await?;
                    tokio::task::yield_now().await;
                }
                Err(err) => {
                    self.rollback_batch(job_id, batch_number).await;
                    self.jobs
                        .update_status(job_id, JobStatus::Failed, Some(err.to_string()))
                        .await?;
                    return Err(err);
                }
            }
        }

        self.jobs
            .update_progress(
                job_id,
                ProgressUpdate {
                    processed_files: Some(total_files),
                    ..Default::default()
                },
            )
            .await?;
        self.jobs
            .update_status(job_id, JobStatus::Completed, None)
            .await?;
        Ok(())
    }

    async fn process_batch(
        &self,
        job: &Job,
        batch: &[ScannedFile],
        batch_number: u32,
    ) -> IndexingResult<()> {
        let mut files = Vec::new();
        let mut chunks = Vec::new();

        for scanned in batch {
            let bytes = match std::fs::read(&scanned.absolute_path) {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(path = %scanned.relative_path, error = %err, "skipping unreadable file");
                    continue;
                }
            };
            let Some(extracted) = extract(&bytes, &scanned.relative_path) else {
                tracing::debug!(path = %scanned.relative_path, "skipping binary file");
                continue;
            };

            let file_id = uuid::Uuid::new_v4().to_string();
            let spans = chunk_content(
                &extracted.content,
                &extracted.language,
                job.config.chunk_size,
                job.config.chunk_overlap,
            )?;

            for span in spans {
                chunks.push(Chunk {
                    chunk_id: uuid::Uuid::new_v4().to_string(),
                    job_id: job.job_id.clone(),
                    file_id: file_id.clone(),
                    relative_path: scanned.relative_path.clone(),
                    content: span.content,
                    start_line: span.start_line,
                    end_line: span.end_line,
                    token_count: span.token_count,
                });
            }

            files.push(FileRecord {
                file_id,
                job_id: job.job_id.clone(),
                absolute_path: scanned.absolute_path.display().to_string(),
                relative_path: scanned.relative_path.clone(),
                language: extracted.language,
                size_bytes: extracted.size_bytes,
                line_count: extracted.line_count,
                content_hash: extracted.content_hash,
                batch_number,
            });
        }

        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self
            .embedder
            .embed_all(&texts, &job.config.embedding_model)
            .await?;

        let now = chrono::Utc::now();
        let embeddings: Vec<Embedding> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| Embedding {
                chunk_id: chunk.chunk_id.clone(),
                job_id: job.job_id.clone(),
                vector,
                model: job.config.embedding_model.clone(),
                created_at: now,
            })
            .collect();

        self.store.files.insert_many(&files).await?;
        self.store.chunks.insert_many(&chunks).await?;
        self.store.embeddings.insert_many(&embeddings).await?;

        let backend = self.backends.backend(embeddings[0].vector.len()).await;
        let entries: Vec<(String, Vec<f32>)> = embeddings
            .iter()
            .map(|e| (e.chunk_id.clone(), e.vector.clone()))
            .collect();
        backend.upsert(&job.job_id, &entries).await?;

        Ok(())
    }

    /// Delete every file/chunk/embedding written for `(job_id, batch_number)`.
    /// Failures are logged but never propagated, per spec.md §4.8.
    async fn rollback_batch(&self, job_id: &str, batch_number: u32) {
        let files = match self
            .store
            .files
            .find(
                bson::doc! { "jobId": job_id, "batchNumber": batch_number },
                None,
                None,
            )
            .await
        {
            Ok(files) => files,
            Err(err) => {
                tracing::error!(job_id, batch_number, error = %err, "rollback: failed to load files");
                return;
            }
        };
        let file_ids: Vec<String> = files.iter().map(|f| f.file_id.clone()).collect();

        let chunks = match self
            .store
            .chunks
            .find(bson::doc! { "fileId": { "$in": &file_ids } }, None, None)
            .await
        {
            Ok(chunks) => chunks,
            Err(err) => {
                tracing::error!(job_id, batch_number, error = %err, "rollback: failed to load chunks");
                Vec::new()
            }
        };
        let chunk_ids: Vec<String> = chunks.iter().map(|c| c.chunk_id.clone()).collect();

        if let Err(err) = self
            .store
            .embeddings
            .delete_many(bson::doc! { "chunkId": { "$in": &chunk_ids } })
            .await
        {
            tracing::error!(job_id, batch_number, error = %err, "rollback: failed to delete embeddings");
        }
        if let Err(err) = self
            .store
            .chunks
            .delete_many(bson::doc! { "fileId": { "$in": &file_ids } })
            .await
        {
            tracing::error!(job_id, batch_number, error = %err, "rollback: failed to delete chunks");
        }
        if let Err(err) = self
            .store
            .files
            .delete_many(bson::doc! { "jobId": job_id, "batchNumber": batch_number })
            .await
        {
            tracing::error!(job_id, batch_number, error = %err, "rollback: failed to delete files");
        }
    }
}
