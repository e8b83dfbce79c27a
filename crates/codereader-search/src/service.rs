//! `SearchService`: embeds a query, picks a vector backend, and assembles scored
//! chunks. See spec.md §4.9. Grounded in the teacher's `Search`
//! (codetriever-search/src/searching/search.rs), simplified to the single-tenant,
//! no-repository-metadata shape spec.md's data model calls for.

use crate::error::{SearchError, SearchResult};
use codereader_embeddings::Embedder;
use codereader_store::{JobStatus, Store};
use codereader_vector::BackendSelector;
use std::sync::Arc;

/// Default result count when the caller doesn't specify one.
pub const DEFAULT_LIMIT: usize = 10;
/// Default minimum similarity score when the caller doesn't specify one.
pub const DEFAULT_MIN_SCORE: f32 = 0.7;

/// Identifies which job to search: a specific job id, or the latest version of an
/// identifier.
#[derive(Debug, Clone)]
pub enum JobRef {
    JobId(String),
    Identifier(String),
}

/// One scored match, ready to hand back to the API layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub relative_path: String,
    pub content: String,
    pub start_line: u64,
    pub end_line: u64,
    pub score: f32,
}

/// Orchestrates query embedding, vector search, and chunk assembly.
pub struct SearchService {
    store: Store,
    embedder: Embedder,
    backends: Arc<BackendSelector>,
}

impl SearchService {
    #[must_use]
    pub fn new(store: Store, embedder: Embedder, backends: Arc<BackendSelector>) -> Self {
        Self {
            store,
            embedder,
            backends,
        }
    }

    fn validate(query: &str, limit: usize, min_score: f32) -> SearchResult<()> {
        if query.trim().is_empty() {
            return Err(SearchError::Validation("query must not be empty".to_string()));
        }
        if !(1..=100).contains(&limit) {
            return Err(SearchError::Validation("limit must be between 1 and 100".to_string()));
        }
        if !(0.0..=1.0).contains(&min_score) {
            return Err(SearchError::Validation("minScore must be between 0 and 1".to_string()));
        }
        Ok(())
    }

    async fn resolve_job(&self, job_ref: &JobRef) -> SearchResult<codereader_store::Job> {
        let job = match job_ref {
            JobRef::JobId(job_id) => self.store.jobs.find_one(bson::doc! { "jobId": job_id }).await?,
            JobRef::Identifier(identifier) => {
                let sort = bson::doc! { "version": -1 };
                let mut jobs = self
                    .store
                    .jobs
                    .find(bson::doc! { "identifier": identifier }, Some(sort), Some(1))
                    .await?;
                jobs.pop()
            }
        };
        job.ok_or_else(|| {
            let label = match job_ref {
                JobRef::JobId(id) => id.clone(),
                JobRef::Identifier(id) => id.clone(),
            };
            SearchError::JobNotFound(label)
        })
    }

    /// Run a search against `job_ref`'s indexed chunks.
    ///
    /// # Errors
    /// Returns `SearchError::Validation` for bad inputs, `SearchError::JobNotFound` if
    /// the job doesn't exist, or a wrapped embedding/vector/store error on failure.
    pub async fn search(
        &self,
        query: &str,
        job_ref: &JobRef,
        limit: usize,
        min_score: f32,
    ) -> SearchResult<Vec<SearchMatch>> {
        Self::validate(query, limit, min_score)?;

        let job = self.resolve_job(job_ref).await?;
        if job.status == JobStatus::Pending {
            tracing::debug!(job_id = %job.job_id, "searching a job that has not started processing yet");
        }

        let embeddings = self
            .embedder
            .embed_all(std::slice::from_ref(&query.to_string()), &job.config.embedding_model)
            .await?;
        let query_vector = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::Validation("embedding provider returned no vector".to_string()))?;

        let backend = self.backends.backend(query_vector.len()).await;
        let scored = backend.search(&job.job_id, &query_vector, limit).await?;

        let mut matches = Vec::with_capacity(scored.len());
        for candidate in scored {
            if candidate.score < min_score {
                continue;
            }
            let Some(chunk) = self
                .store
                .chunks
                .find_one(bson::doc! { "chunkId": &candidate.chunk_id })
                .await?
            else {
                continue;
            };
            matches.push(SearchMatch {
                relative_path: chunk.relative_path,
                content: chunk.content,
                start_line: chunk.start_line,
                end_line: chunk.end_line,
                score: candidate.score,
            });
        }

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(limit);
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_query() {
        let err = SearchService::validate("", DEFAULT_LIMIT, DEFAULT_MIN_SCORE).unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
    }

    #[test]
    fn rejects_out_of_range_limit() {
        assert!(SearchService::validate("fn main", 0, DEFAULT_MIN_SCORE).is_err());
        assert!(SearchService::validate("fn main", 101, DEFAULT_MIN_SCORE).is_err());
        assert!(SearchService::validate("fn main", 100, DEFAULT_MIN_SCORE).is_ok());
    }

    #[test]
    fn rejects_out_of_range_min_score() {
        assert!(SearchService::validate("fn main", DEFAULT_LIMIT, -0.1).is_err());
        assert!(SearchService::validate("fn main", DEFAULT_LIMIT, 1.1).is_err());
        assert!(SearchService::validate("fn main", DEFAULT_LIMIT, 1.0).is_ok());
    }
}
