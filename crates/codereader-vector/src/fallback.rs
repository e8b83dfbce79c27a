//! In-memory cosine-similarity fallback used when no native vector index is ready.
//! Loads all embeddings for a job from the Store, scores each against the query, and
//! returns the top `limit`. See spec.md §4.9 and the open question in spec.md §9 about
//! this path's O(N) memory/CPU cost for large corpora (preserved as specified).

use crate::error::{VectorError, VectorResult};
use crate::traits::{ScoredChunk, VectorBackend, cosine_similarity};
use async_trait::async_trait;
use codereader_store::Store;

/// Reads straight from the `embeddings` collection; has no index of its own to keep
/// ready, so [`VectorBackend::is_ready`] always reports `false` and `upsert` is a
/// no-op.
pub struct InMemoryCosineBackend {
    store: Store,
}

impl InMemoryCosineBackend {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VectorBackend for InMemoryCosineBackend {
    async fn is_ready(&self, _dimension: usize) -> VectorResult<bool> {
        Ok(false)
    }

    async fn upsert(&self, _job_id: &str, _entries: &[(String, Vec<f32>)]) -> VectorResult<()> {
        Ok(())
    }

    async fn search(
        &self,
        job_id: &str,
        query: &[f32],
        limit: usize,
    ) -> VectorResult<Vec<ScoredChunk>> {
        let embeddings = self
            .store
            .embeddings
            .find(bson::doc! { "jobId": job_id }, None, None)
            .await
            .map_err(|err| VectorError::Backend(err.to_string()))?;

        let mut scored: Vec<ScoredChunk> = embeddings
            .into_iter()
            .map(|embedding| ScoredChunk {
                chunk_id: embedding.chunk_id,
                score: cosine_similarity(query, &embedding.vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }
}
