//! The `VectorBackend` abstraction: two concrete variants exist (native MongoDB
//! `$vectorSearch` index, in-memory cosine fallback); [`crate::probe::BackendSelector`]
//! picks one per process.
//! Grounded in the teacher's `VectorStorage` trait
//! (codetriever-vector-data/src/storage/traits.rs), narrowed to spec.md §4.9's simpler
//! contract (no tenant/commit metadata, no chunk-storage side-channel — chunks and
//! embeddings are both already persisted in the Store).

use crate::error::VectorResult;
use async_trait::async_trait;

/// One scored match returned by a vector search: a chunk id and its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk_id: String,
    pub score: f32,
}

/// A pluggable vector search backend.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Whether a native vector index is present and reports READY/ACTIVE status for
    /// `dimension`-sized vectors under cosine similarity.
    async fn is_ready(&self, dimension: usize) -> VectorResult<bool>;

    /// Upsert embeddings for a job into the backend, for backends that maintain their
    /// own index (no-op for the in-memory fallback, which reads the Store directly).
    async fn upsert(
        &self,
        job_id: &str,
        entries: &[(String, Vec<f32>)],
    ) -> VectorResult<()>;

    /// Search for the `limit` nearest chunks to `query` within job `job_id`.
    async fn search(
        &self,
        job_id: &str,
        query: &[f32],
        limit: usize,
    ) -> VectorResult<Vec<ScoredChunk>>;
}

/// `cos(a,b) = (a·b) / (||a||·||b||)`. Returns 0 if either norm is zero.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vector_is_one() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_opposite_vector_is_negative_one() {
        let v = vec![1.0, 2.0, 3.0];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&v, &neg) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let v = vec![1.0, 2.0, 3.0];
        let zero = vec![0.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
    }
}
