//! `EmbeddingProvider`: the external collaborator boundary for turning text into
//! vectors. Grounded in the teacher's `EmbeddingProvider` trait
//! (codetriever-embeddings/src/embedding/traits.rs); here the concrete implementation
//! calls out over HTTP rather than loading a local model, per spec.md §4.5.

use crate::error::EmbeddingResult;
use async_trait::async_trait;

/// A single call's worth of embeddings, one vector per input text in the same order.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts with `model` (at most 20 per spec.md §4.5; batching above
    /// that is the caller's responsibility). `model` is per-call, not fixed at
    /// construction, so a single provider instance can serve jobs configured with
    /// different `embeddingModel` overrides (spec.md §6).
    async fn embed_batch(&self, texts: &[String], model: &str) -> EmbeddingResult<Vec<Vec<f32>>>;
}
