//! Batches texts to the embedding provider with retry/backoff on rate-limit and
//! transient errors. See spec.md §4.5.

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::traits::EmbeddingProvider;
use std::sync::Arc;
use std::time::Duration;

/// Maximum texts sent to the provider in a single call.
pub const MAX_BATCH_SIZE: usize = 20;
/// Maximum retries per provider batch call.
pub const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Embeds arbitrarily many texts by fanning out to the provider in
/// [`MAX_BATCH_SIZE`]-sized groups, retrying each group on transient failure.
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
}

impl Embedder {
    #[must_use]
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Embed every text in `texts` with `model`, preserving input order end-to-end: the
    /// vector for input position *i* is returned at result index *i*. `model` comes from
    /// the calling job's `embeddingModel` config (spec.md §6), not from the provider.
    ///
    /// # Errors
    /// Returns the last `EmbeddingError` if a batch exhausts its retries or fails with
    /// a non-retryable error.
    pub async fn embed_all(&self, texts: &[String], model: &str) -> EmbeddingResult<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH_SIZE) {
            let embedded = self.embed_batch_with_retry(batch, model).await?;
            results.extend(embedded);
        }
        Ok(results)
    }

    async fn embed_batch_with_retry(&self, batch: &[String], model: &str) -> EmbeddingResult<Vec<Vec<f32>>> {
        let mut backoff = INITIAL_BACKOFF;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.provider.embed_batch(batch, model).await {
                Ok(vectors) => return Ok(vectors),
                Err(err) if err.is_retryable() && attempt < MAX_RETRIES => {
                    tracing::warn!(
                        attempt,
                        backoff_secs = backoff.as_secs(),
                        error = %err,
                        "embedding batch failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// A configurable test double, grounded in the teacher's `MockEmbeddingProvider`
/// (codetriever-embeddings/src/embedding/service.rs).
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils {
    use super::{EmbeddingError, EmbeddingProvider, EmbeddingResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns deterministic fixed-dimension vectors; can be configured to fail its
    /// first N calls (simulating rate-limiting) via [`MockEmbeddingProvider::with_failures`].
    pub struct MockEmbeddingProvider {
        dimension: usize,
        failures_remaining: AtomicUsize,
        calls: Mutex<Vec<(usize, String)>>,
    }

    impl MockEmbeddingProvider {
        #[must_use]
        pub fn new(dimension: usize) -> Self {
            Self {
                dimension,
                failures_remaining: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
            }
        }

        #[must_use]
        pub fn with_failures(mut self, count: usize) -> Self {
            self.failures_remaining = AtomicUsize::new(count);
            self
        }

        #[must_use]
        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or(0)
        }

        /// The `model` argument passed on each recorded call, in call order.
        #[must_use]
        pub fn models_seen(&self) -> Vec<String> {
            self.calls
                .lock()
                .map(|c| c.iter().map(|(_, model)| model.clone()).collect())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for MockEmbeddingProvider {
        async fn embed_batch(&self, texts: &[String], model: &str) -> EmbeddingResult<Vec<Vec<f32>>> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((texts.len(), model.to_string()));
            }
            let remaining = self.failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures_remaining.fetch_sub(1, Ordering::SeqCst);
                return Err(EmbeddingError::RateLimited);
            }
            Ok(texts
                .iter()
                .enumerate()
                .map(|(i, _)| vec![i as f32; self.dimension])
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::MockEmbeddingProvider;
    use super::*;

    #[tokio::test]
    async fn embeds_a_small_batch_in_one_call() {
        let provider = Arc::new(MockEmbeddingProvider::new(4));
        let embedder = Embedder::new(provider);
        let texts = vec!["a".to_string(), "b".to_string()];
        let result = embedder.embed_all(&texts, "text-embedding-3-small").await.expect("embeds");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].len(), 4);
    }

    #[tokio::test]
    async fn splits_into_batches_of_at_most_twenty() {
        let provider = Arc::new(MockEmbeddingProvider::new(2));
        let embedder = Embedder::new(provider.clone());
        let texts: Vec<String> = (0..45).map(|i| format!("text-{i}")).collect();
        let result = embedder.embed_all(&texts, "text-embedding-3-small").await.expect("embeds");
        assert_eq!(result.len(), 45);
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn preserves_input_order_across_batches() {
        let provider = Arc::new(MockEmbeddingProvider::new(1));
        let embedder = Embedder::new(provider);
        let texts: Vec<String> = (0..25).map(|i| format!("text-{i}")).collect();
        let result = embedder.embed_all(&texts, "text-embedding-3-small").await.expect("embeds");
        for (i, vector) in result.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected_index = (i % MAX_BATCH_SIZE) as f32;
            assert_eq!(vector[0], expected_index);
        }
    }

    #[tokio::test]
    async fn retries_on_rate_limit_and_succeeds() {
        let provider = Arc::new(MockEmbeddingProvider::new(2).with_failures(1));
        let embedder = Embedder::new(provider.clone());
        let texts = vec!["only".to_string()];
        let result = embedder
            .embed_all(&texts, "text-embedding-3-small")
            .await
            .expect("eventually succeeds");
        assert_eq!(result.len(), 1);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn passes_the_caller_supplied_model_to_every_batch() {
        let provider = Arc::new(MockEmbeddingProvider::new(2));
        let embedder = Embedder::new(provider.clone());
        let texts: Vec<String> = (0..25).map(|i| format!("text-{i}")).collect();
        embedder.embed_all(&texts, "custom-model").await.expect("embeds");
        assert!(provider.models_seen().iter().all(|m| m == "custom-model"));
    }
}
