//! Backend selection: a one-time per-process probe deciding between the native MongoDB
//! `$vectorSearch` index and the in-memory cosine fallback. See spec.md §4.9 step 4.

use crate::fallback::InMemoryCosineBackend;
use crate::native::MongoVectorBackend;
use crate::traits::VectorBackend;
use codereader_store::Store;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Lazily selects and caches the backend for the process's lifetime.
pub struct BackendSelector {
    store: Store,
    selected: OnceCell<Arc<dyn VectorBackend>>,
}

impl BackendSelector {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            selected: OnceCell::new(),
        }
    }

    /// Select and return the backend for `dimension`-sized vectors, probing once and
    /// caching the result for subsequent calls.
    pub async fn backend(&self, dimension: usize) -> Arc<dyn VectorBackend> {
        self.selected
            .get_or_init(|| async { self.probe(dimension).await })
            .await
            .clone()
    }

    async fn probe(&self, dimension: usize) -> Arc<dyn VectorBackend> {
        let native = MongoVectorBackend::new(self.store.clone());
        match native.is_ready(dimension).await {
            Ok(true) => {
                tracing::info!("selected native MongoDB vector search backend");
                return Arc::new(native);
            }
            Ok(false) => {
                tracing::info!(
                    "no ready native vector index found; falling back to in-memory cosine search"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to probe native vector index readiness; falling back to in-memory cosine search");
            }
        }
        Arc::new(InMemoryCosineBackend::new(self.store.clone()))
    }
}
