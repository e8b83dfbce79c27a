//! Text-to-vector embedding: a provider abstraction over an OpenAI-compatible HTTP
//! API, and an [`Embedder`] orchestrator that batches and retries calls to it.
//! See spec.md §4.5.

pub mod embedder;
pub mod error;
pub mod http_provider;
pub mod traits;

pub use embedder::{Embedder, MAX_BATCH_SIZE, MAX_RETRIES};
pub use error::{EmbeddingError, EmbeddingResult};
pub use http_provider::HttpEmbeddingProvider;
pub use traits::EmbeddingProvider;

#[cfg(any(test, feature = "test-utils"))]
pub use embedder::test_utils::MockEmbeddingProvider;
