//! Application bootstrap and service initialization.
//!
//! Grounded in the teacher's `bootstrap.rs` (codetriever-api/src/bootstrap.rs): one
//! `setup_*` function per service, composed by [`initialize_app_state`] in dependency
//! order.

use crate::state::AppState;
use codereader_config::ApplicationConfig;
use codereader_embeddings::{Embedder, HttpEmbeddingProvider};
use codereader_indexing::{JobAction, JobService, Processor, Queue};
use codereader_search::SearchService;
use codereader_store::Store;
use codereader_vector::BackendSelector;
use std::sync::Arc;
use tracing::info;

/// Bootstrap result type.
pub type BootstrapResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Connect to the document store and ensure its indexes exist.
///
/// # Errors
/// Returns an error if no candidate MongoDB URI answers, or index creation fails.
pub async fn setup_store(config: &ApplicationConfig) -> BootstrapResult<Store> {
    info!("connecting to document store...");
    let store = Store::connect(&config.mongodb_uris).await?;
    Ok(store)
}

/// Construct the embedding orchestrator over the configured HTTP provider. The model used
/// per call comes from each job's own `embeddingModel` config (spec.md §6), not from this
/// provider, so a single instance serves every job regardless of its configured model.
pub fn setup_embedder(config: &ApplicationConfig) -> Embedder {
    info!("initializing embedding provider");
    let base_url = config
        .openai_base_url
        .clone()
        .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
    let provider = HttpEmbeddingProvider::new(base_url, config.openai_api_key.clone());
    Embedder::new(Arc::new(provider))
}

/// Construct the vector backend selector.
#[must_use]
pub fn setup_backends(store: Store) -> Arc<BackendSelector> {
    Arc::new(BackendSelector::new(store))
}

/// Initialize every service and assemble [`AppState`].
///
/// # Errors
/// Returns an error if the document store cannot be reached.
pub async fn initialize_app_state(config: &ApplicationConfig) -> BootstrapResult<AppState> {
    let store = setup_store(config).await?;
    let embedder = setup_embedder(config);
    let backends = setup_backends(store.clone());

    let jobs = Arc::new(JobService::new(store.clone()));
    let processor = Arc::new(Processor::new(
        store.clone(),
        embedder.clone(),
        backends.clone(),
    ));

    let queue_processor = processor.clone();
    let queue = Arc::new(Queue::spawn(move |job_id, action| {
        let processor = queue_processor.clone();
        async move {
            let JobAction::Process { file_limit } = action;
            if let Err(err) = processor.process_job(&job_id, file_limit).await {
                tracing::error!(job_id, error = %err, "job processing failed");
            }
        }
    }));

    let search = Arc::new(SearchService::new(store, embedder, backends));

    info!("application state initialized");
    Ok(AppState::new(jobs, processor, queue, search))
}
