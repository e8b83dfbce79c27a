//! An OpenAI-compatible HTTP embeddings provider.

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::traits::EmbeddingProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Calls `{base_url}/embeddings` with `{model, input}` and expects an OpenAI-shaped
/// `{data: [{embedding, index}]}` response. `model` is supplied per call (by the caller's
/// job config, spec.md §6), not fixed at construction, so one provider instance serves
/// every job regardless of its configured `embeddingModel`.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpEmbeddingProvider {
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String], model: &str) -> EmbeddingResult<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let body = EmbeddingRequest { model, input: texts };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| EmbeddingError::Network(err.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(EmbeddingError::RateLimited);
        }
        if status.is_server_error() {
            return Err(EmbeddingError::ServerError(status.to_string()));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Provider(format!("{status}: {detail}")));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| EmbeddingError::Provider(err.to_string()))?;

        let mut ordered = vec![Vec::new(); texts.len()];
        for datum in parsed.data {
            if datum.index < ordered.len() {
                ordered[datum.index] = datum.embedding;
            }
        }
        Ok(ordered)
    }
}
