//! Native vector-index backend over MongoDB Atlas `$vectorSearch`. See spec.md §4.1
//! ("Optional vector index on `embeddings.vector`") and §4.9 steps 4-5. Embeddings are
//! already written into the Store's `embeddings` collection by the same atomic batch that
//! writes files/chunks (`codereader-indexing::Processor::process_batch`), so this backend
//! needs no upsert of its own and never falls out of sync with a rolled-back batch — unlike
//! a separate vector database would.

use crate::error::{VectorError, VectorResult};
use crate::traits::{ScoredChunk, VectorBackend};
use async_trait::async_trait;
use codereader_store::Store;

/// Name Atlas assigns the vector search index on `embeddings.vector`, per spec.md §4.1.
pub const VECTOR_INDEX_NAME: &str = "embeddings_vector_index";

/// `min(limit*10, 1000)` candidates considered by the native search path (spec.md §4.9
/// step 5).
#[must_use]
pub fn candidate_count(limit: usize) -> usize {
    (limit.saturating_mul(10)).min(1000)
}

/// Reads a vector index's readiness straight from `embeddings`, then runs `$vectorSearch`
/// aggregations against the same collection. Embeddings are written by the normal
/// `Store::embeddings` insert path, so `upsert` is a no-op here.
pub struct MongoVectorBackend {
    store: Store,
}

impl MongoVectorBackend {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VectorBackend for MongoVectorBackend {
    async fn is_ready(&self, dimension: usize) -> VectorResult<bool> {
        let indexes = self
            .store
            .embeddings
            .list_search_indexes()
            .await
            .map_err(|err| VectorError::Backend(err.to_string()))?;

        Ok(indexes.iter().any(|index| index_is_ready(index, dimension)))
    }

    async fn upsert(&self, _job_id: &str, _entries: &[(String, Vec<f32>)]) -> VectorResult<()> {
        // Embeddings are already persisted into the same collection this backend reads
        // from, as part of the atomic batch in `Processor::process_batch`; there is
        // nothing left to write here.
        Ok(())
    }

    async fn search(&self, job_id: &str, query: &[f32], limit: usize) -> VectorResult<Vec<ScoredChunk>> {
        #[allow(clippy::cast_possible_truncation)]
        let pipeline = vec![
            bson::doc! {
                "$vectorSearch": {
                    "index": VECTOR_INDEX_NAME,
                    "path": "vector",
                    "queryVector": query,
                    "numCandidates": candidate_count(limit) as i64,
                    "limit": limit as i64,
                    "filter": { "jobId": job_id },
                }
            },
            bson::doc! {
                "$project": {
                    "_id": 0,
                    "chunkId": 1,
                    "score": { "$meta": "vectorSearchScore" },
                }
            },
        ];

        let results = self
            .store
            .embeddings
            .aggregate(pipeline)
            .await
            .map_err(|err| VectorError::Backend(err.to_string()))?;

        Ok(results
            .into_iter()
            .filter_map(|doc| {
                let chunk_id = doc.get_str("chunkId").ok()?.to_string();
                let score = doc.get_f64("score").ok()? as f32;
                Some(ScoredChunk { chunk_id, score })
            })
            .collect())
    }
}

/// Whether a raw `$listSearchIndexes` result document describes a queryable vector index
/// over the `vector` field at `dimension`, using cosine similarity — spec.md §4.1's
/// "dimension must equal the embedding vector length, similarity cosine" and §4.9's
/// "READY/ACTIVE" status check.
fn index_is_ready(index: &bson::Document, dimension: usize) -> bool {
    let ready = matches!(index.get_str("status"), Ok("READY" | "ACTIVE"))
        || index.get_bool("queryable").unwrap_or(false);
    if !ready {
        return false;
    }

    let Some(fields) = index
        .get_document("latestDefinition")
        .ok()
        .and_then(|def| def.get_array("fields").ok())
    else {
        return false;
    };

    fields.iter().filter_map(bson::Bson::as_document).any(|field| {
        field.get_str("path") == Ok("vector")
            && field.get_str("similarity") == Ok("cosine")
            && field.get_i32("numDimensions").map(|d| d as usize) == Ok(dimension)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_count_is_capped_at_1000() {
        assert_eq!(candidate_count(10), 100);
        assert_eq!(candidate_count(200), 1000);
    }

    #[test]
    fn index_is_ready_requires_matching_dimension_and_similarity() {
        let index = bson::doc! {
            "status": "READY",
            "queryable": true,
            "latestDefinition": {
                "fields": [
                    { "type": "vector", "path": "vector", "numDimensions": 1536, "similarity": "cosine" },
                ],
            },
        };
        assert!(index_is_ready(&index, 1536));
        assert!(!index_is_ready(&index, 384));
    }

    #[test]
    fn index_is_ready_rejects_non_queryable_index() {
        let index = bson::doc! {
            "status": "PENDING",
            "queryable": false,
            "latestDefinition": {
                "fields": [
                    { "type": "vector", "path": "vector", "numDimensions": 1536, "similarity": "cosine" },
                ],
            },
        };
        assert!(!index_is_ready(&index, 1536));
    }

    #[test]
    fn index_is_ready_rejects_wrong_path() {
        let index = bson::doc! {
            "status": "READY",
            "queryable": true,
            "latestDefinition": {
                "fields": [
                    { "type": "vector", "path": "embedding", "numDimensions": 1536, "similarity": "cosine" },
                ],
            },
        };
        assert!(!index_is_ready(&index, 1536));
    }
}
