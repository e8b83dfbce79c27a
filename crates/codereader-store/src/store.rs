//! The top-level `Store`: four collections plus index bootstrap and version pruning.

use crate::collection::Collection;
use crate::connection;
use crate::error::StoreResult;
use crate::models::{Chunk, Embedding, FileRecord, Job};
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};

/// Default logical database name (spec.md §6: "a single logical database").
pub const DEFAULT_DATABASE_NAME: &str = "code_reader";

/// Persists jobs, files, chunks and embeddings, and bootstraps their indexes.
#[derive(Clone)]
pub struct Store {
    #[allow(dead_code)]
    client: Client,
    database: Database,
    pub jobs: Collection<Job>,
    pub files: Collection<FileRecord>,
    pub chunks: Collection<Chunk>,
    pub embeddings: Collection<Embedding>,
}

impl Store {
    /// Connect using a prioritized list of candidate URIs and ensure required indexes
    /// exist.
    ///
    /// # Errors
    /// Returns `StoreError::Connection` if no candidate answers, or `StoreError::Index`
    /// if index creation fails.
    pub async fn connect(uris: &[String]) -> StoreResult<Self> {
        Self::connect_to_database(uris, DEFAULT_DATABASE_NAME).await
    }

    /// Connect to a specific database name (used by tests to isolate state).
    pub async fn connect_to_database(uris: &[String], database_name: &str) -> StoreResult<Self> {
        let client = connection::connect(uris).await?;
        let database = client.database(database_name);
        let store = Self {
            jobs: Collection::new(database.collection("jobs")),
            files: Collection::new(database.collection("files")),
            chunks: Collection::new(database.collection("chunks")),
            embeddings: Collection::new(database.collection("embeddings")),
            client,
            database,
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> StoreResult<()> {
        let jobs = self.database.collection::<Job>("jobs");
        jobs.create_index(
            IndexModel::builder()
                .keys(bson::doc! { "jobId": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;
        jobs.create_index(
            IndexModel::builder()
                .keys(bson::doc! { "identifier": 1, "version": -1 })
                .build(),
        )
        .await?;
        jobs.create_index(
            IndexModel::builder()
                .keys(bson::doc! { "status": 1 })
                .build(),
        )
        .await?;

        let files = self.database.collection::<FileRecord>("files");
        files
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! { "fileId": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;
        files
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! { "jobId": 1, "relativePath": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;
        files
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! { "jobId": 1, "batchNumber": 1 })
                    .build(),
            )
            .await?;

        let chunks = self.database.collection::<Chunk>("chunks");
        chunks
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! { "chunkId": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;
        chunks
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! { "jobId": 1, "relativePath": 1 })
                    .build(),
            )
            .await?;

        let embeddings = self.database.collection::<Embedding>("embeddings");
        embeddings
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! { "chunkId": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;
        embeddings
            .create_index(
                IndexModel::builder()
                    .keys(bson::doc! { "jobId": 1 })
                    .build(),
            )
            .await?;

        Ok(())
    }

    /// Delete every file/chunk/embedding and the job itself for one completed job,
    /// in the order spec.md §4.7/§9 require: embeddings → chunks → files → job.
    ///
    /// # Errors
    /// Returns a `StoreError` if any deletion fails.
    pub async fn prune_job(&self, job_id: &str) -> StoreResult<()> {
        self.embeddings
            .delete_many(bson::doc! { "jobId": job_id })
            .await?;
        self.chunks
            .delete_many(bson::doc! { "jobId": job_id })
            .await?;
        self.files
            .delete_many(bson::doc! { "jobId": job_id })
            .await?;
        self.jobs.delete_many(bson::doc! { "jobId": job_id }).await?;
        Ok(())
    }
}
