//! A thin, typed wrapper over `mongodb::Collection<T>` exposing exactly the operation
//! set spec.md §4.1 names: `insert`, `findOne`, `find`, `updateOne`, `deleteMany`,
//! `insertMany`.

use crate::error::StoreResult;
use bson::Document;
use futures_util::TryStreamExt;
use mongodb::options::{FindOptions, UpdateModifications};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A document collection, generic over its stored document type.
pub struct Collection<T: Send + Sync> {
    inner: mongodb::Collection<T>,
}

impl<T: Send + Sync> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    pub(crate) fn new(inner: mongodb::Collection<T>) -> Self {
        Self { inner }
    }

    /// Insert a single document.
    pub async fn insert(&self, document: &T) -> StoreResult<()> {
        self.inner.insert_one(document).await?;
        Ok(())
    }

    /// Insert many documents in one round trip.
    pub async fn insert_many(&self, documents: &[T]) -> StoreResult<()> {
        if documents.is_empty() {
            return Ok(());
        }
        self.inner.insert_many(documents).await?;
        Ok(())
    }

    /// Find the first document matching `filter`.
    pub async fn find_one(&self, filter: Document) -> StoreResult<Option<T>> {
        Ok(self.inner.find_one(filter).await?)
    }

    /// Find documents matching `filter`, optionally sorted and limited.
    pub async fn find(
        &self,
        filter: Document,
        sort: Option<Document>,
        limit: Option<i64>,
    ) -> StoreResult<Vec<T>> {
        let mut options = FindOptions::default();
        options.sort = sort;
        options.limit = limit;
        let cursor = self.inner.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Apply a `$set`-style patch document to the first document matching `filter`.
    pub async fn update_one(&self, filter: Document, patch: Document) -> StoreResult<()> {
        let update = UpdateModifications::Document(bson::doc! { "$set": patch });
        self.inner.update_one(filter, update).await?;
        Ok(())
    }

    /// Delete every document matching `filter`.
    pub async fn delete_many(&self, filter: Document) -> StoreResult<u64> {
        let result = self.inner.delete_many(filter).await?;
        Ok(result.deleted_count)
    }

    /// Run an aggregation `pipeline`, returning its raw result documents.
    pub async fn aggregate(&self, pipeline: Vec<Document>) -> StoreResult<Vec<Document>> {
        let cursor = self.inner.aggregate(pipeline).await?;
        Ok(cursor.try_collect().await?)
    }

    /// List the Atlas Search/Vector Search indexes defined on this collection, as raw
    /// `$listSearchIndexes` result documents (`name`, `type`, `status`, `queryable`,
    /// `latestDefinition`).
    pub async fn list_search_indexes(&self) -> StoreResult<Vec<Document>> {
        let cursor = self.inner.list_search_indexes().await?;
        Ok(cursor.try_collect().await?)
    }
}
