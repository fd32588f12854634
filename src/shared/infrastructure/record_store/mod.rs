// Port for the document database every module reads from and writes to.
//
// Purpose
// - Describe point reads, point writes, deletes, listings and live collection
//   subscriptions as a trait so the core never depends on a concrete backend.
//
// Boundaries
// - Documents are JSON objects addressed by (collection path, document id).
//   Sub-collections use slash separated paths such as "sections/S1/students".
// - No multi-document transactions. Callers get whatever consistency the backend offers.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordStoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("document {collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },

    #[error("document {collection}/{id} could not be decoded: {reason}")]
    Codec {
        collection: String,
        id: String,
        reason: String,
    },

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Json,
}

/// Full contents of a collection as pushed to subscribers, or the failure that
/// ended the subscription.
pub type Snapshot = Result<Vec<StoredDocument>, RecordStoreError>;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Json>, RecordStoreError>;

    /// Overwrites the document, creating it when absent.
    async fn set(&self, collection: &str, id: &str, data: Json) -> Result<(), RecordStoreError>;

    /// Creates the document, failing with `AlreadyExists` when the id is taken.
    async fn create(&self, collection: &str, id: &str, data: Json) -> Result<(), RecordStoreError>;

    /// Shallow-merges top level fields into an existing document, failing with
    /// `NotFound` when it is absent.
    async fn update(&self, collection: &str, id: &str, data: Json)
    -> Result<(), RecordStoreError>;

    /// Deleting a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), RecordStoreError>;

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, RecordStoreError>;

    /// Subscribes to full snapshots of a collection. The receiver holds the
    /// current snapshot immediately.
    async fn watch(&self, collection: &str) -> watch::Receiver<Snapshot>;
}

pub fn encode<T: Serialize>(collection: &str, id: &str, value: &T) -> Result<Json, RecordStoreError> {
    serde_json::to_value(value).map_err(|e| RecordStoreError::Codec {
        collection: collection.to_string(),
        id: id.to_string(),
        reason: e.to_string(),
    })
}

/// Decodes one document of a listing, logging and skipping it when unreadable.
pub fn decode_or_skip<T: DeserializeOwned>(collection: &str, id: &str, data: Json) -> Option<T> {
    match decode(collection, id, data) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(%collection, %id, %error, "skipping unreadable document");
            None
        }
    }
}

pub fn decode<T: DeserializeOwned>(
    collection: &str,
    id: &str,
    data: Json,
) -> Result<T, RecordStoreError> {
    serde_json::from_value(data).map_err(|e| RecordStoreError::Codec {
        collection: collection.to_string(),
        id: id.to_string(),
        reason: e.to_string(),
    })
}

/// Reads a document and decodes it into `T`.
pub async fn get_as<T, TStore>(
    store: &TStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, RecordStoreError>
where
    T: DeserializeOwned,
    TStore: RecordStore + ?Sized,
{
    match store.get(collection, id).await? {
        Some(data) => decode(collection, id, data).map(Some),
        None => Ok(None),
    }
}

pub mod in_memory;
