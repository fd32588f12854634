// In memory implementation of the RecordStore port.
//
// Purpose
// - Support handler tests and local development without a document database.
//
// Responsibilities
// - Store documents per collection, ordered by id.
// - Push a full snapshot to every watcher of a collection after each write.
// - Simulate outages: the whole store (toggle_offline) or one collection prefix.

use crate::shared::infrastructure::record_store::{
    RecordStore, RecordStoreError, Snapshot, StoredDocument,
};
use serde_json::Value as Json;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::{Mutex, RwLock, watch};

type Collection = BTreeMap<String, Json>;

#[derive(Default)]
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<String, Collection>>,
    watchers: Mutex<HashMap<String, watch::Sender<Snapshot>>>,
    failing_prefixes: RwLock<HashSet<String>>,
    is_offline: bool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Rejects every operation on collections whose path starts with `prefix`.
    pub async fn fail_collection(&self, prefix: impl Into<String>) {
        self.failing_prefixes.write().await.insert(prefix.into());
    }

    pub async fn restore_collection(&self, prefix: &str) {
        self.failing_prefixes.write().await.remove(prefix);
    }

    /// Pushes an error snapshot to the current watchers of `collection`.
    pub async fn break_subscription(&self, collection: &str, reason: impl Into<String>) {
        let watchers = self.watchers.lock().await;
        if let Some(sender) = watchers.get(collection) {
            let _previous = sender.send_replace(Err(RecordStoreError::Backend(reason.into())));
        }
    }

    async fn check_available(&self, collection: &str) -> Result<(), RecordStoreError> {
        if self.is_offline {
            return Err(RecordStoreError::Backend("Record store offline".into()));
        }
        let failing = self.failing_prefixes.read().await;
        if failing.iter().any(|prefix| collection.starts_with(prefix.as_str())) {
            return Err(RecordStoreError::Backend(format!(
                "collection {collection} unavailable"
            )));
        }
        Ok(())
    }

    async fn notify(&self, collection: &str, documents: &Collection) {
        let watchers = self.watchers.lock().await;
        if let Some(sender) = watchers.get(collection) {
            let _previous = sender.send_replace(Ok(to_snapshot(documents)));
        }
    }

    async fn write<F>(&self, collection: &str, id: &str, mutate: F) -> Result<(), RecordStoreError>
    where
        F: FnOnce(&mut Collection) -> Result<(), RecordStoreError> + Send,
    {
        self.check_available(collection).await?;
        let mut guard = self.collections.write().await;
        let documents = guard.entry(collection.to_string()).or_default();
        mutate(documents)?;
        tracing::trace!(collection, id, "document written");
        // Notified under the write guard so watchers see snapshots in write order.
        self.notify(collection, documents).await;
        drop(guard);
        Ok(())
    }
}

fn to_snapshot(documents: &Collection) -> Vec<StoredDocument> {
    documents
        .iter()
        .map(|(id, data)| StoredDocument {
            id: id.clone(),
            data: data.clone(),
        })
        .collect()
}

fn merge_fields(target: &mut Json, patch: Json) {
    match (target.as_object_mut(), patch) {
        (Some(existing), Json::Object(fields)) => {
            for (key, value) in fields {
                existing.insert(key, value);
            }
        }
        (_, patch) => *target = patch,
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Json>, RecordStoreError> {
        self.check_available(collection).await?;
        let guard = self.collections.read().await;
        Ok(guard.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn set(&self, collection: &str, id: &str, data: Json) -> Result<(), RecordStoreError> {
        self.write(collection, id, |documents| {
            documents.insert(id.to_string(), data);
            Ok(())
        })
        .await
    }

    async fn create(&self, collection: &str, id: &str, data: Json) -> Result<(), RecordStoreError> {
        self.write(collection, id, |documents| {
            if documents.contains_key(id) {
                return Err(RecordStoreError::AlreadyExists {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
            documents.insert(id.to_string(), data);
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Json,
    ) -> Result<(), RecordStoreError> {
        self.write(collection, id, |documents| match documents.get_mut(id) {
            Some(existing) => {
                merge_fields(existing, data);
                Ok(())
            }
            None => Err(RecordStoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
        })
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), RecordStoreError> {
        self.write(collection, id, |documents| {
            documents.remove(id);
            Ok(())
        })
        .await
    }

    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, RecordStoreError> {
        self.check_available(collection).await?;
        let guard = self.collections.read().await;
        Ok(guard.get(collection).map(to_snapshot).unwrap_or_default())
    }

    async fn watch(&self, collection: &str) -> watch::Receiver<Snapshot> {
        let current = {
            let guard = self.collections.read().await;
            guard.get(collection).map(to_snapshot).unwrap_or_default()
        };
        let mut watchers = self.watchers.lock().await;
        match watchers.get(collection) {
            Some(sender) => {
                // A broken subscription is replaced by a fresh snapshot for new subscribers.
                if sender.borrow().is_err() {
                    let _previous = sender.send_replace(Ok(current));
                }
                sender.subscribe()
            }
            None => {
                let (sender, receiver) = watch::channel(Ok(current));
                watchers.insert(collection.to_string(), sender);
                receiver
            }
        }
    }
}

#[cfg(test)]
mod in_memory_record_store_tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn store() -> InMemoryRecordStore {
        InMemoryRecordStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_set_and_get_a_document(store: InMemoryRecordStore) {
        store
            .set("students", "s1", json!({"name": "Ana"}))
            .await
            .expect("set failed");
        let document = store.get("students", "s1").await.unwrap();
        assert_eq!(document, Some(json!({"name": "Ana"})));
        assert_eq!(store.get("students", "s2").await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refuse_to_create_an_existing_document(store: InMemoryRecordStore) {
        store.create("sections", "S1", json!({"a": 1})).await.unwrap();
        let result = store.create("sections", "S1", json!({"a": 2})).await;
        assert!(matches!(result, Err(RecordStoreError::AlreadyExists { .. })));
        assert_eq!(store.get("sections", "S1").await.unwrap(), Some(json!({"a": 1})));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_merge_fields_on_update(store: InMemoryRecordStore) {
        store
            .set("students", "s1", json!({"name": "Ana", "program": "BSIT"}))
            .await
            .unwrap();
        store
            .update("students", "s1", json!({"program": "BSCS"}))
            .await
            .unwrap();
        assert_eq!(
            store.get("students", "s1").await.unwrap(),
            Some(json!({"name": "Ana", "program": "BSCS"}))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_to_update_a_missing_document(store: InMemoryRecordStore) {
        let result = store.update("students", "ghost", json!({"x": 1})).await;
        assert_eq!(
            result,
            Err(RecordStoreError::NotFound {
                collection: "students".into(),
                id: "ghost".into()
            })
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_every_operation_when_offline(mut store: InMemoryRecordStore) {
        store.toggle_offline();
        let result = store.set("students", "s1", json!({})).await;
        assert_eq!(
            result,
            Err(RecordStoreError::Backend("Record store offline".into()))
        );
        assert!(store.list("students").await.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_only_fail_the_broken_collection_prefix(store: InMemoryRecordStore) {
        store.fail_collection("sections").await;
        assert!(store.set("sections/S1/students", "s1", json!({})).await.is_err());
        assert!(store.set("students", "s1", json!({})).await.is_ok());
        store.restore_collection("sections").await;
        assert!(store.set("sections/S1/students", "s1", json!({})).await.is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_push_snapshots_to_watchers(store: InMemoryRecordStore) {
        let mut receiver = store.watch("mentor_midterm").await;
        assert_eq!(receiver.borrow().clone(), Ok(vec![]));

        store
            .set("mentor_midterm", "e1", json!({"status": "submitted"}))
            .await
            .unwrap();
        receiver.changed().await.unwrap();
        let snapshot = receiver.borrow_and_update().clone().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, "e1");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_push_an_error_when_a_subscription_breaks(store: InMemoryRecordStore) {
        let mut receiver = store.watch("mentor_final").await;
        store.break_subscription("mentor_final", "permission denied").await;
        receiver.changed().await.unwrap();
        assert_eq!(
            receiver.borrow().clone(),
            Err(RecordStoreError::Backend("permission denied".into()))
        );

        let fresh = store.watch("mentor_final").await;
        assert_eq!(fresh.borrow().clone(), Ok(vec![]));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn it_should_leave_watchers_on_the_latest_snapshot_after_concurrent_writes() {
        let store = std::sync::Arc::new(InMemoryRecordStore::new());
        let receiver = store.watch("students").await;

        let writers: Vec<_> = (0..64)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .set("students", &format!("s{n:02}"), json!({ "n": n }))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        let published = receiver.borrow().clone().unwrap();
        assert_eq!(published.len(), 64);
        assert_eq!(published, store.list("students").await.unwrap());
    }
}
