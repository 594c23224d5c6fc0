use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;

use super::{Document, DocumentStore, StoreResult, StoredDocument, Value, auto_id};
use crate::clock::Clock;

type Collections = BTreeMap<String, Vec<StoredDocument>>;

/// Process-local store. Collections keep insertion order so reads behave
/// like an unordered query on a freshly seeded database.
pub struct MemoryStore {
    clock: Arc<dyn Clock>,
    collections: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            collections: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn count(&self, collection: &str) -> usize {
        self.lock().get(collection).map_or(0, Vec::len)
    }

    pub fn get(&self, collection: &str, id: &str) -> Option<Document> {
        self.lock()
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .map(|doc| doc.data.clone())
    }

    pub fn documents(&self, collection: &str) -> Vec<StoredDocument> {
        self.lock().get(collection).cloned().unwrap_or_default()
    }

    /// Per-collection document counts, sorted by collection name.
    pub fn summary(&self) -> Vec<(String, usize)> {
        self.lock()
            .iter()
            .map(|(name, docs)| (name.clone(), docs.len()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn set(&self, collection: &str, id: &str, mut data: Document) -> StoreResult<()> {
        data.resolve_server_timestamps(self.clock.now());
        let mut collections = self.lock();
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(existing) => existing.data = data,
            None => docs.push(StoredDocument {
                id: id.to_string(),
                data,
            }),
        }
        Ok(())
    }

    async fn add(&self, collection: &str, mut data: Document) -> StoreResult<String> {
        data.resolve_server_timestamps(self.clock.now());
        let id = auto_id();
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument {
                id: id.clone(),
                data,
            });
        Ok(id)
    }

    async fn list(
        &self,
        collection: &str,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.lock();
        let docs = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);
        Ok(docs
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.lock();
        let docs = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);
        Ok(docs
            .iter()
            .filter(|doc| doc.data.get(field) == Some(value))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}
