//! Document storage abstraction and its backends.
//!
//! Records live in named collections keyed by string ids. Two id strategies
//! are offered: `set` writes under a caller-chosen key and overwrites
//! whatever was there, `add` always inserts under a freshly generated key.

mod error;
pub mod firestore;
pub mod memory;
pub mod sql;
mod value;

use async_trait::async_trait;
use rand::{Rng, distributions::Alphanumeric};

pub use error::{StoreError, StoreResult};
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use sql::SqlDocumentStore;
pub use value::{Document, StoredDocument, Value};

const AUTO_ID_LEN: usize = 20;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Upsert under a fixed id. Running it twice leaves one document.
    async fn set(&self, collection: &str, id: &str, data: Document) -> StoreResult<()>;

    /// Insert under a generated id and return it.
    async fn add(&self, collection: &str, data: Document) -> StoreResult<String>;

    /// Documents of a collection, up to `limit`. Memory and SQL stores return
    /// insertion order; Firestore returns document-name order.
    async fn list(&self, collection: &str, limit: Option<usize>)
    -> StoreResult<Vec<StoredDocument>>;

    /// Documents whose `field` equals `value`, ordered like `list`.
    async fn find_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
        limit: Option<usize>,
    ) -> StoreResult<Vec<StoredDocument>>;
}

/// Random alphanumeric document id, same shape as Firestore client ids.
pub fn auto_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::auto_id;

    #[test]
    fn auto_ids_are_twenty_alphanumerics_and_distinct() {
        let first = auto_id();
        let second = auto_id();

        assert_eq!(first.len(), 20);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
