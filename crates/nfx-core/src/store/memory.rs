use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::error::StoreError;

use super::{DocumentId, DocumentStore, NewDocument, Result, StoredDocument};

/// In-memory document store.
///
/// Intended for tests and dry runs. Not optimized for performance.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronous insert, shared by the trait impl and seeding code.
    pub fn put(&self, collection: &str, document: NewDocument) -> Result<DocumentId> {
        let id = DocumentId::new(format!(
            "{collection}-{}",
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1
        ));
        let stored = StoredDocument {
            id: id.clone(),
            fields: document.into_fields(Utc::now()),
        };

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(stored);

        Ok(id)
    }

    /// Snapshot of a collection in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<StoredDocument> {
        self.collections
            .read()
            .ok()
            .and_then(|c| c.get(collection).cloned())
            .unwrap_or_default()
    }

    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, document: NewDocument) -> Result<DocumentId> {
        self.put(collection, document)
    }

    async fn contains_any(&self, collection: &str, field: &str, value: &str) -> Result<bool> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(collections
            .get(collection)
            .is_some_and(|docs| docs.iter().any(|doc| doc.array_contains(field, value))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::Product;
    use crate::store::CREATED_AT;

    #[tokio::test]
    async fn test_insert_and_query() {
        let store = MemoryStore::new();
        let product = Product::new("Coffee", ["7891234567890"]);
        store
            .put("products", NewDocument::from_serialize(&product).unwrap())
            .unwrap();

        assert!(store.contains_any("products", "identifiers", "7891234567890").await.unwrap());
        assert!(!store.contains_any("products", "identifiers", "0000").await.unwrap());
        assert!(!store.contains_any("missing", "identifiers", "7891234567890").await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_timestamps_stamped() {
        let store = MemoryStore::new();
        let doc = || {
            NewDocument::from_serialize(&serde_json::json!({"n": 1}))
                .unwrap()
                .with_server_timestamp(CREATED_AT)
        };

        let a = store.insert("invoices", doc()).await.unwrap();
        let b = store.insert("invoices", doc()).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.count("invoices"), 2);
        assert!(store.documents("invoices")[0].fields[CREATED_AT].is_string());
    }
}
