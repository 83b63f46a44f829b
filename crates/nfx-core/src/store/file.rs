//! Directory-backed document store.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, trace};

use crate::error::StoreError;

use super::{DocumentId, DocumentStore, NewDocument, Result, StoredDocument};

/// Stores each collection as a JSON Lines file (`<collection>.jsonl`) under a
/// root directory. Writes append one line; queries scan the file up to the
/// first match.
///
/// I/O is synchronous and runs on the calling task. This suits the CLI, which
/// imports one document at a time; a shared server should wrap it in
/// `spawn_blocking` or use a hosted store.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
    counter: AtomicU64,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!("Opened file store at {}", root.display());

        Ok(Self {
            root,
            write_lock: Mutex::new(()),
            counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.jsonl"))
    }

    /// Read every document of a collection in insertion order.
    pub fn read_collection(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        let mut documents = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            documents.push(serde_json::from_str(&line)?);
        }

        trace!("Read {} documents from {}", documents.len(), path.display());
        Ok(documents)
    }

    /// Whether any document of a collection satisfies `predicate`. Stops
    /// reading at the first hit.
    pub fn any(&self, collection: &str, predicate: impl Fn(&StoredDocument) -> bool) -> Result<bool> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(false);
        }

        let reader = BufReader::new(fs::File::open(&path)?);
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let document: StoredDocument = serde_json::from_str(&line)?;
            if predicate(&document) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Synchronous insert used by the trait impl.
    pub fn append(&self, collection: &str, document: NewDocument) -> Result<DocumentId> {
        let now = Utc::now();
        let id = DocumentId::new(format!(
            "{}-{}",
            now.timestamp_micros(),
            self.counter.fetch_add(1, Ordering::SeqCst)
        ));
        let stored = StoredDocument {
            id: id.clone(),
            fields: document.into_fields(now),
        };
        let mut line = serde_json::to_string(&stored)?;
        line.push('\n');

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.collection_path(collection))?;
        file.write_all(line.as_bytes())?;

        Ok(id)
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn insert(&self, collection: &str, document: NewDocument) -> Result<DocumentId> {
        self.append(collection, document)
    }

    async fn contains_any(&self, collection: &str, field: &str, value: &str) -> Result<bool> {
        self.any(collection, |doc| doc.array_contains(field, value))
    }

    fn is_available(&self) -> bool {
        self.root.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::Product;
    use crate::store::CREATED_AT;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_catalog_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();

        let product = Product::new("Coffee", ["7891234567890", "17891234567897"]);
        let doc = NewDocument::from_serialize(&product)
            .unwrap()
            .with_server_timestamp(CREATED_AT);
        store.insert("products", doc).await.unwrap();

        assert!(store.contains_any("products", "identifiers", "17891234567897").await.unwrap());
        assert!(!store.contains_any("products", "identifiers", "999").await.unwrap());

        // A second handle on the same directory sees the same data.
        let reopened = FileStore::open(store.root()).unwrap();
        let docs = reopened.read_collection("products").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["name"], serde_json::json!("Coffee"));
    }

    #[tokio::test]
    async fn test_lookup_stops_at_first_match() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let product = Product::new("Coffee", ["7891234567890"]);
        store
            .append("products", NewDocument::from_serialize(&product).unwrap())
            .unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(dir.path().join("products.jsonl"))
            .unwrap();
        file.write_all(b"{not json\n").unwrap();

        assert!(store.contains_any("products", "identifiers", "7891234567890").await.unwrap());
        assert!(matches!(
            store.contains_any("products", "identifiers", "999").await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.read_collection("alerts").unwrap().is_empty());
        assert!(store.is_available());
    }

    #[test]
    fn test_removed_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("gone");
        let store = FileStore::open(&root).unwrap();
        fs::remove_dir_all(&root).unwrap();
        assert!(!store.is_available());
    }
}
