//! Document store abstraction.
//!
//! The importer only needs three things from a store: insert a JSON object
//! into a named collection (optionally stamping a server-side timestamp),
//! answer whether any document in a collection lists a value in one of its
//! array fields, and report whether it is usable at all.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Field stamped by the store on every record the importer writes.
pub const CREATED_AT: &str = "createdAt";

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store-assigned identifier of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record about to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    fields: Map<String, Value>,
    server_timestamp: Option<String>,
}

impl NewDocument {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            server_timestamp: None,
        }
    }

    /// Serialize `value`, which must encode as a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(fields) => Ok(Self::from_fields(fields)),
            other => Err(StoreError::Rejected(format!(
                "documents must be JSON objects, got {other}"
            ))),
        }
    }

    /// Ask the store to set `field` to its own clock at write time.
    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamp = Some(field.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Final field set as written at `now`.
    pub fn into_fields(self, now: DateTime<Utc>) -> Map<String, Value> {
        let mut fields = self.fields;
        if let Some(field) = self.server_timestamp {
            fields.insert(
                field,
                Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
        fields
    }
}

/// A record as held by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub fields: Map<String, Value>,
}

impl StoredDocument {
    /// Whether `field` is an array holding the string `value`.
    pub fn array_contains(&self, field: &str, value: &str) -> bool {
        self.fields
            .get(field)
            .and_then(Value::as_array)
            .is_some_and(|values| values.iter().any(|v| v.as_str() == Some(value)))
    }
}

/// Trait for document store backends.
///
/// Implementations must be safe to share between concurrent imports.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document into `collection` and return its id.
    async fn insert(&self, collection: &str, document: NewDocument) -> Result<DocumentId>;

    /// Whether at least one document in `collection` has `value` in its array `field`.
    async fn contains_any(&self, collection: &str, field: &str, value: &str) -> Result<bool>;

    /// Whether the store is initialized and reachable.
    fn is_available(&self) -> bool {
        true
    }
}
