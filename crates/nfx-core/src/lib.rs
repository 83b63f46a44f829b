//! Core library for NF-e invoice import.
//!
//! This crate provides:
//! - A namespace-aware XML tree with path-based field lookups
//! - NF-e invoice extraction (header and line items)
//! - Catalog reconciliation producing alerts for unknown products
//! - An import orchestrator persisting invoices and alerts to a document store

pub mod error;
pub mod import;
pub mod invoice;
pub mod models;
pub mod reconcile;
pub mod store;
pub mod xml;

pub use error::{ExtractionError, NfxError, Result, StoreError};
pub use import::{
    FailureKind, ImportFailure, ImportOrchestrator, ImportResponse, ImportResult, ImportSuccess,
    ResponseStatus,
};
pub use invoice::{InvoiceExtractor, NfeInvoiceExtractor};
pub use models::alert::Alert;
pub use models::config::NfxConfig;
pub use models::invoice::{Invoice, InvoiceStatus, LineItem};
pub use models::product::Product;
pub use reconcile::{CatalogMatcher, ReconciliationEngine};
pub use store::{DocumentStore, FileStore, MemoryStore, NewDocument};
pub use xml::{Namespaces, XmlDocument, XmlElement, XmlFieldAccessor};
