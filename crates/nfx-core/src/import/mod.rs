//! End-to-end import of one invoice document.
//!
//! Pipeline: raw bytes → [`XmlDocument`](crate::xml::XmlDocument) →
//! [`Invoice`] → reconciliation → invoice write → alert writes → summary.

mod response;

pub use response::{ImportResponse, ResponsePayload, ResponseStatus};

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{ExtractionError, NfxError};
use crate::invoice::{InvoiceExtractor, NfeInvoiceExtractor};
use crate::models::alert::Alert;
use crate::models::config::NfxConfig;
use crate::models::invoice::Invoice;
use crate::reconcile::{CatalogMatcher, ReconciliationEngine};
use crate::store::{DocumentId, DocumentStore, NewDocument, CREATED_AT};

/// Invoice number reported when none could be read.
pub const UNKNOWN_NUMBER: &str = "N/A";

/// Closed set of reasons an import can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No document bytes supplied.
    InputMissing,
    /// Bytes are not well-formed XML.
    MalformedDocument,
    /// Invoice-info container or number absent.
    MissingRequiredField,
    /// Store not initialized or not reachable before any write.
    CollaboratorUnavailable,
    /// Anything else during extraction, reconciliation or persistence.
    ProcessingFailure,
}

impl From<&NfxError> for FailureKind {
    fn from(error: &NfxError) -> Self {
        match error {
            NfxError::Extraction(ExtractionError::InputMissing) => FailureKind::InputMissing,
            NfxError::Extraction(ExtractionError::MalformedDocument(_)) => {
                FailureKind::MalformedDocument
            }
            NfxError::Extraction(ExtractionError::MissingRequiredField(_)) => {
                FailureKind::MissingRequiredField
            }
            // Store errors past the up-front availability check are ordinary failures.
            NfxError::Store(_) | NfxError::Io(_) | NfxError::Config(_) => {
                FailureKind::ProcessingFailure
            }
        }
    }
}

/// A completed import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSuccess {
    pub number: String,
    pub invoice_id: DocumentId,
    pub alerts: Vec<Alert>,
    /// Alerts that could not be written.
    pub alerts_failed: usize,
    pub elapsed_ms: u64,
}

impl ImportSuccess {
    /// Product names of every alert, in item order.
    pub fn alert_summary(&self) -> Vec<String> {
        self.alerts.iter().map(|a| a.product_name.clone()).collect()
    }
}

/// A failed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub kind: FailureKind,
    /// Best-known invoice number, or [`UNKNOWN_NUMBER`]. Never persisted.
    pub number: String,
    pub message: String,
    pub elapsed_ms: u64,
}

/// Outcome of [`ImportOrchestrator::import_invoice`].
#[derive(Debug, Clone, PartialEq)]
pub enum ImportResult {
    Success(ImportSuccess),
    Failure(ImportFailure),
}

impl ImportResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ImportResult::Success(_))
    }

    pub fn number(&self) -> &str {
        match self {
            ImportResult::Success(s) => &s.number,
            ImportResult::Failure(f) => &f.number,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        match self {
            ImportResult::Success(s) => s.elapsed_ms,
            ImportResult::Failure(f) => f.elapsed_ms,
        }
    }
}

/// What was written for a successfully extracted invoice.
struct Persisted {
    invoice_id: DocumentId,
    alerts: Vec<Alert>,
    alerts_failed: usize,
}

/// Runs the full import pipeline against an injected document store.
///
/// The orchestrator holds no per-request state; one instance can serve any
/// number of concurrent imports.
#[derive(Clone)]
pub struct ImportOrchestrator {
    store: Arc<dyn DocumentStore>,
    extractor: NfeInvoiceExtractor,
    engine: ReconciliationEngine,
    invoices_collection: String,
    alerts_collection: String,
}

impl ImportOrchestrator {
    pub fn new(store: Arc<dyn DocumentStore>, config: &NfxConfig) -> Self {
        let matcher = CatalogMatcher::from_config(store.clone(), &config.store);

        Self {
            extractor: NfeInvoiceExtractor::from_config(&config.document),
            engine: ReconciliationEngine::new(matcher, config.alerts.clone()),
            invoices_collection: config.store.invoices_collection.clone(),
            alerts_collection: config.store.alerts_collection.clone(),
            store,
        }
    }

    /// Import one document. Never fails: every condition becomes an [`ImportResult`].
    pub async fn import_invoice(&self, raw: &[u8]) -> ImportResult {
        let start = Instant::now();

        if raw.is_empty() {
            let message = ExtractionError::InputMissing.to_string();
            error!("Import rejected: {}", message);
            return failure(FailureKind::InputMissing, UNKNOWN_NUMBER, message, start);
        }

        if !self.store.is_available() {
            error!("Import rejected: document store unavailable");
            return failure(
                FailureKind::CollaboratorUnavailable,
                UNKNOWN_NUMBER,
                "document store is not available".to_string(),
                start,
            );
        }

        let mut number: Option<String> = None;
        match self.run(raw, &mut number).await {
            Ok(persisted) => {
                let number = number.unwrap_or_else(|| UNKNOWN_NUMBER.to_string());
                let elapsed_ms = start.elapsed().as_millis() as u64;
                info!(
                    "Invoice {} imported in {}ms with {} alert(s)",
                    number,
                    elapsed_ms,
                    persisted.alerts.len()
                );

                ImportResult::Success(ImportSuccess {
                    number,
                    invoice_id: persisted.invoice_id,
                    alerts: persisted.alerts,
                    alerts_failed: persisted.alerts_failed,
                    elapsed_ms,
                })
            }
            Err(e) => {
                let number = number.as_deref().unwrap_or(UNKNOWN_NUMBER);
                error!("Import of invoice {} failed: {}", number, e);
                failure(FailureKind::from(&e), number, e.to_string(), start)
            }
        }
    }

    async fn run(&self, raw: &[u8], number: &mut Option<String>) -> crate::Result<Persisted> {
        let invoice = self.extractor.extract(raw)?;
        *number = Some(invoice.number.clone());

        let alerts = self.engine.reconcile(&invoice.number, &invoice.items).await?;
        let invoice_id = self.persist_invoice(&invoice).await?;
        let alerts_failed = self.persist_alerts(&alerts).await;

        Ok(Persisted {
            invoice_id,
            alerts,
            alerts_failed,
        })
    }

    async fn persist_invoice(&self, invoice: &Invoice) -> crate::Result<DocumentId> {
        let document = NewDocument::from_serialize(invoice)?.with_server_timestamp(CREATED_AT);
        let id = self.store.insert(&self.invoices_collection, document).await?;
        debug!("Stored invoice {} as {}", invoice.number, id);
        Ok(id)
    }

    /// Write each alert independently; returns how many writes failed.
    async fn persist_alerts(&self, alerts: &[Alert]) -> usize {
        let mut failed = 0;

        for alert in alerts {
            let written = match NewDocument::from_serialize(alert) {
                Ok(document) => {
                    self.store
                        .insert(&self.alerts_collection, document.with_server_timestamp(CREATED_AT))
                        .await
                }
                Err(e) => Err(e),
            };

            if let Err(e) = written {
                failed += 1;
                warn!(
                    "Failed to store alert for {} on invoice {}: {}",
                    alert.product_code, alert.invoice_number, e
                );
            }
        }

        failed
    }
}

fn failure(kind: FailureKind, number: &str, message: String, start: Instant) -> ImportResult {
    ImportResult::Failure(ImportFailure {
        kind,
        number: number.to_string(),
        message,
        elapsed_ms: start.elapsed().as_millis() as u64,
    })
}
