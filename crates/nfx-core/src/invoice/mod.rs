//! Invoice field extraction module.

mod extractor;

pub use extractor::{parse_quantity, NfeInvoiceExtractor};

use crate::error::ExtractionError;
use crate::models::invoice::Invoice;
use crate::xml::XmlDocument;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for invoice field extractors.
pub trait InvoiceExtractor {
    /// Extract invoice data from raw document bytes.
    fn extract(&self, document: &[u8]) -> Result<Invoice>;

    /// Extract invoice data from an already parsed document.
    fn extract_from_document(&self, document: &XmlDocument) -> Result<Invoice>;
}
