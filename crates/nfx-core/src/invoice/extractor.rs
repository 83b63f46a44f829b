//! NF-e invoice extractor.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::config::{DocumentConfig, NFE_NAMESPACE};
use crate::models::invoice::{Invoice, LineItem, NO_CODE, UNIDENTIFIED_SUPPLIER, UNNAMED_PRODUCT};
use crate::xml::{Namespaces, XmlDocument, XmlElement, XmlFieldAccessor};

use super::{InvoiceExtractor, Result};

/// Prefix used by every lookup path below.
const NFE_PREFIX: &str = "nfe";

const INFO_CONTAINER: &str = ".//nfe:infNFe";
const INVOICE_NUMBER: &str = "nfe:ide/nfe:nNF";
const SUPPLIER_NAME: &str = "nfe:emit/nfe:xNome";
const ITEM_DETAIL: &str = "nfe:det";
const PRODUCT: &str = "nfe:prod";
const PRODUCT_NAME: &str = "nfe:xProd";
const QUANTITY: &str = "nfe:qCom";
const PRODUCT_CODE: &str = "nfe:cEAN";

/// Builds [`Invoice`] records from NF-e documents.
#[derive(Debug, Clone)]
pub struct NfeInvoiceExtractor {
    accessor: XmlFieldAccessor,
}

impl NfeInvoiceExtractor {
    /// Create an extractor bound to the standard NF-e namespace.
    pub fn new() -> Self {
        Self::with_namespace(NFE_NAMESPACE)
    }

    /// Create an extractor that binds the `nfe` prefix to `uri`.
    pub fn with_namespace(uri: impl Into<String>) -> Self {
        Self {
            accessor: XmlFieldAccessor::new(Namespaces::new(NFE_PREFIX, uri)),
        }
    }

    pub fn from_config(config: &DocumentConfig) -> Self {
        Self::with_namespace(config.namespace_uri.clone())
    }

    fn extract_item(&self, product: &XmlElement) -> LineItem {
        let name = self.accessor.resolve(product, PRODUCT_NAME, UNNAMED_PRODUCT);
        let quantity = parse_quantity(&self.accessor.resolve(product, QUANTITY, ""));
        let code = self.accessor.resolve(product, PRODUCT_CODE, NO_CODE);

        LineItem::new(name, quantity, code)
    }
}

impl Default for NfeInvoiceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for NfeInvoiceExtractor {
    fn extract(&self, document: &[u8]) -> Result<Invoice> {
        if document.is_empty() {
            return Err(ExtractionError::InputMissing);
        }

        let document = XmlDocument::parse(document)?;
        self.extract_from_document(&document)
    }

    fn extract_from_document(&self, document: &XmlDocument) -> Result<Invoice> {
        let info = self
            .accessor
            .find(document.root(), INFO_CONTAINER)
            .ok_or_else(|| ExtractionError::MissingRequiredField("infNFe".to_string()))?;

        let number = self.accessor.resolve(info, INVOICE_NUMBER, "");
        if number.is_empty() {
            return Err(ExtractionError::MissingRequiredField("nNF".to_string()));
        }

        let supplier = self.accessor.resolve(info, SUPPLIER_NAME, UNIDENTIFIED_SUPPLIER);
        let mut invoice = Invoice::new(number, supplier);

        for (index, detail) in self.accessor.find_all(info, ITEM_DETAIL).into_iter().enumerate() {
            match self.accessor.find(detail, PRODUCT) {
                Some(product) => invoice.items.push(self.extract_item(product)),
                None => debug!("Skipping item detail {} without a product block", index + 1),
            }
        }

        let uncoded = invoice.uncoded_items();
        if uncoded > 0 {
            warn!("Invoice {} has {} item(s) without a product code", invoice.number, uncoded);
        }

        debug!(
            "Extracted invoice {} from '{}' with {} items",
            invoice.number,
            invoice.supplier_name,
            invoice.items.len()
        );

        Ok(invoice)
    }
}

/// Parse a commercial quantity.
///
/// Accepts `.` or `,` as decimal separator. Blank, non-numeric and negative
/// values yield zero.
pub fn parse_quantity(text: &str) -> Decimal {
    let normalized = text.trim().replace(',', ".");
    match Decimal::from_str(&normalized) {
        Ok(value) if !value.is_sign_negative() => value,
        _ => Decimal::ZERO,
    }
}
