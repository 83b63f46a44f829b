//! Invoice data models as persisted in the `invoices` collection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supplier name used when the issuer block carries no name.
pub const UNIDENTIFIED_SUPPLIER: &str = "unidentified supplier";

/// Product name used when an item carries no description.
pub const UNNAMED_PRODUCT: &str = "unnamed product";

/// Product code used when an item's code is absent or blank.
pub const NO_CODE: &str = "no code";

/// A normalized invoice record.
///
/// Field names are part of the stored record shape and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Invoice number (`nNF`), never empty.
    pub number: String,

    /// Issuer name, or [`UNIDENTIFIED_SUPPLIER`].
    pub supplier_name: String,

    /// Import status.
    #[serde(default)]
    pub status: InvoiceStatus,

    /// Line items in document order.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// Lifecycle status of an imported invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Imported and waiting for review.
    #[default]
    Pending,
}

/// A single product entry on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product description, or [`UNNAMED_PRODUCT`].
    pub product_name: String,

    /// Commercial quantity, never negative.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,

    /// Trimmed product code (EAN/GTIN), or [`NO_CODE`].
    pub product_code: String,
}

impl Invoice {
    /// Create an invoice with no items in the initial status.
    pub fn new(number: impl Into<String>, supplier_name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            supplier_name: supplier_name.into(),
            status: InvoiceStatus::default(),
            items: Vec::new(),
        }
    }

    /// Number of items that carry no usable product code.
    pub fn uncoded_items(&self) -> usize {
        self.items.iter().filter(|item| !item.has_code()).count()
    }
}

impl LineItem {
    pub fn new(
        product_name: impl Into<String>,
        quantity: Decimal,
        product_code: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            quantity,
            product_code: product_code.into(),
        }
    }

    /// Whether the item carries a real code rather than the [`NO_CODE`] sentinel.
    pub fn has_code(&self) -> bool {
        self.product_code != NO_CODE
    }
}
