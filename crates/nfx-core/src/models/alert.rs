//! Catalog alerts raised during reconciliation.

use serde::{Deserialize, Serialize};

use super::invoice::LineItem;

/// A line item whose product code is missing or not registered in the catalog.
///
/// Alerts reference their invoice by number only; later changes to the
/// invoice record do not touch alerts already written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub product_code: String,
    pub product_name: String,
    pub invoice_number: String,
    pub message: String,
    pub origin: String,
}

impl Alert {
    /// Build an alert for `item` on invoice `invoice_number`.
    pub fn for_item(
        item: &LineItem,
        invoice_number: &str,
        message: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            product_code: item.product_code.clone(),
            product_name: item.product_name.clone(),
            invoice_number: invoice_number.to_string(),
            message: message.into(),
            origin: origin.into(),
        }
    }
}
