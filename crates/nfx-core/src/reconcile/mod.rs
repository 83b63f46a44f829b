//! Catalog reconciliation of extracted line items.

mod matcher;

pub use matcher::CatalogMatcher;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::alert::Alert;
use crate::models::config::AlertConfig;
use crate::models::invoice::LineItem;

/// Decides, per line item, whether an alert is due.
#[derive(Clone)]
pub struct ReconciliationEngine {
    matcher: CatalogMatcher,
    alerts: AlertConfig,
}

impl ReconciliationEngine {
    pub fn new(matcher: CatalogMatcher, alerts: AlertConfig) -> Self {
        Self { matcher, alerts }
    }

    /// Alerts for every item that has no code or an unregistered code.
    ///
    /// Output follows item order with at most one alert per item. Nothing is
    /// written; a failed catalog query aborts the pass.
    pub async fn reconcile(
        &self,
        invoice_number: &str,
        items: &[LineItem],
    ) -> Result<Vec<Alert>, StoreError> {
        let mut alerts = Vec::new();

        for item in items {
            let matched = item.has_code() && self.matcher.has_match(&item.product_code).await?;
            if matched {
                continue;
            }

            if item.has_code() {
                debug!("Product {} ({}) not in catalog", item.product_code, item.product_name);
            } else {
                warn!("Product '{}' on invoice {} has no code", item.product_name, invoice_number);
            }
            alerts.push(Alert::for_item(
                item,
                invoice_number,
                self.alerts.message.clone(),
                self.alerts.origin.clone(),
            ));
        }

        Ok(alerts)
    }
}
