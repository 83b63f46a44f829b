use std::sync::Arc;

use tracing::debug;

use crate::error::StoreError;
use crate::models::config::StoreConfig;
use crate::models::invoice::NO_CODE;
use crate::store::DocumentStore;

/// Answers whether a product code is registered in the catalog.
#[derive(Clone)]
pub struct CatalogMatcher {
    store: Arc<dyn DocumentStore>,
    collection: String,
    field: String,
}

impl CatalogMatcher {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            field: field.into(),
        }
    }

    pub fn from_config(store: Arc<dyn DocumentStore>, config: &StoreConfig) -> Self {
        Self::new(
            store,
            config.products_collection.clone(),
            config.identifiers_field.clone(),
        )
    }

    /// Whether any catalog product lists `product_code` among its identifiers.
    ///
    /// The [`NO_CODE`] sentinel (and a blank code) never matches and is not
    /// sent to the store.
    pub async fn has_match(&self, product_code: &str) -> Result<bool, StoreError> {
        if product_code == NO_CODE || product_code.trim().is_empty() {
            return Ok(false);
        }

        let found = self
            .store
            .contains_any(&self.collection, &self.field, product_code)
            .await?;
        debug!("Catalog lookup for {}: {}", product_code, if found { "hit" } else { "miss" });

        Ok(found)
    }
}
