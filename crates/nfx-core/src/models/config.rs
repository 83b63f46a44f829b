//! Configuration structures for the import pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Namespace URI of the NF-e layout.
pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";

/// Main configuration for nfx.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NfxConfig {
    /// Document parsing configuration.
    pub document: DocumentConfig,

    /// Document store configuration.
    pub store: StoreConfig,

    /// Alert record configuration.
    pub alerts: AlertConfig,
}

/// Document parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// URI bound to the `nfe` prefix for every lookup.
    pub namespace_uri: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            namespace_uri: NFE_NAMESPACE.to_string(),
        }
    }
}

/// Document store layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the file-backed collections.
    pub data_dir: PathBuf,

    /// Collection receiving invoice records.
    pub invoices_collection: String,

    /// Collection receiving alert records.
    pub alerts_collection: String,

    /// Collection holding the product catalog.
    pub products_collection: String,

    /// Array field on catalog products listing their identifiers.
    pub identifiers_field: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("nfx-data"),
            invoices_collection: "invoices".to_string(),
            alerts_collection: "alerts".to_string(),
            products_collection: "products".to_string(),
            identifiers_field: "identifiers".to_string(),
        }
    }
}

/// Fixed content written on every alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Diagnostic message.
    pub message: String,

    /// Origin tag identifying this importer.
    pub origin: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            message: "product not found in catalog".to_string(),
            origin: "xml_import".to_string(),
        }
    }
}

impl NfxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: NfxConfig =
            serde_json::from_str(r#"{"store": {"data_dir": "/tmp/nfx"}}"#).unwrap();

        assert_eq!(config.store.data_dir, PathBuf::from("/tmp/nfx"));
        assert_eq!(config.store.products_collection, "products");
        assert_eq!(config.document.namespace_uri, NFE_NAMESPACE);
        assert_eq!(config.alerts.origin, "xml_import");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = NfxConfig::default();
        config.alerts.origin = "batch".to_string();
        config.save(&path).unwrap();

        let loaded = NfxConfig::from_file(&path).unwrap();
        assert_eq!(loaded.alerts.origin, "batch");
    }
}
