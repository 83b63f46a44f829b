//! Subcommands and the helpers they share.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod import;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use nfx_core::models::config::NfxConfig;
use nfx_core::store::{DocumentStore, FileStore, MemoryStore, NewDocument};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("nfx")
        .join("config.json")
}

/// Load the config given on the command line, else the default file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<NfxConfig> {
    if let Some(path) = config_path {
        return Ok(NfxConfig::from_file(std::path::Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(NfxConfig::from_file(&default_path)?)
    } else {
        Ok(NfxConfig::default())
    }
}

/// Open the store imports write to.
///
/// A dry run writes to memory, with the catalog copied from the data directory.
pub fn open_store(config: &NfxConfig, dry_run: bool) -> anyhow::Result<Arc<dyn DocumentStore>> {
    if !dry_run {
        return Ok(Arc::new(FileStore::open(&config.store.data_dir)?));
    }

    let memory = MemoryStore::new();
    let products = if config.store.data_dir.is_dir() {
        FileStore::open(&config.store.data_dir)?.read_collection(&config.store.products_collection)?
    } else {
        Vec::new()
    };
    debug!("Dry run with {} catalog products", products.len());
    for product in products {
        memory.put(
            &config.store.products_collection,
            NewDocument::from_fields(product.fields),
        )?;
    }

    Ok(Arc::new(memory))
}
