//! Catalog command - register and list products.

use clap::{Args, Subcommand};
use console::style;

use nfx_core::models::product::Product;
use nfx_core::store::{DocumentStore, FileStore, NewDocument, CREATED_AT};

use super::load_config;

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand)]
enum CatalogCommand {
    /// Register a product with one or more identifiers (EAN/GTIN)
    Add {
        /// Product name
        #[arg(short, long)]
        name: String,

        /// Identifiers the product is known by
        #[arg(required = true)]
        identifiers: Vec<String>,
    },

    /// List registered products
    List,
}

pub async fn run(args: CatalogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = FileStore::open(&config.store.data_dir)?;
    let collection = &config.store.products_collection;

    match args.command {
        CatalogCommand::Add { name, identifiers } => {
            let product = Product::new(name, identifiers);
            if product.identifiers.is_empty() {
                anyhow::bail!("At least one non-blank identifier is required");
            }

            let document = NewDocument::from_serialize(&product)?.with_server_timestamp(CREATED_AT);
            let id = store.insert(collection, document).await?;
            println!(
                "{} Registered {} ({}) as {}",
                style("✓").green(),
                product.name,
                product.identifiers.join(", "),
                id
            );
        }
        CatalogCommand::List => {
            let documents = store.read_collection(collection)?;
            if documents.is_empty() {
                println!("{} Catalog is empty", style("ℹ").blue());
            }
            for document in documents {
                let product: Product = serde_json::from_value(document.fields.into())?;
                println!("{}\t{}", product.name, product.identifiers.join(", "));
            }
        }
    }

    Ok(())
}
