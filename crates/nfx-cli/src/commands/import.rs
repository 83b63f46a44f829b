//! Import command - load a single invoice document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{debug, info};

use nfx_core::import::{ImportOrchestrator, ImportResponse, ImportResult};

use super::{load_config, open_store};

/// Arguments for the import command.
#[derive(Args)]
pub struct ImportArgs {
    /// Invoice XML file
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Reconcile against the catalog without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON response payload
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ImportArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Importing file: {}", args.input.display());
    let data = fs::read(&args.input)?;
    debug!("Read {} bytes", data.len());

    let store = open_store(&config, args.dry_run)?;
    let orchestrator = ImportOrchestrator::new(store, &config);
    let result = orchestrator.import_invoice(&data).await;
    let response = ImportResponse::from(&result);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response.payload)?),
        OutputFormat::Text => print!("{}", format_text(&result)),
    }

    if let ImportResult::Failure(failure) = &result {
        anyhow::bail!(
            "Import failed ({}): {}",
            response.status.http_code(),
            failure.message
        );
    }

    Ok(())
}

pub fn format_text(result: &ImportResult) -> String {
    let mut output = String::new();

    match result {
        ImportResult::Success(success) => {
            output.push_str(&format!(
                "{} Invoice {} imported in {}ms\n",
                style("✓").green(),
                success.number,
                success.elapsed_ms
            ));
            if success.alerts.is_empty() {
                output.push_str("  All products found in catalog\n");
            } else {
                output.push_str(&format!("  {} alert(s):\n", success.alerts.len()));
                for alert in &success.alerts {
                    output.push_str(&format!(
                        "  - {} [{}]\n",
                        alert.product_name, alert.product_code
                    ));
                }
            }
            if success.alerts_failed > 0 {
                output.push_str(&format!(
                    "  {} {} alert(s) could not be stored\n",
                    style("!").yellow(),
                    success.alerts_failed
                ));
            }
        }
        ImportResult::Failure(failure) => {
            output.push_str(&format!(
                "{} Invoice {}: {}\n",
                style("✗").red(),
                failure.number,
                failure.message
            ));
        }
    }

    output
}
