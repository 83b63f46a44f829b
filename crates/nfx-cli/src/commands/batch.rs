//! Batch import command for multiple invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use nfx_core::import::{
    FailureKind, ImportFailure, ImportOrchestrator, ImportResult, UNKNOWN_NUMBER,
};

use super::{load_config, open_store};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Write a summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Reconcile against the catalog without writing anything
    #[arg(long)]
    dry_run: bool,
}

/// Outcome of importing one file.
struct FileResult {
    path: PathBuf,
    result: ImportResult,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to import",
        style("ℹ").blue(),
        files.len()
    );

    let store = open_store(&config, args.dry_run)?;
    let orchestrator = ImportOrchestrator::new(store, &config);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let result = match fs::read(&path) {
            Ok(data) => orchestrator.import_invoice(&data).await,
            Err(e) => ImportResult::Failure(ImportFailure {
                kind: FailureKind::ProcessingFailure,
                number: UNKNOWN_NUMBER.to_string(),
                message: format!("failed to read file: {e}"),
                elapsed_ms: file_start.elapsed().as_millis() as u64,
            }),
        };

        if let ImportResult::Failure(failure) = &result {
            if args.continue_on_error {
                warn!("Failed to import {}: {}", path.display(), failure.message);
            } else {
                error!("Failed to import {}: {}", path.display(), failure.message);
                pb.finish_and_clear();
                anyhow::bail!("Import failed for {}: {}", path.display(), failure.message);
            }
        }

        results.push(FileResult { path, result });
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let (successful, failed): (Vec<&FileResult>, Vec<&FileResult>) =
        results.iter().partition(|r| r.result.is_success());
    let alerts: usize = successful
        .iter()
        .map(|r| match &r.result {
            ImportResult::Success(s) => s.alerts.len(),
            ImportResult::Failure(_) => 0,
        })
        .sum();

    println!();
    println!(
        "{} Imported {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} alerts",
        style(successful.len()).green(),
        style(failed.len()).red(),
        style(alerts).yellow()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for file in &failed {
            if let ImportResult::Failure(failure) = &file.result {
                println!("  - {}: {}", file.path.display(), failure.message);
            }
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "invoice_number",
        "alerts",
        "alerts_failed",
        "alert_products",
        "processing_time_ms",
        "error",
    ])?;

    for file in results {
        let filename = file.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        match &file.result {
            ImportResult::Success(success) => {
                wtr.write_record([
                    filename,
                    "success",
                    &success.number,
                    &success.alerts.len().to_string(),
                    &success.alerts_failed.to_string(),
                    &success.alert_summary().join("; "),
                    &success.elapsed_ms.to_string(),
                    "",
                ])?;
            }
            ImportResult::Failure(failure) => {
                wtr.write_record([
                    filename,
                    "error",
                    &failure.number,
                    "",
                    "",
                    "",
                    &failure.elapsed_ms.to_string(),
                    &failure.message,
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
