use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Temp workspace with a config file pointing the store into it.
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.json");
    let data_dir = dir.path().join("data");
    fs::write(
        &config,
        format!(
            r#"{{"store": {{"data_dir": {}}}}}"#,
            serde_json::to_string(&data_dir).unwrap()
        ),
    )
    .unwrap();
    (dir, config)
}

fn nfx(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nfx").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

fn line_count(path: &Path) -> usize {
    fs::read_to_string(path)
        .map(|s| s.lines().filter(|l| !l.trim().is_empty()).count())
        .unwrap_or(0)
}

#[test]
fn test_import_reports_unmatched_products() {
    let (dir, config) = workspace();

    nfx(&config)
        .args(["catalog", "add", "--name", "Coffee 500g", "7891234567890"])
        .assert()
        .success();

    nfx(&config)
        .arg("import")
        .arg(fixture("nfe_000123.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"number\": \"000123\""))
        .stdout(predicate::str::contains("Sugar 1kg"))
        .stdout(predicate::str::contains("Coffee 500g").not());

    let data = dir.path().join("data");
    assert_eq!(line_count(&data.join("invoices.jsonl")), 1);
    assert_eq!(line_count(&data.join("alerts.jsonl")), 1);
}

#[test]
fn test_import_malformed_file_fails() {
    let (dir, config) = workspace();
    let broken = dir.path().join("broken.xml");
    fs::write(&broken, "<nfeProc><NFe>").unwrap();

    nfx(&config)
        .arg("import")
        .arg(&broken)
        .assert()
        .failure()
        .stdout(predicate::str::contains("malformed document"))
        .stderr(predicate::str::contains("Import failed (400)"));

    assert!(!dir.path().join("data").join("invoices.jsonl").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let (dir, config) = workspace();

    nfx(&config)
        .args(["import", "--dry-run", "--format", "text"])
        .arg(fixture("nfe_000123.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice 000123 imported"));

    assert!(!dir.path().join("data").join("invoices.jsonl").exists());
}

#[test]
fn test_batch_writes_summary() {
    let (dir, config) = workspace();
    let inbox = dir.path().join("inbox");
    fs::create_dir_all(&inbox).unwrap();
    fs::copy(fixture("nfe_000123.xml"), inbox.join("a.xml")).unwrap();
    fs::write(inbox.join("b.xml"), "not xml").unwrap();
    let summary = dir.path().join("summary.csv");

    nfx(&config)
        .arg("batch")
        .arg(format!("{}/*.xml", inbox.display()))
        .arg("--continue-on-error")
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success();

    let csv = fs::read_to_string(&summary).unwrap();
    assert!(csv.contains("a.xml,success,000123,2,0"));
    assert!(csv.contains("b.xml,error,N/A"));
}

#[test]
fn test_config_get_reads_given_file() {
    let (_dir, config) = workspace();

    nfx(&config)
        .args(["config", "get", "store.products_collection"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"products\""));
}

#[test]
fn test_batch_records_unreadable_file_and_continues() {
    let (dir, config) = workspace();
    let inbox = dir.path().join("inbox");
    fs::create_dir_all(inbox.join("b.xml")).unwrap();
    fs::copy(fixture("nfe_000123.xml"), inbox.join("a.xml")).unwrap();
    fs::copy(fixture("nfe_000123.xml"), inbox.join("c.xml")).unwrap();
    let summary = dir.path().join("summary.csv");

    nfx(&config)
        .arg("batch")
        .arg(format!("{}/*.xml", inbox.display()))
        .arg("--continue-on-error")
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success();

    let csv = fs::read_to_string(&summary).unwrap();
    assert!(csv.contains("a.xml,success,000123"));
    assert!(csv.contains("b.xml,error,N/A"));
    assert!(csv.contains("failed to read file"));
    assert!(csv.contains("c.xml,success,000123"));
    assert_eq!(line_count(&dir.path().join("data").join("invoices.jsonl")), 2);
}

#[test]
fn test_batch_stops_on_unreadable_file_by_default() {
    let (dir, config) = workspace();
    let inbox = dir.path().join("inbox");
    fs::create_dir_all(inbox.join("b.xml")).unwrap();
    fs::copy(fixture("nfe_000123.xml"), inbox.join("a.xml")).unwrap();

    nfx(&config)
        .arg("batch")
        .arg(format!("{}/*.xml", inbox.display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read file"));
}
