use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn invex() -> Command {
    Command::cargo_bin("invex").unwrap()
}

fn write_config(dir: &Path) -> PathBuf {
    let missing = dir.join("missing.pdf");
    let config = serde_json::json!({
        "documents": [
            {
                "file": missing.to_string_lossy(),
                "date_label": "Invoice date",
                "mode": "text",
                "labels": ["Total"]
            }
        ]
    });

    let path = dir.join("config.json");
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

#[test]
fn test_help() {
    invex()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_config_init_and_validate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invex").join("config.json");

    invex()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("sample_invoice_1.pdf"));

    invex()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    invex()
        .arg("-c")
        .arg(&path)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 documents"));
}

#[test]
fn test_config_validate_rejects_duplicate_labels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"documents": [{"file": "a.pdf", "date_label": "Date", "labels": ["Total", "Total"]}]}"#,
    )
    .unwrap();

    invex()
        .arg("-c")
        .arg(&path)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate value label"));
}

#[test]
fn test_extract_reports_missing_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let out = dir.path().join("out");

    invex()
        .arg("-c")
        .arg(&config)
        .args(["extract", "--summary", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed documents:"))
        .stdout(predicate::str::contains("missing.pdf"));

    let csv = std::fs::read_to_string(out.join("Invoice_Data.csv")).unwrap();
    assert_eq!(csv, "File;Date;Value\n");
    assert!(out.join("Invoice_Data.xlsx").exists());

    let summary = std::fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains(",error,"));
}

#[test]
fn test_extract_fail_fast() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    invex()
        .arg("-c")
        .arg(&config)
        .args(["extract", "--fail-fast", "--output-dir"])
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.pdf"));

    assert!(!dir.path().join("out").join("Invoice_Data.csv").exists());
}

#[test]
fn test_extract_without_documents_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{}").unwrap();

    invex()
        .arg("-c")
        .arg(&path)
        .arg("extract")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No documents configured"));
}

#[test]
fn test_inspect_missing_file() {
    invex()
        .args(["inspect", "/nonexistent/invoice.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}
