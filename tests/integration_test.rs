//! Integration tests for the giro-batch CLI.
//!
//! These tests write batch files to temporary paths and run the actual binary
//! against them.

use assert_cmd::Command;
use chrono::NaiveDate;
use giro_batch::{dump, encode, BatchHeader, DetailRecord, GiroBatch};
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn sample_batch() -> GiroBatch {
    let header = BatchHeader {
        creation_datetime: NaiveDate::from_ymd_opt(2017, 6, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0),
        sender_company_id: "S3ND3RID".to_string(),
        value_date: NaiveDate::from_ymd_opt(2017, 6, 2),
        originating_account: "0259001103".to_string(),
        originating_name: "Foo Chinese Kitchen Pte Ltd".to_string(),
        batch_id: 1,
        batch_reference: String::new(),
    };

    let details = vec![
        DetailRecord {
            payment_type: "20".to_string(),
            beneficiary_reference: "Free money".to_string(),
            receiving_bank_bic: "DBSSSGSGXXX".to_string(),
            receiving_account: "1234567890".to_string(),
            receiving_account_name: "Bar Breweries Pte Ltd".to_string(),
            purpose_code: "SALA".to_string(),
            amount_in_cents: 6900,
            ..Default::default()
        },
        DetailRecord {
            payment_type: "20".to_string(),
            beneficiary_reference: "Come get it".to_string(),
            receiving_bank_bic: "UOVBSGSGXXX".to_string(),
            receiving_account: "9876543210".to_string(),
            receiving_account_name: "Baz Appliances Ltd".to_string(),
            purpose_code: "COMM".to_string(),
            amount_in_cents: 29400,
            ..Default::default()
        },
    ];

    let mut batch = GiroBatch::from_parts(header, details, None);
    batch.set_trailer_values().unwrap();
    batch
}

/// Write raw bytes to a temporary file
fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// Encoded sample batch with the stored hash overwritten
fn tampered_batch_bytes() -> Vec<u8> {
    let mut batch = sample_batch();
    let mut bytes = encode(&mut batch).unwrap();
    let trailer_start = bytes.len() - 1000;
    bytes[trailer_start + 84..trailer_start + 95].copy_from_slice(b"00000000001");
    bytes
}

fn run_cli(args: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("giro-batch").unwrap();
    let assert = cmd.args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn test_summary_of_valid_batch() {
    let mut file = NamedTempFile::new().unwrap();
    dump(&mut sample_batch(), &mut file).unwrap();
    let path = file.path().to_str().unwrap();

    let output = run_cli(&[path]);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("row,payment_type,class"));
    assert_eq!(
        lines[1],
        "2,20,credit,DBSSSGSGXXX,1234567890,Bar Breweries Pte Ltd,SALA,SGD,69.00"
    );
    assert_eq!(
        lines[2],
        "3,20,credit,UOVBSGSGXXX,9876543210,Baz Appliances Ltd,COMM,SGD,294.00"
    );
}

#[test]
fn test_hash_mismatch_fails() {
    let file = write_temp(&tampered_batch_bytes());

    let mut cmd = Command::cargo_bin("giro-batch").unwrap();
    cmd.arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("hash total mismatch"));
}

#[test]
fn test_hash_mismatch_tolerated_with_no_verify() {
    let file = write_temp(&tampered_batch_bytes());
    let path = file.path().to_str().unwrap();

    let output = run_cli(&["--no-verify", path]);
    assert_eq!(output.lines().count(), 3);
}

#[test]
fn test_hash_mismatch_warning_is_logged() {
    let file = write_temp(&tampered_batch_bytes());

    let mut cmd = Command::cargo_bin("giro-batch").unwrap();
    cmd.env("RUST_LOG", "warn")
        .arg(file.path())
        .arg("--no-verify")
        .assert()
        .success()
        .stderr(predicate::str::contains("mismatch"));
}

#[test]
fn test_truncated_file_fails() {
    let mut batch = sample_batch();
    let bytes = encode(&mut batch).unwrap();
    let file = write_temp(&bytes[..1500]);

    let mut cmd = Command::cargo_bin("giro-batch").unwrap();
    cmd.arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed batch"));
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("giro-batch").unwrap();
    cmd.arg("nonexistent.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("giro-batch").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}
