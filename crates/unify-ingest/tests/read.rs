//! Tests for reading CSV files from disk.

use std::fs;

use tempfile::TempDir;
use unify_ingest::{IngestError, read_raw_records};

#[test]
fn reads_windows_1252_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("uk.csv");
    // "£45,000" and "Zoë" in windows-1252
    let mut bytes = b"Name,Salary\n".to_vec();
    bytes.extend_from_slice(b"Zo\xEB,\"\xA345,000\"\n");
    fs::write(&path, bytes).unwrap();

    let records = read_raw_records(&path, "windows-1252").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("name"), Some("Zoë"));
    assert_eq!(records[0].get("salary"), Some("£45,000"));
}

#[test]
fn strips_utf8_bom_from_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fr.csv");
    fs::write(&path, "\u{feff}Adresse électronique,Genre\nmarie@example.fr,F\n").unwrap();

    let records = read_raw_records(&path, "utf-8").unwrap();
    assert_eq!(records[0].get("adresse_électronique"), Some("marie@example.fr"));
    assert_eq!(records[0].row(), 1);
}

#[test]
fn empty_file_has_no_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").unwrap();
    assert!(read_raw_records(&path, "utf-8").unwrap().is_empty());
}

#[test]
fn errors_name_the_problem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.csv");
    assert!(matches!(
        read_raw_records(&path, "utf-8"),
        Err(IngestError::Io { .. })
    ));
    assert!(matches!(
        read_raw_records(&path, "ebcdic-ish"),
        Err(IngestError::UnknownEncoding { .. })
    ));
}
