//! Tests for manifest and source config loading.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tempfile::TempDir;
use unify_config::{ConfigError, load_manifest, load_pipeline, load_source_config};
use unify_map::MappingSource;
use unify_model::{ConfigurationError, TargetTable};

const UK_JSON: &str = r#"{
  "label": "UK",
  "currency": "GBP",
  "locale": "en-GB",
  "users": {
    "path": "data/uk_users.csv",
    "encoding": "windows-1252",
    "fields": {
      "user_id": { "columns": ["email"], "transform": { "kind": "text", "case": "lower" } },
      "date_of_birth": { "columns": ["dob"], "transform": { "kind": "date", "formats": ["%d/%m/%Y"] } },
      "gender": { "columns": ["gender"], "transform": { "kind": "gender_code" } },
      "salary": { "columns": ["salary"], "transform": { "kind": "salary" } }
    }
  }
}"#;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn loads_pipeline_with_relative_paths() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "pipeline.toml",
        r#"
[pipeline]
database = "out/customers.db"
as_of = "2024-06-01"
null_tokens = ["NA", "VIDE"]
sparse_row_threshold = 0.5

[[sources]]
config = "mappings/uk.json"
"#,
    );
    write(dir.path(), "mappings/uk.json", UK_JSON);

    let config = load_pipeline(&dir.path().join("pipeline.toml")).unwrap();
    assert_eq!(config.as_of, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert_eq!(config.database, Some(dir.path().join("out/customers.db")));
    assert_eq!(config.null_tokens, vec!["NA", "VIDE"]);
    assert_eq!(config.sparse_row_threshold, Some(0.5));

    let uk = config.source("uk").unwrap();
    assert_eq!(uk.label(), "UK");
    assert_eq!(
        uk.input_path(TargetTable::Users),
        Some(dir.path().join("mappings/data/uk_users.csv"))
    );
    assert_eq!(uk.encoding(TargetTable::Users), Some("windows-1252"));
    assert_eq!(uk.input_path(TargetTable::Logins), None);

    let registry = config.registry().unwrap();
    assert!(registry.resolve("UK", TargetTable::Users).is_ok());
    assert!(matches!(
        registry.resolve("UK", TargetTable::Logins),
        Err(ConfigurationError::MissingTable { .. })
    ));
}

#[test]
fn defaults_apply_when_pipeline_section_is_absent() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pipeline.toml", "[[sources]]\nconfig = \"uk.json\"\n");
    write(dir.path(), "uk.json", UK_JSON);
    let config = load_pipeline(&dir.path().join("pipeline.toml")).unwrap();
    assert!(config.database.is_none());
    assert!(config.null_tokens.iter().any(|t| t == "{NULL}"));
    assert!(config.sparse_row_threshold.is_none());
}

#[test]
fn missing_files_name_the_path() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = load_manifest(&missing).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));

    write(dir.path(), "pipeline.toml", "[[sources]]\nconfig = \"absent.json\"\n");
    let err = load_pipeline(&dir.path().join("pipeline.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { ref path, .. } if path.ends_with("absent.json")));
}

#[test]
fn syntax_errors_are_reported() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "bad.toml", "[pipeline\n");
    assert!(matches!(
        load_manifest(&dir.path().join("bad.toml")),
        Err(ConfigError::Toml { .. })
    ));

    write(dir.path(), "bad.json", "{ \"label\": ");
    assert!(matches!(
        load_source_config(&dir.path().join("bad.json")),
        Err(ConfigError::Json { .. })
    ));
}

#[test]
fn manifest_values_are_checked() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "empty.toml", "[pipeline]\n");
    assert!(matches!(
        load_pipeline(&dir.path().join("empty.toml")),
        Err(ConfigError::InvalidManifest { .. })
    ));

    write(
        dir.path(),
        "date.toml",
        "[pipeline]\nas_of = \"01/06/2024\"\n\n[[sources]]\nconfig = \"uk.json\"\n",
    );
    write(dir.path(), "uk.json", UK_JSON);
    assert!(matches!(
        load_pipeline(&dir.path().join("date.toml")),
        Err(ConfigError::InvalidManifest { .. })
    ));
}

#[test]
fn duplicate_sources_fail_registry_build() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "pipeline.toml",
        "[[sources]]\nconfig = \"uk.json\"\n\n[[sources]]\nconfig = \"uk.json\"\n",
    );
    write(dir.path(), "uk.json", UK_JSON);
    let config = load_pipeline(&dir.path().join("pipeline.toml")).unwrap();
    assert!(matches!(
        config.registry(),
        Err(ConfigurationError::DuplicateSource { .. })
    ));
}
