//! Merge engine behavior across sources.

use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::json;
use unify_core::{MergeEngine, NormalizeOutcome, RecordNormalizer, SourceBatch, merge};
use unify_map::{MappingRegistry, MappingSource, ResolveContext};
use unify_model::{
    CanonicalValue, ConfigurationError, Gender, RawRecord, ReasonCode, SourceConfig, TargetTable,
};

fn source(label: &str, currency: &str, locale: &str) -> SourceConfig {
    serde_json::from_value(json!({
        "label": label,
        "currency": currency,
        "locale": locale,
        "gender_mapping": { "M": "Male", "F": "Female", "H": "Male" },
        "users": {
            "natural_key": "email",
            "fields": {
                "user_id": { "columns": ["email"], "transform": { "kind": "text", "case": "lower" } },
                "email": { "columns": ["email"], "transform": { "kind": "text", "case": "lower" } },
                "date_of_birth": { "columns": ["dob"], "transform": { "kind": "date", "formats": ["%d/%m/%Y", "%Y-%m-%d"] } },
                "gender": { "columns": ["gender"], "transform": { "kind": "gender_code" } },
                "salary": { "columns": ["salary"], "transform": { "kind": "salary" } }
            },
            "exclusions": [
                { "field": "email", "match": "contains", "pattern": "@test.invalid" }
            ]
        }
    }))
    .unwrap()
}

fn registry() -> MappingRegistry {
    let context = ResolveContext::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let mut registry = MappingRegistry::new(context);
    registry.insert(source("UK", "GBP", "en-GB")).unwrap();
    registry.insert(source("FR", "EUR", "fr-FR")).unwrap();
    registry
}

fn user(row: usize, email: &str, dob: &str, gender: &str, salary: &str) -> RawRecord {
    RawRecord::from_pairs(
        row,
        [("Email", email), ("DOB", dob), ("Gender", gender), ("Salary", salary)],
    )
}

fn valid_users(prefix: &str, count: usize, salary: &str) -> Vec<RawRecord> {
    (1..=count)
        .map(|row| user(row, &format!("{prefix}{row}@example.com"), "14/07/1985", "F", salary))
        .collect()
}

#[test]
fn sources_concatenate_in_declared_order() {
    let mut uk = valid_users("uk", 100, "£45,000");
    uk.push(user(101, "bad@example.com", "31/02/2020", "M", "£1"));
    uk.push(user(102, "qa@test.invalid", "01/01/1990", "M", "£1"));
    let mut fr = valid_users("fr", 50, "3 500,00 €");
    fr.push(user(51, "", "01/01/1990", "H", "1"));

    let batches = vec![SourceBatch::new("UK", uk), SourceBatch::new("FR", fr)];
    let output = merge(&registry(), &batches, TargetTable::Users).unwrap();

    assert_eq!(output.records.len(), 150);
    assert!(output.records[..100].iter().all(|r| r.country_code() == Some("UK")));
    assert!(output.records[100..].iter().all(|r| r.country_code() == Some("FR")));
    assert_eq!(output.records[0].user_id(), Some("uk1@example.com"));
    assert_eq!(output.records[100].user_id(), Some("fr1@example.com"));

    let result = &output.result;
    assert_eq!(result.accepted(), 150);
    assert_eq!(result.rejected(), 2);
    assert_eq!(result.excluded(), 1);
    let uk_stats = result.source("UK").unwrap();
    assert_eq!((uk_stats.total, uk_stats.accepted, uk_stats.rejected, uk_stats.excluded), (102, 100, 1, 1));
    let fr_stats = result.source("FR").unwrap();
    assert_eq!((fr_stats.total, fr_stats.accepted, fr_stats.rejected, fr_stats.excluded), (51, 50, 1, 0));
    assert!(result.sources.iter().all(|s| s.is_balanced()));

    let sources: Vec<&str> = result.sources.iter().map(|s| s.source.as_str()).collect();
    assert_eq!(sources, vec!["UK", "FR"]);
}

#[test]
fn rejections_carry_field_and_reason() {
    let batches = vec![SourceBatch::new(
        "UK",
        vec![
            user(1, "a@example.com", "31/02/2020", "F", "£10"),
            user(2, "", "01/01/1990", "F", "£10"),
        ],
    )];
    let output = merge(&registry(), &batches, TargetTable::Users).unwrap();
    assert!(output.records.is_empty());
    let reasons: Vec<(usize, &str, ReasonCode)> = output
        .result
        .rejections
        .iter()
        .map(|r| (r.record.row, r.field.as_str(), r.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (1, "date_of_birth", ReasonCode::DateParseError),
            (2, "user_id", ReasonCode::MissingFieldError),
        ]
    );
    assert_eq!(output.result.rejections[0].record.natural_key.as_deref(), Some("a@example.com"));
}

#[test]
fn excluded_records_leave_no_trace() {
    let batches = vec![SourceBatch::new(
        "UK",
        vec![user(1, "QA@TEST.INVALID", "garbage", "?", "nothing")],
    )];
    let output = merge(&registry(), &batches, TargetTable::Users).unwrap();
    assert!(output.records.is_empty());
    assert!(!output.result.has_rejections());
    assert_eq!(output.result.excluded(), 1);
}

#[test]
fn salary_and_gender_scenarios() {
    let batches = vec![SourceBatch::new("UK", vec![user(1, "a@example.com", "01/01/1990", "X", "£45,000")])];
    let output = merge(&registry(), &batches, TargetTable::Users).unwrap();
    let record = &output.records[0];
    let Some(CanonicalValue::Money(money)) = record.get("salary") else {
        panic!("salary missing");
    };
    assert_eq!(money.to_string(), "45000.00");
    assert_eq!(money.currency, "GBP");
    assert_eq!(record.get("gender"), Some(&CanonicalValue::Gender(Gender::Unknown)));
    assert_eq!(record.text("salary_currency"), Some("GBP"));
}

#[test]
fn configuration_errors_abort_before_processing() {
    let batches = vec![
        SourceBatch::new("UK", valid_users("uk", 3, "£1")),
        SourceBatch::new("US", valid_users("us", 3, "$1")),
    ];
    let err = merge(&registry(), &batches, TargetTable::Users).unwrap_err();
    assert_eq!(err, ConfigurationError::UnknownSource { source_id: "US".to_string() });

    let err = merge(&registry(), &batches[..1], TargetTable::Logins).unwrap_err();
    assert!(matches!(err, ConfigurationError::MissingTable { .. }));

    let twice = vec![batches[0].clone(), batches[0].clone()];
    let err = MergeEngine::new(&registry()).merge(&twice, TargetTable::Users).unwrap_err();
    assert!(matches!(err, ConfigurationError::DuplicateSource { .. }));

    let padded = vec![
        SourceBatch::new("UK", valid_users("uk", 1, "£1")),
        SourceBatch::new(" uk", valid_users("uk", 1, "£1")),
    ];
    let err = merge(&registry(), &padded, TargetTable::Users).unwrap_err();
    assert_eq!(err, ConfigurationError::DuplicateSource { source_id: " uk".to_string() });
}

fn usa_registry() -> MappingRegistry {
    let config: SourceConfig = serde_json::from_value(json!({
        "label": "USA",
        "currency": "USD",
        "locale": "en-US",
        "users": {
            "fields": {
                "user_id": { "columns": ["email"], "transform": { "kind": "text", "case": "lower" } },
                "date_of_birth": {
                    "columns": ["dob", "age"],
                    "transform": { "kind": "date", "formats": ["%m/%d/%y"], "year_from_age": true }
                },
                "gender": { "columns": ["gender"], "transform": { "kind": "gender_code" } },
                "salary": { "columns": ["salary"], "transform": { "kind": "salary" } }
            }
        }
    }))
    .unwrap();
    let context = ResolveContext::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    let mut registry = MappingRegistry::new(context);
    registry.insert(config).unwrap();
    registry
}

#[test]
fn date_from_age_needs_both_columns() {
    let records = vec![
        RawRecord::from_pairs(
            1,
            [("Email", "a@example.com"), ("DOB", "06/05/01"), ("Age", "40"), ("Gender", "F"), ("Salary", "$50,000")],
        ),
        RawRecord::from_pairs(2, [("Email", "b@example.com"), ("DOB", "06/05/01"), ("Age", "NA")]),
        RawRecord::from_pairs(3, [("Email", "c@example.com"), ("DOB", "06/05/01")]),
        RawRecord::from_pairs(4, [("Email", "d@example.com"), ("DOB", ""), ("Age", "40")]),
    ];
    let batches = vec![SourceBatch::new("USA", records)];
    let output = merge(&usa_registry(), &batches, TargetTable::Users).unwrap();

    assert_eq!(
        output.records[0].get("date_of_birth"),
        Some(&CanonicalValue::Date(NaiveDate::from_ymd_opt(1984, 6, 5).unwrap()))
    );
    let reasons: Vec<(usize, &str, ReasonCode)> = output
        .result
        .rejections
        .iter()
        .map(|r| (r.record.row, r.field.as_str(), r.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (2, "date_of_birth", ReasonCode::MissingFieldError),
            (3, "date_of_birth", ReasonCode::MissingFieldError),
            (4, "date_of_birth", ReasonCode::MissingFieldError),
        ]
    );
}

#[test]
fn accepted_records_satisfy_required_fields() {
    let batches = vec![SourceBatch::new("FR", valid_users("fr", 5, "2.000 EUR"))];
    let output = merge(&registry(), &batches, TargetTable::Users).unwrap();
    for record in &output.records {
        for spec in TargetTable::Users.required_fields() {
            assert!(!record.get(spec.name).unwrap().is_null(), "{}", spec.name);
        }
    }
}

proptest! {
    #[test]
    fn normalization_is_idempotent(
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
        day in 1u32..=28,
        month in 1u32..=12,
        year in 1900i32..2024,
        gender in "[MFX]",
        salary in "[0-9]{1,6}",
    ) {
        let registry = registry();
        let mapping = registry.resolve("UK", TargetTable::Users).unwrap();
        let record = user(1, &email, &format!("{day:02}/{month:02}/{year}"), &gender, &salary);
        let normalizer = RecordNormalizer::new(&mapping);
        let first = normalizer.normalize(&record);
        let second = normalizer.normalize(&record);
        prop_assert!(first.is_accepted());
        prop_assert_eq!(first, second);
    }
}

#[test]
fn normalizer_reports_exclusion_cause() {
    let registry = registry();
    let mapping = registry.resolve("UK", TargetTable::Users).unwrap();
    let outcome = RecordNormalizer::new(&mapping).normalize(&user(1, "x@test.invalid", "", "", ""));
    assert!(matches!(outcome, NormalizeOutcome::Excluded(unify_map::ExclusionCause::Rule(0))));
}
