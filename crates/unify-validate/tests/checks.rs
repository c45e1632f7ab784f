//! Tests for audit checks.

use chrono::{TimeZone, Utc};
use unify_model::{CanonicalRecord, CanonicalValue, TargetTable};
use unify_validate::{AuditSeverity, DUPLICATE_USER_ID, ORPHAN_LOGIN, VISIT_MISMATCH, run_all};

fn user(source: &str, user_id: &str, visits: Option<i64>) -> CanonicalRecord {
    let mut record = CanonicalRecord::new(TargetTable::Users);
    record.push("user_id", CanonicalValue::Text(user_id.to_string()));
    record.push("country_code", CanonicalValue::Text(source.to_string()));
    record.push(
        "website_visits_last_30_days",
        visits.map_or(CanonicalValue::Null, CanonicalValue::Integer),
    );
    record
}

fn login(source: &str, user_id: &str) -> CanonicalRecord {
    let mut record = CanonicalRecord::new(TargetTable::Logins);
    record.push("user_id", CanonicalValue::Text(user_id.to_string()));
    record.push("country_code", CanonicalValue::Text(source.to_string()));
    record.push(
        "login_timestamp",
        CanonicalValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
    );
    record
}

#[test]
fn clean_output_reports_only_info() {
    let users = vec![user("UK", "a", Some(2)), user("UK", "b", Some(0))];
    let logins = vec![login("UK", "a"), login("UK", "a")];
    let report = run_all(&users, &logins);
    assert_eq!(report.error_count(), 0);
    assert_eq!(report.warning_count(), 0);
    let visit = report.issues_with_code(VISIT_MISMATCH).next().unwrap();
    assert_eq!(visit.severity, AuditSeverity::Info);
    assert_eq!(visit.count, Some(0));
}

#[test]
fn duplicates_are_per_source() {
    let users = vec![
        user("UK", "a", None),
        user("UK", "a", None),
        user("FR", "a", None),
    ];
    let report = run_all(&users, &[]);
    let issues: Vec<_> = report.issues_with_code(DUPLICATE_USER_ID).collect();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].source, "UK");
    assert_eq!(issues[0].count, Some(1));
}

#[test]
fn visit_mismatch_severity_follows_match_rate() {
    let users = vec![user("UK", "a", Some(1)), user("UK", "b", Some(3))];
    let logins = vec![login("UK", "a")];
    let report = run_all(&users, &logins);
    let visit = report.issues_with_code(VISIT_MISMATCH).next().unwrap();
    assert_eq!(visit.severity, AuditSeverity::Warning);
    assert!(visit.message.contains("50.0%"));

    let users = vec![user("FR", "a", Some(5))];
    let report = run_all(&users, &[]);
    assert!(report.has_errors());
}

#[test]
fn orphan_logins_are_flagged() {
    let users = vec![user("UK", "a", None)];
    let logins = vec![login("UK", "a"), login("UK", "ghost"), login("FR", "a")];
    let report = run_all(&users, &logins);
    let orphans: Vec<_> = report.issues_with_code(ORPHAN_LOGIN).collect();
    assert_eq!(orphans.len(), 2);
    assert_eq!((orphans[0].source.as_str(), orphans[0].count), ("UK", Some(1)));
    assert_eq!((orphans[1].source.as_str(), orphans[1].count), ("FR", Some(1)));
}
