//! Audit checks over accepted records.
//!
//! Checks only read the merge output; they never change it.

mod duplicates;
mod orphans;
mod visits;

use std::collections::BTreeMap;

use tracing::{info, warn};
use unify_model::CanonicalRecord;

use crate::report::{AuditReport, AuditSeverity};

pub const DUPLICATE_USER_ID: &str = "duplicate_user_id";
pub const VISIT_MISMATCH: &str = "visit_mismatch";
pub const ORPHAN_LOGIN: &str = "orphan_login";

/// Run every check on the merged users and logins.
pub fn run_all(users: &[CanonicalRecord], logins: &[CanonicalRecord]) -> AuditReport {
    let users_by_source = group_by_source(users);
    let logins_by_source = group_by_source(logins);
    let mut report = AuditReport::new();

    // 1. Duplicate user ids within a source
    for (source, records) in &users_by_source {
        report.issues.extend(duplicates::check(source, records));
    }

    // 2. Visit counts against login counts
    for (source, records) in &users_by_source {
        let source_logins = records_for(&logins_by_source, source);
        report.issues.extend(visits::check(source, records, source_logins));
    }

    // 3. Logins without a user
    for (source, records) in &logins_by_source {
        let source_users = records_for(&users_by_source, source);
        report.issues.extend(orphans::check(source, source_users, records));
    }

    for issue in &report.issues {
        match issue.severity {
            AuditSeverity::Info => info!(code = %issue.code, source = %issue.source, "{}", issue.message),
            _ => warn!(
                code = %issue.code,
                source = %issue.source,
                severity = issue.severity.as_str(),
                "{}",
                issue.message
            ),
        }
    }
    report
}

/// Records grouped by `country_code`, sources in first-seen order.
fn group_by_source(records: &[CanonicalRecord]) -> Vec<(String, Vec<&CanonicalRecord>)> {
    let mut order: Vec<(String, Vec<&CanonicalRecord>)> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let source = record.country_code().unwrap_or_default().to_string();
        let slot = *index.entry(source.clone()).or_insert_with(|| {
            order.push((source, Vec::new()));
            order.len() - 1
        });
        order[slot].1.push(record);
    }
    order
}

fn records_for<'g, 'r>(
    groups: &'g [(String, Vec<&'r CanonicalRecord>)],
    source: &str,
) -> &'g [&'r CanonicalRecord] {
    match groups.iter().find(|(name, _)| name == source) {
        Some((_, records)) => records,
        None => &[],
    }
}
