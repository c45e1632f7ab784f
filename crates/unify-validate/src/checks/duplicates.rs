//! Same user id twice within one source.

use std::collections::BTreeSet;

use unify_model::{CanonicalRecord, TargetTable};

use crate::report::{AuditIssue, AuditSeverity};

pub fn check(source: &str, users: &[&CanonicalRecord]) -> Option<AuditIssue> {
    let mut seen = BTreeSet::new();
    let duplicates = users
        .iter()
        .filter_map(|record| record.user_id())
        .filter(|user_id| !seen.insert(*user_id))
        .count() as u64;
    (duplicates > 0).then(|| AuditIssue {
        code: super::DUPLICATE_USER_ID.to_string(),
        severity: AuditSeverity::Warning,
        table: TargetTable::Users,
        source: source.to_string(),
        message: format!("{duplicates} user record(s) repeat an earlier user_id"),
        count: Some(duplicates),
    })
}
