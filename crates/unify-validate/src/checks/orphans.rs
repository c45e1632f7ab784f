//! Logins that reference no user of the same source.

use std::collections::BTreeSet;

use unify_model::{CanonicalRecord, TargetTable};

use crate::report::{AuditIssue, AuditSeverity};

pub fn check(
    source: &str,
    users: &[&CanonicalRecord],
    logins: &[&CanonicalRecord],
) -> Option<AuditIssue> {
    let known: BTreeSet<&str> = users.iter().filter_map(|record| record.user_id()).collect();
    let orphans = logins
        .iter()
        .filter_map(|record| record.user_id())
        .filter(|user_id| !known.contains(user_id))
        .count() as u64;
    (orphans > 0).then(|| AuditIssue {
        code: super::ORPHAN_LOGIN.to_string(),
        severity: AuditSeverity::Warning,
        table: TargetTable::Logins,
        source: source.to_string(),
        message: format!("{orphans} login(s) have no matching user"),
        count: Some(orphans),
    })
}
