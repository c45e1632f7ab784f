//! `website_visits_last_30_days` against the number of recorded logins.

use std::collections::BTreeMap;

use unify_model::{CanonicalRecord, TargetTable};

use crate::report::{AuditIssue, AuditSeverity};

const VISITS_FIELD: &str = "website_visits_last_30_days";

pub fn check(
    source: &str,
    users: &[&CanonicalRecord],
    logins: &[&CanonicalRecord],
) -> Option<AuditIssue> {
    let mut login_counts: BTreeMap<&str, i64> = BTreeMap::new();
    for user_id in logins.iter().filter_map(|record| record.user_id()) {
        *login_counts.entry(user_id).or_default() += 1;
    }

    let mut compared = 0u64;
    let mut matched = 0u64;
    for record in users {
        let (Some(user_id), Some(visits)) = (
            record.user_id(),
            record.get(VISITS_FIELD).and_then(|value| value.as_integer()),
        ) else {
            continue;
        };
        compared += 1;
        if login_counts.get(user_id).copied().unwrap_or(0) == visits {
            matched += 1;
        }
    }
    if compared == 0 {
        return None;
    }

    let percent = matched as f64 * 100.0 / compared as f64;
    let severity = if matched == compared {
        AuditSeverity::Info
    } else if matched == 0 {
        AuditSeverity::Error
    } else {
        AuditSeverity::Warning
    };
    Some(AuditIssue {
        code: super::VISIT_MISMATCH.to_string(),
        severity,
        table: TargetTable::Users,
        source: source.to_string(),
        message: format!("{matched} of {compared} users ({percent:.1}%) have visit counts matching their logins"),
        count: Some(compared - matched),
    })
}
