//! Audit checks run on the merged output before it is stored.

#![deny(unsafe_code)]

pub mod checks;
pub mod report;

pub use checks::{DUPLICATE_USER_ID, ORPHAN_LOGIN, VISIT_MISMATCH, run_all};
pub use report::{AuditIssue, AuditReport, AuditSeverity};
