//! Data model for merging per-country user and login datasets.
//!
//! This crate holds the types shared by every stage of the merge:
//!
//! - **record**: raw input rows and normalized canonical rows
//! - **schema**: the canonical `users` / `logins` field sets
//! - **config**: serde shapes of per-source mapping configuration
//! - **report**: rejection reports and merge statistics
//! - **error**: configuration errors raised during mapping resolution

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod record;
pub mod report;
pub mod schema;
pub mod source;

pub use config::{
    CasePolicy, ExclusionRuleSpec, FieldMappingSpec, MatchCondition, SourceConfig,
    TableSourceConfig, TransformSpec,
};
pub use error::ConfigurationError;
pub use record::{
    CanonicalRecord, CanonicalValue, Gender, Money, RawRecord, normalize_column_name,
};
pub use report::{MergeResult, ReasonCode, RecordRef, RejectionReport, SourceStats};
pub use schema::{FieldSpec, StampedField, TargetTable, ValueKind};
pub use source::SourceIdentity;
