use crate::schema::{TargetTable, ValueKind};

/// Fatal configuration problem found while resolving a source mapping.
///
/// Raised before any record is processed; a merge run never partially
/// succeeds with a bad mapping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no mapping configured for source {source_id}")]
    UnknownSource { source_id: String },

    #[error("source {source_id} is configured twice")]
    DuplicateSource { source_id: String },

    #[error("source {source_id} has no {table} mapping")]
    MissingTable {
        source_id: String,
        table: TargetTable,
    },

    #[error("source {source_id}: {table} mapping is missing required field {field}")]
    MissingRequiredField {
        source_id: String,
        table: TargetTable,
        field: String,
    },

    #[error("source {source_id}: {field} is not a {table} field")]
    UnknownField {
        source_id: String,
        table: TargetTable,
        field: String,
    },

    #[error("source {source_id}: {field} is stamped from the source identity and cannot be mapped")]
    StampedField {
        source_id: String,
        table: TargetTable,
        field: String,
    },

    #[error("source {source_id}: {table}.{field} expects {expected} values but transform yields {actual}")]
    KindMismatch {
        source_id: String,
        table: TargetTable,
        field: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("source {source_id}: {table}.{field} must read {expected} column(s), found {actual}")]
    ColumnCount {
        source_id: String,
        table: TargetTable,
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("source {source_id}: {table}.{field} declares no date formats")]
    EmptyDateFormats {
        source_id: String,
        table: TargetTable,
        field: String,
    },

    #[error("source {source_id}: invalid exclusion pattern on {field}: {message}")]
    InvalidPattern {
        source_id: String,
        field: String,
        message: String,
    },

    #[error("source {source_id}: unknown salary locale profile {locale}")]
    UnknownLocale { source_id: String, locale: String },

    #[error("source {source_id}: timestamp field {field} needs a configured timezone")]
    MissingTimezone { source_id: String, field: String },

    #[error("source {source_id}: invalid timezone {timezone}")]
    InvalidTimezone { source_id: String, timezone: String },

    #[error("source {source_id}: {field} references unknown lookup table {lookup}")]
    UnknownLookup {
        source_id: String,
        field: String,
        lookup: String,
    },

    #[error("source {source_id}: gender token {token} maps to unknown label {label}")]
    InvalidGenderLabel {
        source_id: String,
        token: String,
        label: String,
    },

    #[error("source {source_id}: invalid country code {code}")]
    InvalidCountryCode { source_id: String, code: String },

    #[error("source {source_id}: invalid currency code {currency}")]
    InvalidCurrency { source_id: String, currency: String },

    #[error("source {source_id}: payment period must be at least 1")]
    InvalidPaymentPeriod { source_id: String },

    #[error("source {source_id}: default for {table}.{field} is invalid: {message}")]
    InvalidDefault {
        source_id: String,
        table: TargetTable,
        field: String,
        message: String,
    },

    #[error("sparse row threshold must be within 0.0..=1.0, got {value}")]
    InvalidThreshold { value: f64 },
}
