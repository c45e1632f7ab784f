//! Normalization of one raw record against a resolved mapping.
//!
//! Order per record:
//! 1. exclusion check (drop, no report)
//! 2. extraction with null tokens and defaults
//! 3. transformation
//! 4. stamping of source identity fields
//!
//! Errors never escape a record: they become a [`RejectionReport`].

use tracing::{trace, warn};
use unify_map::{ExclusionCause, FieldMapping, MappingEntry};
use unify_model::{
    CanonicalRecord, CanonicalValue, RawRecord, ReasonCode, RecordRef, RejectionReport,
};

/// Result of normalizing one raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizeOutcome {
    Accepted(CanonicalRecord),
    Rejected(RejectionReport),
    Excluded(ExclusionCause),
}

impl NormalizeOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, NormalizeOutcome::Accepted(_))
    }
}

/// Applies one source's [`FieldMapping`] to its raw records.
#[derive(Debug, Clone, Copy)]
pub struct RecordNormalizer<'a> {
    mapping: &'a FieldMapping,
}

impl<'a> RecordNormalizer<'a> {
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &FieldMapping {
        self.mapping
    }

    pub fn normalize(&self, record: &RawRecord) -> NormalizeOutcome {
        if let Some(cause) = self.mapping.filter().check(record) {
            trace!(source = %self.mapping.source_id(), row = record.row(), ?cause, "record excluded");
            return NormalizeOutcome::Excluded(cause);
        }

        let table = self.mapping.table();
        let identity = self.mapping.identity();
        let mut canonical = CanonicalRecord::new(table);
        for spec in table.fields() {
            let value = if let Some(stamp) = spec.stamped {
                identity
                    .stamp(stamp)
                    .map_or(CanonicalValue::Null, |v| CanonicalValue::Text(v.to_string()))
            } else if let Some(entry) = self.mapping.entry(spec.name) {
                match self.normalize_field(record, entry) {
                    Ok(value) => value,
                    Err(report) => return NormalizeOutcome::Rejected(report),
                }
            } else {
                CanonicalValue::Null
            };
            canonical.push(spec.name, value);
        }
        trace!(source = %self.mapping.source_id(), row = record.row(), "record accepted");
        NormalizeOutcome::Accepted(canonical)
    }

    fn normalize_field(
        &self,
        record: &RawRecord,
        entry: &MappingEntry,
    ) -> Result<CanonicalValue, RejectionReport> {
        let Some(inputs) = self.extract(record, entry) else {
            if entry.required {
                return Err(self.reject(
                    record,
                    entry,
                    ReasonCode::MissingFieldError,
                    format!("no value in column(s) {}", entry.columns.join(", ")),
                    None,
                ));
            }
            return Ok(CanonicalValue::Null);
        };

        match entry.transformer.apply(&inputs) {
            Ok(value) if value.is_null() && entry.required => Err(self.reject(
                record,
                entry,
                ReasonCode::MissingFieldError,
                format!("{} produced no value", entry.transformer.name()),
                inputs.first().map(|v| v.to_string()),
            )),
            Ok(value) => Ok(value),
            Err(err) if entry.required => Err(self.reject(
                record,
                entry,
                err.reason(),
                err.to_string(),
                inputs.first().map(|v| v.to_string()),
            )),
            Err(err) => {
                warn!(
                    source = %self.mapping.source_id(),
                    row = record.row(),
                    field = entry.name(),
                    reason = %err.reason(),
                    "optional field dropped"
                );
                Ok(CanonicalValue::Null)
            }
        }
    }

    /// Raw inputs for `entry`, or `None` when a value is absent and there is
    /// no default. Positional transformers need every column present.
    fn extract<'r>(&'r self, record: &'r RawRecord, entry: &'r MappingEntry) -> Option<Vec<&'r str>> {
        let nulls = self.mapping.null_tokens();
        let present = |column: &String| nulls.present(record.get(column));

        if entry.transformer.positional_columns().is_some() {
            return entry.columns.iter().map(present).collect();
        }
        let primary = entry
            .columns
            .iter()
            .find_map(present)
            .or(entry.default.as_deref())?;
        Some(vec![primary])
    }

    fn reject(
        &self,
        record: &RawRecord,
        entry: &MappingEntry,
        reason: ReasonCode,
        detail: String,
        raw_value: Option<String>,
    ) -> RejectionReport {
        let natural_key = self
            .mapping
            .natural_key()
            .and_then(|column| record.get(column))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        warn!(
            source = %self.mapping.source_id(),
            table = %self.mapping.table(),
            row = record.row(),
            field = entry.name(),
            reason = %reason,
            "record rejected"
        );
        RejectionReport {
            source: self.mapping.source_id().to_string(),
            table: self.mapping.table(),
            record: RecordRef {
                row: record.row(),
                natural_key,
            },
            field: entry.name().to_string(),
            reason,
            detail,
            raw_value,
        }
    }
}
