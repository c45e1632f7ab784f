//! Rejection reports and merge statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::TargetTable;

/// Why a record was rejected during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReasonCode {
    MissingFieldError,
    DateParseError,
    NumericParseError,
    FieldTooLongError,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::MissingFieldError => "MissingFieldError",
            ReasonCode::DateParseError => "DateParseError",
            ReasonCode::NumericParseError => "NumericParseError",
            ReasonCode::FieldTooLongError => "FieldTooLongError",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a raw record within its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    /// 1-based data row index.
    pub row: usize,
    /// Natural key (e.g. email) when the mapping declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natural_key: Option<String>,
}

/// A per-record validation failure. Never persisted to output tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionReport {
    pub source: String,
    pub table: TargetTable,
    pub record: RecordRef,
    /// Canonical field that failed.
    pub field: String,
    pub reason: ReasonCode,
    pub detail: String,
    /// Offending raw value; personal data, redact before logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,
}

/// Counts for one source within one merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub source: String,
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub excluded: usize,
}

impl SourceStats {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Every input row is exactly one of accepted, rejected or excluded.
    pub fn is_balanced(&self) -> bool {
        self.accepted + self.rejected + self.excluded == self.total
    }
}

/// Outcome statistics of merging all sources into one target table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeResult {
    pub table: TargetTable,
    /// Per-source counts, in source order.
    pub sources: Vec<SourceStats>,
    pub rejections: Vec<RejectionReport>,
}

impl MergeResult {
    pub fn new(table: TargetTable) -> Self {
        Self {
            table,
            sources: Vec::new(),
            rejections: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.sources.iter().map(|s| s.total).sum()
    }

    pub fn accepted(&self) -> usize {
        self.sources.iter().map(|s| s.accepted).sum()
    }

    pub fn rejected(&self) -> usize {
        self.sources.iter().map(|s| s.rejected).sum()
    }

    pub fn excluded(&self) -> usize {
        self.sources.iter().map(|s| s.excluded).sum()
    }

    pub fn source(&self, source: &str) -> Option<&SourceStats> {
        self.sources.iter().find(|s| s.source == source)
    }

    pub fn has_rejections(&self) -> bool {
        !self.rejections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_result_totals_sum_sources() {
        let mut result = MergeResult::new(TargetTable::Users);
        result.sources.push(SourceStats {
            source: "UK".to_string(),
            total: 10,
            accepted: 7,
            rejected: 2,
            excluded: 1,
        });
        result.sources.push(SourceStats {
            source: "FR".to_string(),
            total: 5,
            accepted: 5,
            rejected: 0,
            excluded: 0,
        });
        assert_eq!(result.total(), 15);
        assert_eq!(result.accepted(), 12);
        assert_eq!(result.rejected(), 2);
        assert_eq!(result.excluded(), 1);
        assert!(result.sources.iter().all(SourceStats::is_balanced));
        assert_eq!(result.source("FR").map(|s| s.accepted), Some(5));
    }

    #[test]
    fn reason_codes_serialize_by_name() {
        let json = serde_json::to_string(&ReasonCode::DateParseError).unwrap();
        assert_eq!(json, "\"DateParseError\"");
    }
}
