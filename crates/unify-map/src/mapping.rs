//! Resolved field mappings.

use unify_model::{FieldSpec, SourceIdentity, TargetTable, normalize_column_name};
use unify_transform::Transformer;

use crate::exclusion::ExclusionFilter;
use crate::missing::NullTokens;

/// How one canonical field is derived from raw columns.
#[derive(Debug, Clone)]
pub struct MappingEntry {
    pub field: &'static FieldSpec,
    /// Normalized source column names.
    pub columns: Vec<String>,
    pub transformer: Transformer,
    /// Absence rejects the record.
    pub required: bool,
    /// Raw value used when the primary column is absent.
    pub default: Option<String>,
}

impl MappingEntry {
    pub fn name(&self) -> &'static str {
        self.field.name
    }
}

/// A validated mapping of one source onto one target table.
///
/// Built once per source before any record is processed and shared
/// read-only by every record of that source.
#[derive(Debug, Clone)]
pub struct FieldMapping {
    identity: SourceIdentity,
    table: TargetTable,
    entries: Vec<MappingEntry>,
    natural_key: Option<String>,
    filter: ExclusionFilter,
    null_tokens: NullTokens,
}

impl FieldMapping {
    pub fn new(
        identity: SourceIdentity,
        table: TargetTable,
        entries: Vec<MappingEntry>,
        filter: ExclusionFilter,
        null_tokens: NullTokens,
    ) -> Self {
        Self {
            identity,
            table,
            entries,
            natural_key: None,
            filter,
            null_tokens,
        }
    }

    pub fn with_natural_key(mut self, column: Option<&str>) -> Self {
        self.natural_key = column.map(normalize_column_name);
        self
    }

    pub fn identity(&self) -> &SourceIdentity {
        &self.identity
    }

    pub fn source_id(&self) -> &str {
        &self.identity.id
    }

    pub fn table(&self) -> TargetTable {
        self.table
    }

    /// Entries in canonical schema order.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn entry(&self, field: &str) -> Option<&MappingEntry> {
        self.entries.iter().find(|entry| entry.name() == field)
    }

    pub fn natural_key(&self) -> Option<&str> {
        self.natural_key.as_deref()
    }

    pub fn filter(&self) -> &ExclusionFilter {
        &self.filter
    }

    pub fn null_tokens(&self) -> &NullTokens {
        &self.null_tokens
    }

    /// Schema fields with neither a mapping entry nor a stamp.
    pub fn unmapped_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.table
            .fields()
            .iter()
            .filter(|spec| !spec.is_stamped() && self.entry(spec.name).is_none())
    }
}
