//! Merge of many sources into one target table.

use std::collections::BTreeSet;

use tracing::{debug, info, info_span};
use unify_map::{FieldMapping, MappingSource};
use unify_model::{
    CanonicalRecord, ConfigurationError, MergeResult, RawRecord, SourceStats, TargetTable,
};

use crate::normalizer::{NormalizeOutcome, RecordNormalizer};

/// Raw records of one source, in read order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBatch {
    pub source_id: String,
    pub records: Vec<RawRecord>,
}

impl SourceBatch {
    pub fn new(source_id: impl Into<String>, records: Vec<RawRecord>) -> Self {
        Self {
            source_id: source_id.into(),
            records,
        }
    }
}

/// Accepted records in source order plus the run statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutput {
    pub records: Vec<CanonicalRecord>,
    pub result: MergeResult,
}

/// Collects outcomes for one table. Appends happen in processing order.
#[derive(Debug)]
pub struct MergeAccumulator {
    records: Vec<CanonicalRecord>,
    result: MergeResult,
}

impl MergeAccumulator {
    pub fn new(table: TargetTable) -> Self {
        Self {
            records: Vec::new(),
            result: MergeResult::new(table),
        }
    }

    /// Normalize every record of one source and fold the outcomes in.
    pub fn add_source(&mut self, mapping: &FieldMapping, records: &[RawRecord]) -> SourceStats {
        let normalizer = RecordNormalizer::new(mapping);
        let mut stats = SourceStats::new(mapping.source_id());
        for record in records {
            stats.total += 1;
            match normalizer.normalize(record) {
                NormalizeOutcome::Accepted(canonical) => {
                    stats.accepted += 1;
                    self.records.push(canonical);
                }
                NormalizeOutcome::Rejected(report) => {
                    stats.rejected += 1;
                    self.result.rejections.push(report);
                }
                NormalizeOutcome::Excluded(_) => stats.excluded += 1,
            }
        }
        self.result.sources.push(stats.clone());
        stats
    }

    pub fn finish(self) -> MergeOutput {
        MergeOutput {
            records: self.records,
            result: self.result,
        }
    }
}

/// Drives normalization of all sources for a target table.
pub struct MergeEngine<'a, M: ?Sized> {
    mappings: &'a M,
}

impl<'a, M: MappingSource + ?Sized> MergeEngine<'a, M> {
    pub fn new(mappings: &'a M) -> Self {
        Self { mappings }
    }

    /// Every source mapping is resolved before the first record is read;
    /// any configuration problem aborts the run with nothing processed.
    pub fn merge(
        &self,
        sources: &[SourceBatch],
        table: TargetTable,
    ) -> Result<MergeOutput, ConfigurationError> {
        let span = info_span!("merge", table = %table);
        let _guard = span.enter();

        let mut seen = BTreeSet::new();
        let mut mappings = Vec::with_capacity(sources.len());
        for batch in sources {
            if !seen.insert(batch.source_id.trim().to_ascii_uppercase()) {
                return Err(ConfigurationError::DuplicateSource {
                    source_id: batch.source_id.clone(),
                });
            }
            let mapping = self.mappings.resolve(&batch.source_id, table)?;
            debug!(source = %batch.source_id, fields = mapping.entries().len(), "mapping resolved");
            mappings.push(mapping);
        }

        let mut accumulator = MergeAccumulator::new(table);
        for (batch, mapping) in sources.iter().zip(&mappings) {
            let source_span = info_span!("source", source = %batch.source_id);
            let _source_guard = source_span.enter();
            let stats = accumulator.add_source(mapping, &batch.records);
            info!(
                total = stats.total,
                accepted = stats.accepted,
                rejected = stats.rejected,
                excluded = stats.excluded,
                "source merged"
            );
        }

        let output = accumulator.finish();
        info!(
            accepted = output.result.accepted(),
            rejected = output.result.rejected(),
            excluded = output.result.excluded(),
            "table merged"
        );
        Ok(output)
    }
}

/// Shorthand for [`MergeEngine::merge`].
pub fn merge<M: MappingSource + ?Sized>(
    mappings: &M,
    sources: &[SourceBatch],
    table: TargetTable,
) -> Result<MergeOutput, ConfigurationError> {
    MergeEngine::new(mappings).merge(sources, table)
}
