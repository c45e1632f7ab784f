use std::path::PathBuf;

use unify_model::{MergeResult, TargetTable};
use unify_validate::AuditReport;

/// What the orchestrator should do with one manifest.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub manifest: PathBuf,
    /// Overrides the manifest's database.
    pub database: Option<PathBuf>,
    pub dry_run: bool,
    /// Where to write rejection reports as JSON.
    pub rejections: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunResult {
    pub manifest: PathBuf,
    /// Database written to; `None` on a dry run.
    pub database: Option<PathBuf>,
    pub tables: Vec<TableSummary>,
    pub audit: AuditReport,
    pub rejections_file: Option<PathBuf>,
}

impl RunResult {
    pub fn table(&self, table: TargetTable) -> Option<&TableSummary> {
        self.tables.iter().find(|summary| summary.table == table)
    }

    pub fn rejected(&self) -> usize {
        self.tables.iter().map(|summary| summary.result.rejected()).sum()
    }
}

#[derive(Debug)]
pub struct TableSummary {
    pub table: TargetTable,
    pub result: MergeResult,
    /// Rows handed to the sink (0 on a dry run).
    pub written: usize,
}

/// Field coverage of one resolved source mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingCoverage {
    pub source: String,
    pub table: TargetTable,
    pub mapped: Vec<String>,
    pub stamped: Vec<String>,
    pub unmapped: Vec<String>,
    pub exclusion_rules: usize,
}
