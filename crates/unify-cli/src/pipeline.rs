//! Merge run with explicit stages.
//!
//! 1. **Load**: read the manifest and every source mapping, resolve them all
//! 2. **Ingest**: read each source's CSV files into raw records
//! 3. **Merge**: normalize and concatenate `users`, then `logins`
//! 4. **Audit**: cross-check the merged tables
//! 5. **Store**: write accepted records to SQLite (skipped on a dry run)
//!
//! Any configuration, I/O or storage failure aborts the run. Rejected
//! records do not.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, info_span};
use unify_config::{PipelineConfig, load_pipeline};
use unify_core::{MergeEngine, MergeOutput, SourceBatch};
use unify_ingest::read_raw_records;
use unify_map::{MappingRegistry, MappingSource};
use unify_model::{RejectionReport, TargetTable};
use unify_store::{RecordSink, SqliteSink};
use unify_validate::{AuditReport, run_all};

use crate::logging::redact_value;
use crate::types::{MappingCoverage, RunOptions, RunResult, TableSummary};

/// Configuration with every mapping already resolved.
pub struct LoadedPipeline {
    pub config: PipelineConfig,
    pub registry: MappingRegistry,
}

pub fn load(manifest: &Path) -> Result<LoadedPipeline> {
    let config = load_pipeline(manifest)
        .with_context(|| format!("load pipeline manifest {}", manifest.display()))?;
    let registry = config.registry().context("register source mappings")?;
    for source in &config.sources {
        for table in TargetTable::ALL {
            if source.config.table(table).is_some() {
                registry
                    .resolve(source.label(), table)
                    .with_context(|| format!("resolve {table} mapping of {}", source.path.display()))?;
            }
        }
    }
    Ok(LoadedPipeline { config, registry })
}

/// Read the input file of every source that maps `table`, in manifest order.
pub fn ingest(config: &PipelineConfig, table: TargetTable) -> Result<Vec<SourceBatch>> {
    let span = info_span!("ingest", table = %table);
    let _guard = span.enter();
    let start = Instant::now();

    let mut batches = Vec::new();
    for source in &config.sources {
        if source.config.table(table).is_none() {
            debug!(source = %source.label(), "no mapping for table, skipped");
            continue;
        }
        let path = source.input_path(table).ok_or_else(|| {
            anyhow!(
                "source {} maps {table} but declares no input path ({})",
                source.label(),
                source.path.display()
            )
        })?;
        let encoding = source.encoding(table).unwrap_or("utf-8");
        let records = read_raw_records(&path, encoding)
            .with_context(|| format!("read {table} input of source {}", source.label()))?;
        debug!(
            source = %source.label(),
            path = %path.display(),
            records = records.len(),
            "input read"
        );
        batches.push(SourceBatch::new(source.label(), records));
    }

    info!(
        sources = batches.len(),
        records = batches.iter().map(|b| b.records.len()).sum::<usize>(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(batches)
}

pub fn merge_table(
    registry: &MappingRegistry,
    batches: &[SourceBatch],
    table: TargetTable,
) -> Result<MergeOutput> {
    let start = Instant::now();
    let output = MergeEngine::new(registry)
        .merge(batches, table)
        .with_context(|| format!("merge {table}"))?;
    for rejection in &output.result.rejections {
        debug!(
            source = %rejection.source,
            row = rejection.record.row,
            field = %rejection.field,
            raw_value = rejection.raw_value.as_deref().map(redact_value),
            "rejected value"
        );
    }
    debug!(table = %table, duration_ms = start.elapsed().as_millis(), "merge timing");
    Ok(output)
}

pub fn audit(users: &MergeOutput, logins: &MergeOutput) -> AuditReport {
    let span = info_span!("audit");
    let _guard = span.enter();
    run_all(&users.records, &logins.records)
}

pub fn store(database: &Path, outputs: &[&MergeOutput]) -> Result<Vec<usize>> {
    let span = info_span!("store", database = %database.display());
    let _guard = span.enter();
    let start = Instant::now();

    if let Some(parent) = database.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let mut sink = SqliteSink::open(database)
        .with_context(|| format!("open database {}", database.display()))?;
    let mut written = Vec::with_capacity(outputs.len());
    for output in outputs {
        let table = output.result.table;
        let count = sink
            .write(table, &output.records)
            .with_context(|| format!("write {table} to {}", database.display()))?;
        written.push(count);
    }
    info!(
        rows = written.iter().sum::<usize>(),
        duration_ms = start.elapsed().as_millis(),
        "store complete"
    );
    Ok(written)
}

pub fn write_rejections(path: &Path, rejections: &[&RejectionReport]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), rejections)
        .with_context(|| format!("write rejections to {}", path.display()))?;
    info!(path = %path.display(), count = rejections.len(), "rejections written");
    Ok(())
}

/// Run every stage for one manifest.
pub fn run_pipeline(options: &RunOptions) -> Result<RunResult> {
    let span = info_span!("run", manifest = %options.manifest.display());
    let _guard = span.enter();
    let start = Instant::now();

    let LoadedPipeline { config, registry } = load(&options.manifest)?;
    let database = if options.dry_run {
        None
    } else {
        let path = database_path(options, &config).ok_or_else(|| {
            anyhow!("no database configured; pass --database or set [pipeline].database")
        })?;
        Some(path)
    };

    let users_batches = ingest(&config, TargetTable::Users)?;
    let users = merge_table(&registry, &users_batches, TargetTable::Users)?;
    let logins_batches = ingest(&config, TargetTable::Logins)?;
    let logins = merge_table(&registry, &logins_batches, TargetTable::Logins)?;

    let report = audit(&users, &logins);

    let written = match &database {
        Some(path) => store(path, &[&users, &logins])?,
        None => {
            info!("dry run, nothing written");
            vec![0, 0]
        }
    };

    let rejections_file = match &options.rejections {
        Some(path) => {
            let rejections: Vec<&RejectionReport> = users
                .result
                .rejections
                .iter()
                .chain(&logins.result.rejections)
                .collect();
            write_rejections(path, &rejections)?;
            Some(path.clone())
        }
        None => None,
    };

    let tables = [users, logins]
        .into_iter()
        .zip(written)
        .map(|(output, written)| TableSummary {
            table: output.result.table,
            result: output.result,
            written,
        })
        .collect();

    info!(duration_ms = start.elapsed().as_millis(), "run complete");
    Ok(RunResult {
        manifest: options.manifest.clone(),
        database,
        tables,
        audit: report,
        rejections_file,
    })
}

/// Resolve every mapping and list which schema fields each one covers.
pub fn check_mappings(manifest: &Path) -> Result<Vec<MappingCoverage>> {
    let LoadedPipeline { config, registry } = load(manifest)?;
    let mut coverage = Vec::new();
    for source in &config.sources {
        for table in TargetTable::ALL {
            let Some(table_config) = source.config.table(table) else {
                continue;
            };
            let mapping = registry.resolve(source.label(), table)?;
            coverage.push(MappingCoverage {
                source: mapping.source_id().to_string(),
                table,
                mapped: mapping.entries().iter().map(|e| e.name().to_string()).collect(),
                stamped: table
                    .fields()
                    .iter()
                    .filter(|spec| spec.is_stamped())
                    .map(|spec| spec.name.to_string())
                    .collect(),
                unmapped: mapping.unmapped_fields().map(|spec| spec.name.to_string()).collect(),
                exclusion_rules: table_config.exclusions.len(),
            });
        }
    }
    Ok(coverage)
}

/// `--database` wins over the manifest.
pub fn database_path(options: &RunOptions, config: &PipelineConfig) -> Option<PathBuf> {
    options.database.clone().or_else(|| config.database.clone())
}
