use std::path::Path;

use anyhow::Result;
use tracing::info;

use unify_cli::pipeline::{check_mappings, run_pipeline};
use unify_cli::types::{RunOptions, RunResult};

use crate::cli::RunArgs;
use crate::summary::{print_coverage, print_schema};

pub fn run_merge(args: &RunArgs) -> Result<RunResult> {
    let options = RunOptions {
        manifest: args.manifest.clone(),
        database: args.database.clone(),
        dry_run: args.dry_run,
        rejections: args.rejections.clone(),
    };
    run_pipeline(&options)
}

pub fn run_check(manifest: &Path) -> Result<()> {
    let coverage = check_mappings(manifest)?;
    info!(mappings = coverage.len(), "mappings resolved");
    print_coverage(&coverage);
    Ok(())
}

pub fn run_schema() -> Result<()> {
    print_schema();
    Ok(())
}
