//! Loading of the manifest and the source files it lists.
//!
//! Only syntax is checked here. Values are validated when mappings resolve.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{debug, info};
use unify_map::{DEFAULT_NULL_TOKENS, MappingRegistry, ResolveContext};
use unify_model::{ConfigurationError, SourceConfig, TargetTable};

use crate::error::ConfigError;
use crate::manifest::Manifest;

pub fn load_manifest(path: &Path) -> Result<Manifest, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    toml::from_str(&contents).map_err(|e| ConfigError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn load_source_config(path: &Path) -> Result<SourceConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ConfigError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

/// A source configuration with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub config: SourceConfig,
}

impl LoadedSource {
    pub fn label(&self) -> &str {
        self.config.label.trim()
    }

    /// Input file of `table`, resolved against the config file's directory.
    pub fn input_path(&self, table: TargetTable) -> Option<PathBuf> {
        let relative = self.config.table(table)?.path.as_ref()?;
        Some(resolve_relative(&self.path, relative))
    }

    pub fn encoding(&self, table: TargetTable) -> Option<&str> {
        self.config.table(table).map(|t| t.encoding.as_str())
    }
}

/// Everything a run needs, with paths resolved and `as_of` fixed.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub manifest_path: PathBuf,
    pub database: Option<PathBuf>,
    pub as_of: NaiveDate,
    pub null_tokens: Vec<String>,
    pub sparse_row_threshold: Option<f64>,
    pub sources: Vec<LoadedSource>,
}

impl PipelineConfig {
    pub fn resolve_context(&self) -> ResolveContext {
        ResolveContext::new(self.as_of)
            .with_null_tokens(self.null_tokens.clone())
            .with_sparse_row_threshold(self.sparse_row_threshold)
    }

    /// Registry of every source in manifest order.
    pub fn registry(&self) -> Result<MappingRegistry, ConfigurationError> {
        let mut registry = MappingRegistry::new(self.resolve_context());
        for source in &self.sources {
            registry.insert(source.config.clone())?;
        }
        Ok(registry)
    }

    pub fn source(&self, label: &str) -> Option<&LoadedSource> {
        self.sources
            .iter()
            .find(|source| source.label().eq_ignore_ascii_case(label))
    }
}

/// Load the manifest and every source it lists, in declared order.
pub fn load_pipeline(manifest_path: &Path) -> Result<PipelineConfig, ConfigError> {
    let manifest = load_manifest(manifest_path)?;
    if manifest.sources.is_empty() {
        return Err(ConfigError::invalid(manifest_path, "no [[sources]] declared"));
    }

    let as_of = match manifest.pipeline.as_of.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
            ConfigError::invalid(manifest_path, format!("as_of {raw:?} is not a YYYY-MM-DD date: {e}"))
        })?,
        None => Local::now().date_naive(),
    };

    let mut sources = Vec::with_capacity(manifest.sources.len());
    for entry in &manifest.sources {
        let path = resolve_relative(manifest_path, &entry.config);
        let config = load_source_config(&path)?;
        debug!(source = %config.label, path = %path.display(), "source config loaded");
        sources.push(LoadedSource { path, config });
    }

    let config = PipelineConfig {
        manifest_path: manifest_path.to_path_buf(),
        database: manifest
            .pipeline
            .database
            .as_ref()
            .map(|db| resolve_relative(manifest_path, db)),
        as_of,
        null_tokens: manifest
            .pipeline
            .null_tokens
            .unwrap_or_else(|| DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect()),
        sparse_row_threshold: manifest.pipeline.sparse_row_threshold,
        sources,
    };
    info!(
        manifest = %manifest_path.display(),
        sources = config.sources.len(),
        as_of = %config.as_of,
        "pipeline configuration loaded"
    );
    Ok(config)
}

/// Resolve `relative` against the directory containing `anchor`.
fn resolve_relative(anchor: &Path, relative: &Path) -> PathBuf {
    if relative.is_absolute() {
        return relative.to_path_buf();
    }
    anchor
        .parent()
        .map_or_else(|| relative.to_path_buf(), |dir| dir.join(relative))
}
