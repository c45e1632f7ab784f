//! The TOML pipeline manifest.
//!
//! ```toml
//! [pipeline]
//! database = "customers.db"
//! as_of = "2024-06-01"
//! sparse_row_threshold = 0.5
//!
//! [[sources]]
//! config = "uk.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub pipeline: PipelineSection,
    /// Sources in processing order.
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSection {
    /// SQLite database, relative to the manifest.
    #[serde(default)]
    pub database: Option<PathBuf>,
    /// Reference date (`YYYY-MM-DD`); today when absent.
    #[serde(default)]
    pub as_of: Option<String>,
    #[serde(default)]
    pub null_tokens: Option<Vec<String>>,
    #[serde(default)]
    pub sparse_row_threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceEntry {
    /// Source mapping JSON, relative to the manifest.
    pub config: PathBuf,
}
