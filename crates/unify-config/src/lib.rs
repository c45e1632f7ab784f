//! Configuration loader: a TOML manifest listing per-source JSON mapping files.

#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod manifest;

pub use error::ConfigError;
pub use loader::{LoadedSource, PipelineConfig, load_manifest, load_pipeline, load_source_config};
pub use manifest::{Manifest, PipelineSection, SourceEntry};
