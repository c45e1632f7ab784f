//! Field mapping resolution and exclusion filtering.
//!
//! [`resolve_mapping`] validates a [`SourceConfig`](unify_model::SourceConfig)
//! against the canonical schema and produces a [`FieldMapping`] the
//! normalizer can apply without further checks. The [`ExclusionFilter`]
//! decides which raw records are dropped before normalization.

#![deny(unsafe_code)]

pub mod exclusion;
pub mod mapping;
pub mod missing;
pub mod resolve;

pub use exclusion::{ExclusionCause, ExclusionFilter, ExclusionRule, should_exclude};
pub use mapping::{FieldMapping, MappingEntry};
pub use missing::{DEFAULT_NULL_TOKENS, NullTokens};
pub use resolve::{MappingRegistry, MappingSource, ResolveContext, resolve_identity, resolve_mapping};
