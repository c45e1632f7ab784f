//! Normalization and merge engine.
//!
//! [`RecordNormalizer`] turns one raw record into a canonical record, a
//! rejection or an exclusion. [`MergeEngine`] runs it over every source of a
//! target table and concatenates accepted records in source order.

#![deny(unsafe_code)]

pub mod engine;
pub mod normalizer;

pub use engine::{MergeAccumulator, MergeEngine, MergeOutput, SourceBatch, merge};
pub use normalizer::{NormalizeOutcome, RecordNormalizer};
