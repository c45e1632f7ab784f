//! Reading source files into [`RawRecord`](unify_model::RawRecord) batches.

#![deny(unsafe_code)]

pub mod csv_records;
pub mod error;

pub use csv_records::{encoding_for_label, parse_raw_records, read_raw_records};
pub use error::IngestError;
