//! Storage sink: persists canonical records into SQLite.

#![deny(unsafe_code)]

pub mod error;
pub mod schema;
pub mod sink;

pub use error::StoreError;
pub use schema::{create_table_sql, init_schema};
pub use sink::{RecordSink, SqliteSink};
