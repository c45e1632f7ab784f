use std::path::Path;

use rusqlite::Connection;
use rusqlite::types::Value;
use tracing::info;
use unify_model::{CanonicalRecord, CanonicalValue, TargetTable};

use crate::error::StoreError;
use crate::schema::{init_schema, insert_sql};

/// Persists canonical records of one table.
pub trait RecordSink {
    /// Write a batch; returns the number of rows written.
    fn write(&mut self, table: TargetTable, records: &[CanonicalRecord]) -> Result<usize, StoreError>;
}

/// SQLite-backed sink. Each batch is one transaction.
#[derive(Debug)]
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn row_count(&self, table: TargetTable) -> Result<usize, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn sql_value(value: &CanonicalValue) -> Value {
    match value {
        CanonicalValue::Null => Value::Null,
        CanonicalValue::Integer(n) => Value::Integer(*n),
        CanonicalValue::Money(money) => Value::Real(money.amount()),
        other => other.render().map_or(Value::Null, Value::Text),
    }
}

impl RecordSink for SqliteSink {
    fn write(&mut self, table: TargetTable, records: &[CanonicalRecord]) -> Result<usize, StoreError> {
        if let Some(record) = records.iter().find(|record| record.table != table) {
            return Err(StoreError::TableMismatch {
                expected: table,
                actual: record.table,
            });
        }
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&insert_sql(table))?;
            for record in records {
                let values: Vec<Value> = table
                    .fields()
                    .iter()
                    .map(|spec| record.get(spec.name).map_or(Value::Null, sql_value))
                    .collect();
                stmt.execute(rusqlite::params_from_iter(values))?;
            }
        }
        tx.commit()?;
        info!(table = %table, rows = records.len(), "records stored");
        Ok(records.len())
    }
}
