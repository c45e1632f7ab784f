//! SQLite DDL derived from the canonical schema.

use rusqlite::Connection;
use unify_model::{TargetTable, ValueKind};

pub fn column_type(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Money => "REAL",
        ValueKind::Integer => "INTEGER",
        ValueKind::Text | ValueKind::Date | ValueKind::Timestamp | ValueKind::Gender => "TEXT",
    }
}

/// `CREATE TABLE IF NOT EXISTS` for one target table.
pub fn create_table_sql(table: TargetTable) -> String {
    let mut columns = vec!["id INTEGER PRIMARY KEY AUTOINCREMENT".to_string()];
    for spec in table.fields() {
        let not_null = if spec.required { " NOT NULL" } else { "" };
        columns.push(format!("{} {}{not_null}", spec.name, column_type(spec.kind)));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        table.as_str(),
        columns.join(",\n    ")
    )
}

pub fn insert_sql(table: TargetTable) -> String {
    let names: Vec<&str> = table.fields().iter().map(|spec| spec.name).collect();
    let placeholders: Vec<String> = (1..=names.len()).map(|idx| format!("?{idx}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.as_str(),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// Create every target table that does not exist yet.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    for table in TargetTable::ALL {
        conn.execute(&create_table_sql(table), [])?;
    }
    Ok(())
}
