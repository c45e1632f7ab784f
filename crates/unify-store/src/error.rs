use std::path::PathBuf;

use unify_model::TargetTable;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("record for table {actual} written to {expected}")]
    TableMismatch {
        expected: TargetTable,
        actual: TargetTable,
    },
}
