use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The database file could not be created or opened
    #[error("store unavailable at {}: {reason}", path.display())]
    Unavailable { path: PathBuf, reason: String },

    #[error("store schema version {found} is not supported (expected {supported})")]
    UnsupportedSchema { found: i64, supported: i64 },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// The worker thread owning the connection is gone
    #[error("store worker has shut down")]
    WorkerGone,
}
