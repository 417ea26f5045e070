//! SQLite-backed key-value persistence.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod connection;
mod kv;

pub use connection::{data_dir, open_at, open_default, open_in_memory};
pub use kv::{read_value, write_value, SHELF_KEY};

/// Result type for key-value store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while opening or using the key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The user's home directory could not be resolved, so there is nowhere
    /// to place the database file.
    #[error("could not locate home directory")]
    NoHomeDirectory,

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Creating the data directory failed.
    #[error("failed to create data directory `{path}`: {source}")]
    CreateDataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
