use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use log::info;
use rusqlite::Connection;

use crate::storage::{StorageError, StorageResult};

/// Hidden directory under the user's home where the app keeps its files.
const DATA_DIR_NAME: &str = ".bookshelf-manager";
/// Database file inside that directory.
const DB_FILE_NAME: &str = "shelf.sqlite";

/// Ensure the database file exists in the default data directory, create the
/// key-value table if needed, and return a live connection.
pub fn open_default() -> StorageResult<Connection> {
    let db_path = data_dir()?.join(DB_FILE_NAME);
    open_at(&db_path)
}

/// Open (or create) the store at an explicit path. Split out from
/// [`open_default`] so tests can point the store at a temporary directory.
pub fn open_at(path: impl AsRef<Path>) -> StorageResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDataDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    info!("opened store at {}", path.display());
    Ok(conn)
}

/// Open a throwaway store that lives only as long as the connection. Used by
/// tests and as the backing for a shelf that could not reach the disk.
pub fn open_in_memory() -> StorageResult<Connection> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Resolve the application data directory inside the user's home. The log
/// files live here alongside the database, so this is public.
pub fn data_dir() -> StorageResult<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or(StorageError::NoHomeDirectory)?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

fn ensure_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS storage (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}
