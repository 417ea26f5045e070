use rusqlite::{params, Connection, OptionalExtension};

use crate::storage::StorageResult;

/// Fixed key under which the serialized book collection lives.
pub const SHELF_KEY: &str = "BOOKSHELF_APPS";

/// Read the raw string stored under `key`, or `None` when the key has never
/// been written.
pub fn read_value(conn: &Connection, key: &str) -> StorageResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM storage WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

/// Write `value` under `key`, replacing whatever was stored before.
pub fn write_value(conn: &Connection, key: &str, value: &str) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}
