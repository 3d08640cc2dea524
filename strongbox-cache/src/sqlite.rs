//! SQLite-backed cache slot.

use crate::backend::CacheBackend;
use crate::error::{CacheError, CacheResult};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::debug;

/// Keeps the cache entry in row `1` of a single-row `cache` table.
pub struct SqliteBackend {
    conn: Option<Connection>,
}

impl SqliteBackend {
    /// Opens or creates the database at `path`.
    pub fn open(path: &Path) -> CacheResult<Self> {
        let conn = Connection::open(path)?;
        initialize_cache_schema(&conn)?;
        debug!("opened cache database at {}", path.display());
        Ok(Self { conn: Some(conn) })
    }

    /// Opens an in-memory database (for testing).
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_cache_schema(&conn)?;
        Ok(Self { conn: Some(conn) })
    }

    fn conn(&self) -> CacheResult<&Connection> {
        self.conn.as_ref().ok_or(CacheError::Closed)
    }
}

impl CacheBackend for SqliteBackend {
    fn read(&mut self) -> CacheResult<Option<Vec<u8>>> {
        let data = self
            .conn()?
            .query_row("SELECT data FROM cache WHERE id = 1", [], |row| row.get(0))
            .optional()?;
        Ok(data)
    }

    fn replace(&mut self, entry: &[u8]) -> CacheResult<()> {
        self.conn()?.execute(
            "INSERT INTO cache (id, data) VALUES (1, ?1) \
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
            params![entry],
        )?;
        Ok(())
    }

    fn clear(&mut self) -> CacheResult<()> {
        self.conn()?.execute("DELETE FROM cache", [])?;
        Ok(())
    }

    fn close(&mut self) -> CacheResult<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| CacheError::Sqlite(e))?;
        }
        Ok(())
    }
}

fn initialize_cache_schema(conn: &Connection) -> CacheResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS cache (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            data BLOB NOT NULL
        );
        "#,
    )?;
    Ok(())
}
