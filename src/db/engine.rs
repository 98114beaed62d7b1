//! SQLite engine wrapper.
//!
//! Holds the connection and the schema-synchronization entry point. Test
//! engines live in memory; a fresh one per bootstrap keeps test runs
//! isolated from each other.

use rusqlite::{params, Connection};

use crate::model::{File, TableDef};

/// Database handle for the file domain.
pub struct Engine {
    conn: Connection,
}

impl Engine {
    /// Create a fresh test engine backed by an in-memory database.
    pub fn create_test() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Synchronize the schema against the given table definitions.
    /// Safe to run repeatedly; definitions use IF NOT EXISTS.
    pub fn sync_schema(&self, tables: &[TableDef]) -> Result<(), rusqlite::Error> {
        for table in tables {
            self.conn.execute_batch(table.create_sql)?;
        }
        Ok(())
    }

    /// Count rows in a table.
    pub fn count(&self, table: &str) -> Result<i64, rusqlite::Error> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
    }

    /// Fetch a file row by id.
    pub fn file_by_id(&self, id: i64) -> Result<Option<File>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, mime, size, created_unix, created_by_id
             FROM files WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(File {
                id: row.get(0)?,
                name: row.get(1)?,
                mime: row.get(2)?,
                size: row.get::<_, i64>(3)? as u64,
                created_unix: row.get(4)?,
                created_by_id: row.get(5)?,
            }))
        } else {
            Ok(None)
        }
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
