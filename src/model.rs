//! File Domain Model
//!
//! The relational side of the file domain: the table set the bootstrap
//! synchronizes, and the row type matching it. Richer file metadata
//! semantics (upload handling, access control) belong to calling layers.

use serde::{Deserialize, Serialize};

/// A table owned by the file domain.
pub struct TableDef {
    pub name: &'static str,
    pub create_sql: &'static str,
}

/// All tables owned by the file domain, for schema synchronization.
pub fn tables() -> Vec<TableDef> {
    vec![TableDef {
        name: "files",
        create_sql: "CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            mime TEXT NOT NULL DEFAULT '',
            size INTEGER NOT NULL DEFAULT 0,
            created_unix INTEGER NOT NULL DEFAULT 0,
            created_by_id INTEGER NOT NULL DEFAULT 0
        );",
    }]
}

/// A stored file's database row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub mime: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub created_unix: i64,
    #[serde(default)]
    pub created_by_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_cover_files() {
        let tables = tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "files");
        assert!(tables[0].create_sql.contains("IF NOT EXISTS"));
    }

    #[test]
    fn test_file_row_from_yaml() {
        let row: File = serde_yaml::from_str("id: 1\nname: test\nsize: 100\n").unwrap();
        assert_eq!(row.id, 1);
        assert_eq!(row.name, "test");
        assert_eq!(row.size, 100);
        assert_eq!(row.mime, "");
    }
}
