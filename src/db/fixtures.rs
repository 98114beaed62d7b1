//! Relational fixture loading.
//!
//! Fixtures are YAML files, one per table, each holding a sequence of
//! column maps. Loading is transactional and delete-then-insert, so
//! repeated loads reproduce the same table state.

use std::path::Path;

use indexmap::IndexMap;
use rusqlite::types::Value as SqlValue;
use thiserror::Error;
use tracing::debug;

use super::engine::Engine;

/// SQL dialect helper for fixture statements.
///
/// Selected from the configured database type; anything that is not a
/// known alternative falls back to SQLite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureDialect {
    Sqlite,
    Mysql,
}

impl FixtureDialect {
    /// Pick the dialect for a configured database type.
    pub fn for_database(database_type: &str) -> Self {
        match database_type {
            "mysql" => FixtureDialect::Mysql,
            _ => FixtureDialect::Sqlite,
        }
    }

    fn quote(&self, ident: &str) -> String {
        match self {
            FixtureDialect::Sqlite => format!("\"{}\"", ident),
            FixtureDialect::Mysql => format!("`{}`", ident),
        }
    }
}

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("fixture directory read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("fixture file '{file}' parse failed: {source}")]
    Parse {
        file: String,
        source: serde_yaml::Error,
    },

    #[error("fixture table '{table}' column '{column}' holds an unsupported value")]
    UnsupportedValue { table: String, column: String },

    #[error("fixture load failed: {0}")]
    Database(#[from] rusqlite::Error),
}

/// One fixture row: column name to value, in file order.
type Row = IndexMap<String, serde_yaml::Value>;

#[derive(Debug)]
struct FixtureTable {
    name: String,
    rows: Vec<Row>,
}

/// Parsed fixture set, reloadable into an engine any number of times.
#[derive(Debug)]
pub struct FixtureLoader {
    dialect: FixtureDialect,
    tables: Vec<FixtureTable>,
}

impl FixtureLoader {
    /// Scan `dir` for `<table>.yml` files and parse them.
    pub fn init(dialect: FixtureDialect, dir: &Path) -> Result<Self, FixtureError> {
        let mut tables = Vec::new();
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("yml") | Some("yaml")
                )
            })
            .collect();
        entries.sort();

        for path in entries {
            let name = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => continue,
            };
            let raw = std::fs::read_to_string(&path)?;
            let rows: Vec<Row> =
                serde_yaml::from_str(&raw).map_err(|source| FixtureError::Parse {
                    file: path.display().to_string(),
                    source,
                })?;
            debug!(table = %name, rows = rows.len(), "parsed fixture file");
            tables.push(FixtureTable { name, rows });
        }

        Ok(Self { dialect, tables })
    }

    /// Names of the tables this fixture set covers.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// Load the fixture set into the engine, replacing existing rows.
    pub fn load(&self, engine: &Engine) -> Result<(), FixtureError> {
        let conn = engine.conn();
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch("PRAGMA defer_foreign_keys = ON")?;

        for table in &self.tables {
            tx.execute(
                &format!("DELETE FROM {}", self.dialect.quote(&table.name)),
                [],
            )?;
            for row in &table.rows {
                let columns: Vec<String> =
                    row.keys().map(|c| self.dialect.quote(c)).collect();
                let placeholders: Vec<String> =
                    (1..=row.len()).map(|i| format!("?{}", i)).collect();
                let mut values = Vec::with_capacity(row.len());
                for (column, value) in row {
                    values.push(to_sql_value(value).ok_or_else(|| {
                        FixtureError::UnsupportedValue {
                            table: table.name.clone(),
                            column: column.clone(),
                        }
                    })?);
                }
                tx.execute(
                    &format!(
                        "INSERT INTO {} ({}) VALUES ({})",
                        self.dialect.quote(&table.name),
                        columns.join(", "),
                        placeholders.join(", ")
                    ),
                    rusqlite::params_from_iter(values),
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }
}

fn to_sql_value(value: &serde_yaml::Value) -> Option<SqlValue> {
    match value {
        serde_yaml::Value::Null => Some(SqlValue::Null),
        serde_yaml::Value::Bool(b) => Some(SqlValue::Integer(*b as i64)),
        serde_yaml::Value::Number(n) => n
            .as_i64()
            .map(SqlValue::Integer)
            .or_else(|| n.as_f64().map(SqlValue::Real)),
        serde_yaml::Value::String(s) => Some(SqlValue::Text(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tables;

    const FILES_YAML: &str = "\
- id: 1
  name: test
  mime: text/plain
  size: 100
  created_unix: 1570998791
  created_by_id: 1
- id: 2
  name: test2
  size: 9
  created_by_id: 1
";

    fn fixture_dir(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("files.yml"), content).unwrap();
        dir
    }

    fn synced_engine() -> Engine {
        let engine = Engine::create_test().unwrap();
        engine.sync_schema(&tables()).unwrap();
        engine
    }

    #[test]
    fn test_dialect_selection() {
        assert_eq!(
            FixtureDialect::for_database("mysql"),
            FixtureDialect::Mysql
        );
        assert_eq!(
            FixtureDialect::for_database("sqlite"),
            FixtureDialect::Sqlite
        );
        // Unknown types fall back to the default dialect.
        assert_eq!(
            FixtureDialect::for_database("postgres"),
            FixtureDialect::Sqlite
        );
        assert_eq!(FixtureDialect::for_database(""), FixtureDialect::Sqlite);
    }

    #[test]
    fn test_init_parses_tables() {
        let dir = fixture_dir(FILES_YAML);
        let loader = FixtureLoader::init(FixtureDialect::Sqlite, dir.path()).unwrap();
        assert_eq!(loader.table_names(), vec!["files"]);
    }

    #[test]
    fn test_init_missing_dir_is_io_error() {
        let err =
            FixtureLoader::init(FixtureDialect::Sqlite, Path::new("/no/such/dir")).unwrap_err();
        assert!(matches!(err, FixtureError::Io(_)));
    }

    #[test]
    fn test_init_bad_yaml_is_parse_error() {
        let dir = fixture_dir("{ not: [valid");
        let err = FixtureLoader::init(FixtureDialect::Sqlite, dir.path()).unwrap_err();
        assert!(matches!(err, FixtureError::Parse { .. }));
    }

    #[test]
    fn test_load_inserts_rows() {
        let dir = fixture_dir(FILES_YAML);
        let loader = FixtureLoader::init(FixtureDialect::Sqlite, dir.path()).unwrap();
        let engine = synced_engine();
        loader.load(&engine).unwrap();

        assert_eq!(engine.count("files").unwrap(), 2);
        let file = engine.file_by_id(1).unwrap().unwrap();
        assert_eq!(file.name, "test");
        assert_eq!(file.mime, "text/plain");
        assert_eq!(file.size, 100);
    }

    #[test]
    fn test_load_is_idempotent() {
        let dir = fixture_dir(FILES_YAML);
        let loader = FixtureLoader::init(FixtureDialect::Sqlite, dir.path()).unwrap();
        let engine = synced_engine();
        loader.load(&engine).unwrap();
        loader.load(&engine).unwrap();
        assert_eq!(engine.count("files").unwrap(), 2);
    }

    #[test]
    fn test_load_replaces_drifted_rows() {
        let dir = fixture_dir(FILES_YAML);
        let loader = FixtureLoader::init(FixtureDialect::Sqlite, dir.path()).unwrap();
        let engine = synced_engine();
        loader.load(&engine).unwrap();

        engine
            .conn()
            .execute("UPDATE files SET name = 'mutated' WHERE id = 1", [])
            .unwrap();
        engine
            .conn()
            .execute(
                "INSERT INTO files (id, name) VALUES (99, 'stray')",
                [],
            )
            .unwrap();

        loader.load(&engine).unwrap();
        assert_eq!(engine.count("files").unwrap(), 2);
        assert_eq!(engine.file_by_id(1).unwrap().unwrap().name, "test");
        assert!(engine.file_by_id(99).unwrap().is_none());
    }

    #[test]
    fn test_mysql_dialect_quoting_loads_on_sqlite() {
        // SQLite accepts backtick-quoted identifiers, so the alternative
        // dialect still loads against the test engine.
        let dir = fixture_dir(FILES_YAML);
        let loader = FixtureLoader::init(FixtureDialect::Mysql, dir.path()).unwrap();
        let engine = synced_engine();
        loader.load(&engine).unwrap();
        assert_eq!(engine.count("files").unwrap(), 2);
    }

    #[test]
    fn test_unsupported_value_is_rejected() {
        let dir = fixture_dir("- id: 1\n  name: [a, b]\n");
        let loader = FixtureLoader::init(FixtureDialect::Sqlite, dir.path()).unwrap();
        let engine = synced_engine();
        let err = loader.load(&engine).unwrap_err();
        assert!(matches!(err, FixtureError::UnsupportedValue { .. }));
    }

    #[test]
    fn test_load_missing_table_is_database_error() {
        let dir = fixture_dir(FILES_YAML);
        let loader = FixtureLoader::init(FixtureDialect::Sqlite, dir.path()).unwrap();
        let engine = Engine::create_test().unwrap();
        let err = loader.load(&engine).unwrap_err();
        assert!(matches!(err, FixtureError::Database(_)));
    }
}
