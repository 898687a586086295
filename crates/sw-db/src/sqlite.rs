//! Built-in SQLite file backend

use crate::error::{DbError, DbResult};
use crate::traits::Backend;
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Reserved version-tracking table. The CHECK on the primary key pins the
/// table to a single row.
const META_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS _meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL DEFAULT 0
)";

/// SQLite file backend
///
/// Opens a fresh connection per operation instead of holding one for the
/// lifetime of a run: a restore replaces the database file on disk, and a
/// held connection would keep reading the replaced inode. Process-invoked
/// migration scripts also open their own connections, so the file must not
/// be pinned between operations.
pub struct SqliteBackend {
    path: PathBuf,
}

impl SqliteBackend {
    /// Open the backend against an existing database file
    pub fn open(path: &Path) -> DbResult<Self> {
        if !path.is_file() {
            return Err(DbError::ConnectionFailed(format!(
                "no such database file: {}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Open the backend, creating an empty database file if missing
    pub fn open_or_create(path: &Path) -> DbResult<Self> {
        Connection::open(path).map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path to the managed database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> DbResult<Connection> {
        Connection::open(&self.path).map_err(|e| DbError::ConnectionFailed(e.to_string()))
    }

    fn meta_table_exists(conn: &Connection) -> DbResult<bool> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_meta'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn ensure_version_storage_sync(&self) -> DbResult<()> {
        let conn = self.connect()?;
        conn.execute(META_TABLE_DDL, [])?;
        conn.execute("INSERT OR IGNORE INTO _meta (id, version) VALUES (1, 0)", [])?;
        Ok(())
    }

    fn read_version_sync(&self) -> DbResult<Option<u32>> {
        let conn = self.connect()?;
        if !Self::meta_table_exists(&conn)? {
            return Ok(None);
        }
        let version: Option<i64> = conn
            .query_row("SELECT version FROM _meta WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()?;
        match version {
            Some(v) if v >= 0 => Ok(Some(v as u32)),
            Some(v) => Err(DbError::VersionStorageCorrupt(format!(
                "negative version {} in {}",
                v,
                self.path.display()
            ))),
            None => Err(DbError::VersionStorageCorrupt(format!(
                "_meta table in {} has no version row",
                self.path.display()
            ))),
        }
    }

    fn write_version_sync(&self, version: u32) -> DbResult<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO _meta (id, version) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET version = excluded.version",
            [version],
        )?;
        Ok(())
    }

    fn execute_script_sync(&self, sql: &str) -> DbResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.commit()?;
        Ok(())
    }

    /// DDL of every user-defined object in the database, in creation order.
    /// Skips SQLite internals and the `_meta` table; used to capture a
    /// baseline schema at enrollment.
    pub fn schema_sql(&self) -> DbResult<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT sql FROM sqlite_master
             WHERE sql IS NOT NULL AND name NOT LIKE 'sqlite_%' AND name != '_meta'
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut ddl = Vec::new();
        for row in rows {
            ddl.push(row?);
        }
        Ok(ddl)
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn ensure_version_storage(&self) -> DbResult<()> {
        self.ensure_version_storage_sync()
    }

    async fn read_version(&self) -> DbResult<Option<u32>> {
        self.read_version_sync()
    }

    async fn write_version(&self, version: u32) -> DbResult<()> {
        self.write_version_sync(version)
    }

    async fn execute_script(&self, sql: &str) -> DbResult<()> {
        self.execute_script_sync(sql)
    }

    fn backend_type(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_db(dir: &TempDir) -> SqliteBackend {
        SqliteBackend::open_or_create(&dir.path().join("test.db")).unwrap()
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(SqliteBackend::open(&dir.path().join("absent.db")).is_err());
    }

    #[tokio::test]
    async fn test_fresh_database_is_unmanaged() {
        let dir = TempDir::new().unwrap();
        let db = new_db(&dir);
        assert_eq!(db.read_version().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ensure_version_storage_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db = new_db(&dir);
        db.ensure_version_storage().await.unwrap();
        db.ensure_version_storage().await.unwrap();
        assert_eq!(db.read_version().await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_ensure_does_not_reset_version() {
        let dir = TempDir::new().unwrap();
        let db = new_db(&dir);
        db.ensure_version_storage().await.unwrap();
        db.write_version(7).await.unwrap();
        db.ensure_version_storage().await.unwrap();
        assert_eq!(db.read_version().await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn test_write_version_upserts() {
        let dir = TempDir::new().unwrap();
        let db = new_db(&dir);
        db.ensure_version_storage().await.unwrap();
        db.write_version(3).await.unwrap();
        db.write_version(4).await.unwrap();
        assert_eq!(db.read_version().await.unwrap(), Some(4));

        // Exactly one row regardless of how many writes happened
        let conn = Connection::open(db.path()).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM _meta", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn test_execute_script_batch() {
        let dir = TempDir::new().unwrap();
        let db = new_db(&dir);
        db.execute_script(
            "CREATE TABLE t1 (id INTEGER); CREATE TABLE t2 (id INTEGER); INSERT INTO t1 VALUES (1);",
        )
        .await
        .unwrap();

        let conn = Connection::open(db.path()).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_execute_script_rolls_back_whole_batch() {
        let dir = TempDir::new().unwrap();
        let db = new_db(&dir);
        db.execute_script("CREATE TABLE t (id INTEGER);").await.unwrap();

        // Second statement fails; the insert before it must not survive
        let result = db
            .execute_script("INSERT INTO t VALUES (1); INSERT INTO missing VALUES (2);")
            .await;
        assert!(result.is_err());

        let conn = Connection::open(db.path()).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_schema_sql_skips_meta() {
        let dir = TempDir::new().unwrap();
        let db = new_db(&dir);
        db.ensure_version_storage().await.unwrap();
        db.execute_script("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);")
            .await
            .unwrap();

        let ddl = db.schema_sql().unwrap();
        assert_eq!(ddl.len(), 1);
        assert!(ddl[0].contains("users"));
    }
}
