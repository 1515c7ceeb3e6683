//! Database connection management
//!
//! Opens the SQLite file, applies connection pragmas and hands out scoped handles

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::utils::error::{AppError, AppResult};

use super::schema::INIT_SCHEMA;

/// Database connection manager
#[derive(Clone)]
pub struct Database {
    /// Shared connection; every operation locks it for its own duration
    conn: Arc<Mutex<Connection>>,
    /// Database file path
    path: PathBuf,
}

impl Database {
    /// Open or create the database at `path`
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        };
        db.configure()?;

        tracing::debug!("opened database {:?}", db.path);
        Ok(db)
    }

    /// Open an in-memory database (used by tests)
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            path: PathBuf::from(":memory:"),
        };
        db.configure()?;

        Ok(db)
    }

    fn configure(&self) -> AppResult<()> {
        let conn = self.connection()?;

        // foreign_keys is per connection and required for post_tag cascades
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = 5000;
            "#,
        )?;

        Ok(())
    }

    /// Create the post, tag and post_tag tables if they are missing
    pub fn ensure_schema(&self) -> AppResult<()> {
        let conn = self.connection()?;
        conn.execute_batch(INIT_SCHEMA)?;
        tracing::info!("database schema ready at {:?}", self.path);
        Ok(())
    }

    /// Scoped connection handle, released when the guard drops
    pub fn connection(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            AppError::Storage(rusqlite::Error::InvalidParameterName(format!(
                "connection lock poisoned: {}",
                e
            )))
        })
    }

    /// Run `f` inside a transaction. Any error rolls every write back.
    pub fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection if this is the last handle to it
    pub fn close(self) -> AppResult<()> {
        let Database { conn, path } = self;
        match Arc::try_unwrap(conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().map_err(|e| {
                    AppError::Storage(rusqlite::Error::InvalidParameterName(format!(
                        "connection lock poisoned: {}",
                        e
                    )))
                })?;
                conn.close().map_err(|(_, e)| AppError::Storage(e))?;
                tracing::debug!("closed database {:?}", path);
            }
            Err(_) => {
                tracing::debug!("database {:?} still shared, leaving it open", path);
            }
        }
        Ok(())
    }

    /// Row counts and file size
    pub fn stats(&self) -> AppResult<DatabaseStats> {
        let conn = self.connection()?;

        let post_count: i64 = conn.query_row("SELECT COUNT(*) FROM post", [], |row| row.get(0))?;
        let tag_count: i64 = conn.query_row("SELECT COUNT(*) FROM tag", [], |row| row.get(0))?;
        let link_count: i64 =
            conn.query_row("SELECT COUNT(*) FROM post_tag", [], |row| row.get(0))?;

        let db_size = std::fs::metadata(&self.path)
            .map(|m| m.len() as i64)
            .unwrap_or(0);

        Ok(DatabaseStats {
            post_count,
            tag_count,
            link_count,
            db_size,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStats {
    pub post_count: i64,
    pub tag_count: i64,
    pub link_count: i64,
    pub db_size: i64,
}

/// Default database path
pub fn default_db_path() -> PathBuf {
    // Linux: ~/.local/share/blogmeta/posts.sqlite3
    // macOS: ~/Library/Application Support/blogmeta/posts.sqlite3
    // Windows: %APPDATA%/blogmeta/posts.sqlite3
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("blogmeta")
        .join("posts.sqlite3")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::TABLES;
    use tempfile::TempDir;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        db.ensure_schema().expect("Failed to create schema");

        let stats = db.stats().expect("Failed to get stats");
        assert_eq!(stats.post_count, 0);
        assert_eq!(stats.tag_count, 0);
        assert_eq!(stats.link_count, 0);
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.ensure_schema().unwrap();
        db.ensure_schema().unwrap();

        let conn = db.connection().unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for table in TABLES {
            assert!(tables.contains(&table.to_string()), "missing table {}", table);
        }
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.connection().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();
        db.ensure_schema().unwrap();

        let result: AppResult<()> = db.transaction(|conn| {
            conn.execute(
                "INSERT INTO tag (name, category, description) VALUES ('go', 'lang', 'Go posts')",
                [],
            )?;
            Err(AppError::Reference("forced".to_string()))
        });
        assert!(result.is_err());

        assert_eq!(db.stats().unwrap().tag_count, 0);
    }

    #[test]
    fn test_open_file_and_close() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("posts.sqlite3");

        let db = Database::open(&path).unwrap();
        db.ensure_schema().unwrap();
        assert_eq!(db.path(), path.as_path());
        db.close().unwrap();

        let reopened = Database::open(&path).unwrap();
        reopened.ensure_schema().unwrap();
        assert!(reopened.stats().unwrap().db_size > 0);
    }
}
