//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ArticleStore trait.

use crate::article::ArticleRecord;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use crate::storage::StoredArticle;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
///
/// The connection sits behind a mutex so a single store can be shared by all
/// harvest tasks; each `save` holds the lock for exactly one INSERT.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError::Connection)` - Failed to open or configure the database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let connection_error = |source| StorageError::Connection {
            path: path.display().to_string(),
            source,
        };

        let conn = Connection::open(path).map_err(connection_error)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(connection_error)?;

        initialize_schema(&conn).map_err(connection_error)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::Connection {
            path: ":memory:".to_string(),
            source,
        })?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Counts the stored article rows
    pub fn count_articles(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Loads every stored article in insertion order
    pub fn load_articles(&self) -> StorageResult<Vec<StoredArticle>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, url, title, author, created_date, harvested_at
             FROM articles ORDER BY id",
        )?;

        let articles = stmt
            .query_map([], |row| {
                Ok(StoredArticle {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    title: row.get(2)?,
                    author: row.get(3)?,
                    created_date: row.get(4)?,
                    harvested_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(articles)
    }
}

impl ArticleStore for SqliteStore {
    fn save(&self, record: &ArticleRecord) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO articles (url, title, author, created_date, harvested_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.url,
                record.title,
                record.author,
                record.created_date,
                now
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}
