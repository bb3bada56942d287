//! Storage traits and error types
//!
//! This module defines the interface the harvest pipeline needs from an
//! article store, and the associated error type.

use crate::article::ArticleRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to connect to store at {path}: {source}")]
    Connection {
        path: String,
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence sink for harvested articles
///
/// Implementations are shared by every concurrent harvest task, so `save`
/// takes `&self` and the store handles its own synchronization.
pub trait ArticleStore: Send + Sync {
    /// Inserts `record` as a new row and returns the store-assigned id
    ///
    /// Each call is one atomic insert. Saving an identical record twice
    /// yields two independent rows.
    fn save(&self, record: &ArticleRecord) -> StorageResult<i64>;
}
