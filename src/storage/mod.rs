//! Storage module for persisting harvested articles
//!
//! This module handles all database operations for the harvester:
//! - SQLite database initialization and schema management
//! - Insert-only article persistence shared across concurrent tasks
//! - Read-back helpers for verification

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{ArticleStore, StorageError, StorageResult};

/// Represents an article row in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArticle {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub author: String,
    pub created_date: String,
    pub harvested_at: String,
}
