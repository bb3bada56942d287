//! Article Harvester: a one-hop related-article scraper
//!
//! This crate fetches a seed article page, discovers its "related articles"
//! links, harvests a small record (title, author, date, URL) from every linked
//! page concurrently, and stores each record in SQLite.

pub mod article;
pub mod config;
pub mod harvester;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Status code error for {url}: {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Failed to save article from {url}: {source}")]
    Persist {
        url: String,
        source: storage::StorageError,
    },

    #[error("Harvest task for {url} failed: {source}")]
    TaskFailed {
        url: String,
        source: Box<HarvestError>,
    },

    #[error("Harvest task panicked: {0}")]
    TaskPanicked(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::TaskState,
        to: state::TaskState,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use article::{ArticleField, ArticleRecord};
pub use config::{DatabaseConfig, FailurePolicy, HarvestSettings};
pub use harvester::{HarvestReport, Harvester};
pub use state::TaskState;
