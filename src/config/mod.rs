//! Configuration module for the harvester
//!
//! Two files feed a run:
//! - a JSON credentials file (`.env` by default) describing the article store
//! - an optional TOML settings file tuning the pipeline and selectors
//!
//! # Example
//!
//! ```no_run
//! use article_harvester::config::load_database_config;
//! use std::path::Path;
//!
//! let db = load_database_config(Path::new(".env")).unwrap();
//! println!("Store: {}", db.redacted_connection_string());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    DatabaseConfig, FailurePolicy, HarvestConfig, HarvestSettings, SelectorConfig,
    UserAgentConfig, DEFAULT_BASE_ORIGIN,
};

// Re-export parser functions
pub use parser::{load_database_config, load_settings, parse_database_config, parse_settings};
