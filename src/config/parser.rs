use crate::config::types::{DatabaseConfig, HarvestSettings};
use crate::config::validation::{validate_database, validate_settings};
use crate::ConfigError;
use std::path::Path;

/// Loads the JSON credentials file describing the article store
///
/// The file holds one object with the string keys `username`, `password`,
/// `host`, `port` and `dbname`, plus an optional `path`.
///
/// # Returns
///
/// * `Ok(DatabaseConfig)` - Successfully loaded and validated credentials
/// * `Err(ConfigError)` - Failed to read, parse, or validate the file
pub fn load_database_config(path: &Path) -> Result<DatabaseConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_database_config(&content)
}

/// Parses and validates credentials from JSON text
pub fn parse_database_config(content: &str) -> Result<DatabaseConfig, ConfigError> {
    let config: DatabaseConfig = serde_json::from_str(content)?;
    validate_database(&config)?;
    Ok(config)
}

/// Loads harvest settings from a TOML file
///
/// Every table and key is optional; anything left out keeps its default.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use article_harvester::config::load_settings;
///
/// let settings = load_settings(Path::new("harvester.toml")).unwrap();
/// println!("Base origin: {}", settings.harvest.base_origin);
/// ```
pub fn load_settings(path: &Path) -> Result<HarvestSettings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Parses and validates harvest settings from TOML text
pub fn parse_settings(content: &str) -> Result<HarvestSettings, ConfigError> {
    let settings: HarvestSettings = toml::from_str(content)?;
    validate_settings(&settings)?;
    Ok(settings)
}
