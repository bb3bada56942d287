use crate::config::types::{
    DatabaseConfig, HarvestConfig, HarvestSettings, SelectorConfig, UserAgentConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the database credentials
pub fn validate_database(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.dbname.is_empty() {
        return Err(ConfigError::Validation("dbname cannot be empty".to_string()));
    }

    if config.host.is_empty() {
        return Err(ConfigError::Validation("host cannot be empty".to_string()));
    }

    if config.port.parse::<u16>().is_err() {
        return Err(ConfigError::Validation(format!(
            "port must be a number between 0 and 65535, got '{}'",
            config.port
        )));
    }

    if let Some(path) = &config.path {
        if path.is_empty() {
            return Err(ConfigError::Validation("path cannot be empty".to_string()));
        }
    }

    Ok(())
}

/// Validates the harvest settings
pub fn validate_settings(settings: &HarvestSettings) -> Result<(), ConfigError> {
    validate_harvest_config(&settings.harvest)?;
    validate_selectors(&settings.selectors)?;
    validate_user_agent(&settings.user_agent)?;
    Ok(())
}

/// Validates pipeline configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.base_origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-origin: {}", e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-origin must use http or https, got '{}'",
            origin.scheme()
        )));
    }

    // hrefs start with '/', so a trailing slash would double it
    if config.base_origin.ends_with('/') {
        return Err(ConfigError::InvalidUrl(format!(
            "base-origin must not end with '/', got '{}'",
            config.base_origin
        )));
    }

    Ok(())
}

/// Validates that every selector is non-empty and parses
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    let selectors = [
        ("related-links", &config.related_links),
        ("title", &config.title),
        ("author", &config.author),
        ("created-date", &config.created_date),
    ];

    for (name, selector) in selectors {
        validate_selector(name, selector)?;
    }

    Ok(())
}

/// Validates a single CSS selector
pub fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector(format!(
            "{} selector cannot be empty",
            name
        )));
    }

    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", name, selector, e))
    })?;

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if config.name.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ConfigError::Validation(format!(
            "user-agent name must not contain whitespace or '/', got '{}'",
            config.name
        )));
    }

    Ok(())
}
