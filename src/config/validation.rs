use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::crawler::DetailSchema;
use crate::url::parse_http_url;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    validate_positions(&config.detail)?;

    // Every selector must compile
    config.schema().compile()?;

    Ok(())
}

/// Returns the seed URL of a sequential crawl, or an error if none is configured
pub fn require_base_url(config: &CrawlerConfig) -> Result<Url, ConfigError> {
    let base_url = config.base_url.as_deref().ok_or_else(|| {
        ConfigError::Validation("base-url is required for a sequential crawl".to_string())
    })?;

    parse_http_url(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url '{}': {}", base_url, e)))
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.base_url.is_some() {
        require_base_url(config)?;
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    config.delay_duration()?;

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1s, got {}s",
            config.timeout
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.base_filename.trim().is_empty() {
        return Err(ConfigError::Validation(
            "base-filename cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the positional paragraph table of the detail schema
///
/// Positions are 1-based and must not overlap.
fn validate_positions(schema: &DetailSchema) -> Result<(), ConfigError> {
    let positions = schema.positional_fields();

    for (field, position) in &positions {
        if *position < 1 {
            return Err(ConfigError::Validation(format!(
                "position of {} must be >= 1, got {}",
                field, position
            )));
        }
    }

    for (i, (field, position)) in positions.iter().enumerate() {
        if let Some((other, _)) = positions[i + 1..].iter().find(|(_, p)| p == position) {
            return Err(ConfigError::Validation(format!(
                "{} and {} both read paragraph {}",
                field, other, position
            )));
        }
    }

    Ok(())
}
