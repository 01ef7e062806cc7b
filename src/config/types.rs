use crate::crawler::{DetailSchema, FieldSelectorSchema, ListingSchema};
use crate::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// Default per-fetch timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default delay between requests in seconds
pub const DEFAULT_DELAY_SECS: f64 = 1.0;

/// Default prefix of the output files
pub const DEFAULT_BASE_FILENAME: &str = "senai_data";

/// Main configuration structure for Ideia-Crawler
///
/// Every table and key is optional; an empty file yields `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub listing: ListingSchema,
    #[serde(default)]
    pub detail: DetailSchema,
}

impl Config {
    /// Returns the field selector schema declared by this configuration
    pub fn schema(&self) -> FieldSelectorSchema {
        FieldSelectorSchema {
            listing: self.listing.clone(),
            detail: self.detail.clone(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Seed URL of the listing; required for sequential crawls
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum number of listing pages to process (unbounded if absent)
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Delay between requests (seconds)
    pub delay: f64,

    /// Per-fetch timeout (seconds)
    pub timeout: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            max_pages: None,
            delay: DEFAULT_DELAY_SECS,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CrawlerConfig {
    /// Delay between requests
    ///
    /// Fails for negative, non-finite, or out-of-range values.
    pub fn delay_duration(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.delay).map_err(|e| {
            ConfigError::Validation(format!(
                "delay must be a non-negative number of seconds, got {} ({})",
                self.delay, e
            ))
        })
    }

    /// Per-fetch timeout
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix of the result files (`<base>.json`, `<base>_ideias.csv`)
    #[serde(rename = "base-filename")]
    pub base_filename: String,

    /// Save a snapshot after every page that added records
    pub checkpoint: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_filename: DEFAULT_BASE_FILENAME.to_string(),
            checkpoint: false,
        }
    }
}
