//! Crawler module for listing traversal and idea extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with the browser header set
//! - HTML parsing and schema-driven record extraction
//! - Next-page resolution with an explicit probe
//! - Request throttling and overall crawl coordination

mod coordinator;
mod document;
mod extractor;
mod fetcher;
mod pagination;
mod schema;
mod throttle;

pub use coordinator::{Coordinator, CrawlOutcome, Seed};
pub use document::{Document, Node};
pub use extractor::{Extraction, ExtractionError, Extractor, PageKind};
pub use fetcher::{build_http_client, fetch_url, FetchError, Fetcher, RawDocument, USER_AGENT};
pub use pagination::{
    fallback_candidate, find_linked_page, NextPage, NextPageSource, PaginationProbeError,
    PaginationResolver,
};
pub use schema::{CompiledSchema, DetailSchema, FieldSelectorSchema, ListingSchema, Rule};
pub use throttle::Throttle;

use crate::config::Config;
use crate::output::FileSink;
use crate::CrawlerError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client and compile the selector schema
/// 2. Attach a checkpoint sink when `[output] checkpoint` is set
/// 3. Run the loop matching the seed until it stops
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
/// * `seed` - A listing URL or a list of detail-page URLs
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - Whatever was collected and why the crawl stopped
/// * `Err(CrawlerError)` - The crawl could not be set up
pub async fn crawl(config: &Config, seed: Seed) -> Result<CrawlOutcome, CrawlerError> {
    let mut coordinator = Coordinator::new(config)?;

    if config.output.checkpoint {
        tracing::info!("Checkpoints enabled, saving after every page");
        coordinator =
            coordinator.with_checkpoint(Box::new(FileSink::new()), &config.output.base_filename);
    }

    let outcome = coordinator.crawl(seed).await;
    tracing::info!("Crawl stopped: {}", outcome.stop_reason);

    Ok(outcome)
}
