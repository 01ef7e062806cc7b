//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the two crawl loops:
//! - Sequential pagination over a listing, starting from a seed URL
//! - A single pass over a pre-collected list of detail-page URLs
//!
//! Both loops own their accumulator and throttle, send every request through
//! the same [`Fetcher`], and never fail: each ends with a [`StopReason`] and
//! whatever was collected up to that point.

use crate::config::Config;
use crate::crawler::document::Document;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::pagination::{NextPageSource, PaginationResolver};
use crate::crawler::throttle::Throttle;
use crate::output::ResultSink;
use crate::state::{CrawlResult, PageContext, StopReason};
use crate::CrawlerError;
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Where a crawl starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// First page of a paginated listing
    Listing(Url),
    /// Detail pages to visit once each
    Links(Vec<Url>),
}

/// What a crawl loop produced and why it stopped
#[derive(Debug)]
pub struct CrawlOutcome {
    pub result: CrawlResult,
    pub stop_reason: StopReason,
}

struct Checkpoint {
    sink: Box<dyn ResultSink>,
    base_name: String,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Fetcher,
    extractor: Extractor,
    max_pages: Option<u32>,
    delay: Duration,
    checkpoint: Option<Checkpoint>,
}

impl Coordinator {
    /// Creates a coordinator from a validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Client built and schema compiled
    /// * `Err(CrawlerError)` - The delay is out of range, or the HTTP client or
    ///   a selector could not be built
    pub fn new(config: &Config) -> Result<Self, CrawlerError> {
        let delay = config.crawler.delay_duration()?;
        let fetcher = Fetcher::new(config.crawler.timeout_duration())?;
        let extractor = Extractor::new(&config.schema())?;

        Ok(Self::from_parts(
            fetcher,
            extractor,
            config.crawler.max_pages,
            delay,
        ))
    }

    /// Assembles a coordinator from already-built parts
    pub fn from_parts(
        fetcher: Fetcher,
        extractor: Extractor,
        max_pages: Option<u32>,
        delay: Duration,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            max_pages,
            delay,
            checkpoint: None,
        }
    }

    /// Saves a snapshot through `sink` after every page that added records
    pub fn with_checkpoint(mut self, sink: Box<dyn ResultSink>, base_name: impl Into<String>) -> Self {
        self.checkpoint = Some(Checkpoint {
            sink,
            base_name: base_name.into(),
        });
        self
    }

    /// Runs the crawl loop matching the seed
    pub async fn crawl(&self, seed: Seed) -> CrawlOutcome {
        match seed {
            Seed::Listing(url) => self.crawl_pages(url).await,
            Seed::Links(urls) => self.crawl_links(urls).await,
        }
    }

    /// Walks a paginated listing from `seed`
    ///
    /// Stops on the first fetch failure, the first page without ideas, the
    /// end of the listing, or when the page budget is used up. A page whose
    /// URL was guessed rather than linked must add at least one new idea,
    /// otherwise the listing is taken to be over.
    pub async fn crawl_pages(&self, seed: Url) -> CrawlOutcome {
        let mut result = CrawlResult::new();

        if let Some(max_pages @ 0) = self.max_pages {
            tracing::info!("Page budget is zero, nothing to crawl");
            return CrawlOutcome {
                result,
                stop_reason: StopReason::BudgetExhausted { max_pages },
            };
        }

        tracing::info!("Starting sequential crawl at {}", seed);

        let resolver = PaginationResolver::new(&self.fetcher, &self.extractor);
        let mut throttle = Throttle::new(self.delay);
        let mut context = PageContext::first(seed);
        let mut guessed = false;

        let stop_reason = loop {
            let body = match context.prefetched.take() {
                Some(body) => {
                    tracing::debug!("Page {} already fetched by probe", context.index);
                    body
                }
                None => {
                    throttle.before_request().await;
                    match self.fetcher.fetch(&context.url).await {
                        Ok(raw) => raw.body,
                        Err(e) => {
                            tracing::error!("Could not fetch page {}: {}", context.index, e);
                            break StopReason::FetchFailed {
                                page: context.index,
                                url: context.url.to_string(),
                                error: e.to_string(),
                            };
                        }
                    }
                }
            };

            let doc = Document::parse(&body);
            let extraction = self.extractor.extract_listing(&doc, &context.url);

            if extraction.records.is_empty() {
                tracing::info!("No ideas on page {} ({})", context.index, context.url);
                break StopReason::NoRecords {
                    page: context.index,
                };
            }

            let found = extraction.records.len();
            let added = result.append(extraction.records);

            if guessed && added == 0 {
                tracing::info!(
                    "Page {} repeats ideas already collected ({})",
                    context.index,
                    context.url
                );
                break StopReason::NoNewRecords {
                    page: context.index,
                };
            }

            result.set_pages_processed(context.index);

            tracing::info!(
                "Page {}: {} ideas ({} new, {} total)",
                context.index,
                found,
                added,
                result.total_records()
            );

            if added > 0 {
                self.save_checkpoint(&result);
            }

            if let Some(max_pages) = self.max_pages {
                if context.index >= max_pages {
                    tracing::info!("Reached the page budget of {}", max_pages);
                    break StopReason::BudgetExhausted { max_pages };
                }
            }

            let next = resolver
                .next_page(&doc, &context.base_url, context.index, &mut throttle)
                .await;

            match next {
                Some(next) => {
                    guessed = next.source == NextPageSource::Probe;
                    context = context.advance(next.url, next.prefetched);
                }
                None => {
                    tracing::info!("Page {} is the last page", context.index);
                    break StopReason::NoNextPage {
                        page: context.index,
                    };
                }
            }
        };

        tracing::info!(
            "Sequential crawl finished ({}): {} pages, {} ideas, {} requests",
            stop_reason.label(),
            result.pages_processed(),
            result.total_records(),
            throttle.requests()
        );

        CrawlOutcome {
            result,
            stop_reason,
        }
    }

    /// Visits every detail page of `urls` once
    ///
    /// A page that can't be fetched or extracted is skipped; repeated URLs are
    /// visited only the first time.
    pub async fn crawl_links(&self, urls: Vec<Url>) -> CrawlOutcome {
        let mut result = CrawlResult::new();
        let mut throttle = Throttle::new(self.delay);
        let mut seen = HashSet::new();
        let mut visited = 0usize;
        let mut produced = 0u32;
        let total = urls.len();

        tracing::info!("Visiting {} idea pages", total);

        for (i, url) in urls.into_iter().enumerate() {
            if !seen.insert(url.as_str().to_string()) {
                tracing::debug!("Skipping repeated link {}", url);
                continue;
            }

            tracing::info!("[{}/{}] {}", i + 1, total, url);

            throttle.before_request().await;
            visited += 1;

            let raw = match self.fetcher.fetch(&url).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Skipping idea page: {}", e);
                    continue;
                }
            };

            let doc = Document::parse(&raw.body);
            let Ok(record) = self.extractor.extract_detail(&doc, &url) else {
                continue;
            };

            produced += 1;
            let added = result.append(vec![record]);
            result.set_pages_processed(produced);

            if added > 0 {
                self.save_checkpoint(&result);
            }
        }

        tracing::info!(
            "Link crawl finished: {} of {} pages produced an idea",
            produced,
            visited
        );

        CrawlOutcome {
            result,
            stop_reason: StopReason::LinksExhausted { visited },
        }
    }

    fn save_checkpoint(&self, result: &CrawlResult) {
        let Some(checkpoint) = &self.checkpoint else {
            return;
        };

        match checkpoint.sink.save(result, &checkpoint.base_name) {
            Ok(_) => tracing::debug!(
                "Checkpoint saved ({} ideas) to {}",
                result.total_records(),
                checkpoint.base_name
            ),
            Err(e) => tracing::warn!("Checkpoint failed: {}", e),
        }
    }
}
