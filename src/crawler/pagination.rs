//! Next-page resolution
//!
//! The next listing page is found in two steps, first success wins:
//!
//! 1. a pagination anchor on the current page whose `page` query value is the
//!    next index
//! 2. a probe: the seed URL with `page=<next>` is fetched and accepted only if
//!    it yields at least one listing record
//!
//! A probe is a real request. It goes through the crawl's throttle, and a
//! successful probe hands its body forward so the page isn't fetched twice.

use crate::crawler::document::Document;
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::throttle::Throttle;
use crate::url::{page_number, resolve_href, with_page, PAGE_PARAM};
use thiserror::Error;
use url::Url;

/// Why a probed candidate is not a next page
#[derive(Debug, Error)]
pub enum PaginationProbeError {
    #[error("probe failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("probe of {url} found no ideas")]
    Empty { url: Url },
}

/// How the next page was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPageSource {
    /// A pagination anchor on the current page
    Link,
    /// A successful probe of the constructed candidate
    Probe,
}

/// The resolved next page
#[derive(Debug, Clone)]
pub struct NextPage {
    pub url: Url,
    /// Body downloaded by the probe, if one ran
    pub prefetched: Option<String>,
    pub source: NextPageSource,
}

/// Looks for an anchor pointing at page `next`
///
/// Only anchors whose `href` mentions `page=` are considered; each is resolved
/// against `base_url` and its `page` query value compared with `next`.
pub fn find_linked_page(doc: &Document, base_url: &Url, next: u32) -> Option<Url> {
    let marker = format!("{}=", PAGE_PARAM);

    doc.find_all("a", |a| {
        a.attribute("href")
            .map_or(false, |href| href.contains(&marker))
    })
    .into_iter()
    .filter_map(|a| a.attribute("href"))
    .find_map(|href| {
        let resolved = resolve_href(href, base_url)?;
        let number = page_number(&resolved);
        tracing::trace!("Pagination anchor {} -> page {:?}", href, number);
        (number == Some(next)).then_some(resolved)
    })
}

/// The probe candidate for page `next`: `base_url` with its query replaced
pub fn fallback_candidate(base_url: &Url, next: u32) -> Url {
    with_page(base_url, next)
}

/// Resolves the next listing page of a sequential crawl
pub struct PaginationResolver<'a> {
    fetcher: &'a Fetcher,
    extractor: &'a Extractor,
}

impl<'a> PaginationResolver<'a> {
    pub fn new(fetcher: &'a Fetcher, extractor: &'a Extractor) -> Self {
        Self { fetcher, extractor }
    }

    /// Returns the page following `current_page`, or None at the end of the listing
    pub async fn next_page(
        &self,
        doc: &Document,
        base_url: &Url,
        current_page: u32,
        throttle: &mut Throttle,
    ) -> Option<NextPage> {
        let next = current_page + 1;

        if let Some(url) = find_linked_page(doc, base_url, next) {
            tracing::debug!("Page {} linked from page {}: {}", next, current_page, url);
            return Some(NextPage {
                url,
                prefetched: None,
                source: NextPageSource::Link,
            });
        }

        let candidate = fallback_candidate(base_url, next);
        tracing::info!("No link to page {}; probing {}", next, candidate);

        match self.probe(&candidate, throttle).await {
            Ok(body) => Some(NextPage {
                url: candidate,
                prefetched: Some(body),
                source: NextPageSource::Probe,
            }),
            Err(e) => {
                tracing::warn!("No page {}: {}", next, e);
                None
            }
        }
    }

    /// Fetches `candidate` and checks that it lists at least one idea
    ///
    /// Returns the fetched body on success.
    pub async fn probe(
        &self,
        candidate: &Url,
        throttle: &mut Throttle,
    ) -> Result<String, PaginationProbeError> {
        throttle.before_request().await;
        let raw = self.fetcher.fetch(candidate).await?;

        let doc = Document::parse(&raw.body);
        if self.extractor.extract_listing(&doc, candidate).records.is_empty() {
            return Err(PaginationProbeError::Empty {
                url: candidate.clone(),
            });
        }

        Ok(raw.body)
    }
}
