/// Per-iteration cursor of the sequential crawl loop
///
/// A `PageContext` is created for the first page from the seed URL and then
/// replaced by value on every advance; nothing about the crawl position lives
/// on the coordinator itself.
use std::fmt;
use url::Url;

/// Position of the sequential crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// 1-based index of the page about to be processed
    pub index: u32,

    /// URL of the page about to be processed
    pub url: Url,

    /// Seed URL; pagination links resolve against it and the fallback
    /// next-page URL is built from it
    pub base_url: Url,

    /// Body already downloaded by a pagination probe, if any
    pub prefetched: Option<String>,
}

impl PageContext {
    /// Context for the first page of a crawl
    pub fn first(seed: Url) -> Self {
        Self {
            index: 1,
            url: seed.clone(),
            base_url: seed,
            prefetched: None,
        }
    }

    /// Consumes this context and returns the one for the following page
    pub fn advance(self, url: Url, prefetched: Option<String>) -> Self {
        Self {
            index: self.index + 1,
            url,
            base_url: self.base_url,
            prefetched,
        }
    }
}

/// Why a crawl loop terminated
///
/// None of these are errors: the crawl always returns what it accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A listing page could not be fetched
    FetchFailed { page: u32, url: String, error: String },

    /// A listing page produced no records
    NoRecords { page: u32 },

    /// No next page was found after this page
    NoNextPage { page: u32 },

    /// A page reached by guessing its URL only repeated ideas already
    /// collected, as sites do when they serve their last page for any
    /// out-of-range number
    NoNewRecords { page: u32 },

    /// The page budget was consumed
    BudgetExhausted { max_pages: u32 },

    /// Every URL of a link list was visited
    LinksExhausted { visited: usize },
}

impl StopReason {
    /// Short machine-friendly label for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::FetchFailed { .. } => "fetch_failed",
            Self::NoRecords { .. } => "no_records",
            Self::NoNextPage { .. } => "no_next_page",
            Self::NoNewRecords { .. } => "no_new_records",
            Self::BudgetExhausted { .. } => "budget_exhausted",
            Self::LinksExhausted { .. } => "links_exhausted",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed { page, url, error } => {
                write!(f, "could not fetch page {} ({}): {}", page, url, error)
            }
            Self::NoRecords { page } => write!(f, "no ideas found on page {}", page),
            Self::NoNextPage { page } => write!(f, "no page after page {}", page),
            Self::NoNewRecords { page } => {
                write!(f, "page {} only repeated ideas already collected", page)
            }
            Self::BudgetExhausted { max_pages } => {
                write!(f, "page budget of {} reached", max_pages)
            }
            Self::LinksExhausted { visited } => {
                write!(f, "all {} detail links visited", visited)
            }
        }
    }
}
