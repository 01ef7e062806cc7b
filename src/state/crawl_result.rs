/// Aggregate result of a crawl
///
/// The record count is always derived from the record sequence, so
/// `total_ideias == ideias.len()` holds at every observation point, including
/// in serialized snapshots.
use crate::state::IdeaRecord;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

/// Records gathered by a crawl plus the number of pages processed
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "StoredResult")]
pub struct CrawlResult {
    ideias: Vec<IdeaRecord>,
    total_paginas: u32,
    seen_urls: HashSet<String>,
}

impl CrawlResult {
    /// Creates an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends records, dropping any whose `idea_url` was already collected
    ///
    /// Records without a URL are always kept. Returns the number of records
    /// actually added.
    pub fn append(&mut self, records: Vec<IdeaRecord>) -> usize {
        let before = self.ideias.len();
        for record in records {
            if let Some(url) = record.url() {
                if !self.seen_urls.insert(url.to_string()) {
                    tracing::debug!("Skipping duplicate idea {}", url);
                    continue;
                }
            }
            self.ideias.push(record);
        }
        self.ideias.len() - before
    }

    /// Records the number of pages processed so far
    pub fn set_pages_processed(&mut self, pages: u32) {
        self.total_paginas = pages;
    }

    /// Returns the collected records in crawl order
    pub fn records(&self) -> &[IdeaRecord] {
        &self.ideias
    }

    /// Returns the number of pages processed
    pub fn pages_processed(&self) -> u32 {
        self.total_paginas
    }

    /// Returns the number of records, always equal to `records().len()`
    pub fn total_records(&self) -> usize {
        self.ideias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideias.is_empty()
    }

    /// Iterates the `idea_url` of every record that has one, in order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.ideias.iter().filter_map(IdeaRecord::url)
    }
}

impl Serialize for CrawlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CrawlResult", 3)?;
        state.serialize_field("ideias", &self.ideias)?;
        state.serialize_field("total_paginas", &self.total_paginas)?;
        state.serialize_field("total_ideias", &self.ideias.len())?;
        state.end()
    }
}

/// On-disk shape of a saved result
///
/// `total_ideias` is read only to be discarded; the count is recomputed.
#[derive(Deserialize)]
struct StoredResult {
    ideias: Vec<IdeaRecord>,
    #[serde(default)]
    total_paginas: u32,
    #[serde(default, rename = "total_ideias")]
    _total_ideias: Option<u64>,
}

impl From<StoredResult> for CrawlResult {
    fn from(stored: StoredResult) -> Self {
        let seen_urls = stored
            .ideias
            .iter()
            .filter_map(IdeaRecord::url)
            .map(str::to_string)
            .collect();

        Self {
            ideias: stored.ideias,
            total_paginas: stored.total_paginas,
            seen_urls,
        }
    }
}
