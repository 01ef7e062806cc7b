//! Result sink trait and associated types
//!
//! This module defines the trait interface for persisting a crawl result and
//! the errors a sink can raise.

use crate::state::CrawlResult;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving or loading results
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Result file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Files written by one save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    /// `<base>.json`
    pub json: PathBuf,

    /// `<base>_ideias.csv`, absent when the result has no records
    pub csv: Option<PathBuf>,
}

/// Trait for result sinks
///
/// A sink persists a complete snapshot of a crawl result under a base name.
/// Saving the same base name again replaces the previous snapshot.
pub trait ResultSink {
    /// Persists `result` under `base_name`
    ///
    /// # Arguments
    ///
    /// * `result` - The aggregate to persist
    /// * `base_name` - File name prefix, without extension
    fn save(&self, result: &CrawlResult, base_name: &str) -> SinkResult<SavedFiles>;
}
