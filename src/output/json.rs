//! JSON result files
//!
//! The JSON file is the authoritative result: `{"ideias", "total_paginas",
//! "total_ideias"}`, pretty-printed with two-space indentation and UTF-8
//! text kept literally.

use crate::output::atomic::write_atomic;
use crate::output::traits::{SinkError, SinkResult};
use crate::state::CrawlResult;
use crate::url::parse_http_url;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::Path;
use url::Url;

/// Writes `result` to `path`
///
/// `path` always holds either the previous or the new complete result.
pub fn write_json(result: &CrawlResult, path: &Path) -> SinkResult<()> {
    let write_err = |source: std::io::Error| SinkError::Write {
        path: path.to_path_buf(),
        source,
    };

    write_atomic(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, result).map_err(|e| write_err(e.into()))?;
        writer.write_all(b"\n").map_err(write_err)
    })?;

    tracing::debug!("Wrote {} ideas to {}", result.total_records(), path.display());
    Ok(())
}

/// Reads a previously saved result
///
/// The record count is recomputed from the records; a stored `total_ideias`
/// is ignored.
pub fn read_result(path: &Path) -> SinkResult<CrawlResult> {
    let file = File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => SinkError::NotFound(path.to_path_buf()),
        _ => SinkError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| SinkError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the detail-page URLs of a saved result
///
/// A missing or unreadable file is logged and yields no URLs. Records
/// without a usable `idea_url` are skipped with a warning.
pub fn load_links(path: &Path) -> Vec<Url> {
    let result = match read_result(path) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Could not load idea links: {}", e);
            return Vec::new();
        }
    };

    let mut links = Vec::with_capacity(result.total_records());
    for (i, record) in result.records().iter().enumerate() {
        match record.url().map(parse_http_url) {
            Some(Ok(url)) => links.push(url),
            Some(Err(e)) => tracing::warn!("Skipping idea #{} of {}: {}", i + 1, path.display(), e),
            None => tracing::warn!(
                "Skipping idea #{} of {}: no idea_url",
                i + 1,
                path.display()
            ),
        }
    }

    tracing::info!("Loaded {} idea links from {}", links.len(), path.display());
    links
}
