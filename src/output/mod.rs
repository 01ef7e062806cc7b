//! Output module for persisting crawl results and reporting on them
//!
//! This module handles:
//! - Writing the JSON result and the CSV export
//! - Reading a saved result back (link-list mode input)
//! - Printing the end-of-crawl summary

mod atomic;
mod csv_export;
mod json;
pub mod summary;
mod traits;

pub use csv_export::{csv_header, write_csv, write_records};
pub use json::{load_links, read_result, write_json};
pub use summary::{field_coverage, format_summary, print_summary, FieldCoverage};
pub use traits::{ResultSink, SavedFiles, SinkError, SinkResult};

use crate::state::CrawlResult;
use std::path::{Path, PathBuf};

/// JSON file name for a base name
pub fn json_file_name(base_name: &str) -> String {
    format!("{}.json", base_name)
}

/// CSV file name for a base name
pub fn csv_file_name(base_name: &str) -> String {
    format!("{}_ideias.csv", base_name)
}

/// Writes `<base>.json` and, when there are records, `<base>_ideias.csv`
#[derive(Debug, Clone, Default)]
pub struct FileSink {
    dir: Option<PathBuf>,
}

impl FileSink {
    /// Sink writing relative to the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink writing into `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    fn path_for(&self, file_name: String) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Where `<base>.json` is written
    pub fn json_path(&self, base_name: &str) -> PathBuf {
        self.path_for(json_file_name(base_name))
    }

    /// Where `<base>_ideias.csv` is written
    pub fn csv_path(&self, base_name: &str) -> PathBuf {
        self.path_for(csv_file_name(base_name))
    }
}

impl ResultSink for FileSink {
    fn save(&self, result: &CrawlResult, base_name: &str) -> SinkResult<SavedFiles> {
        let json = self.json_path(base_name);
        write_json(result, &json)?;

        let csv = if result.is_empty() {
            None
        } else {
            let path = self.csv_path(base_name);
            write_csv(result.records(), &path)?;
            Some(path)
        };

        Ok(SavedFiles { json, csv })
    }
}

/// Returns true if two paths name the same file
///
/// Paths that can't be canonicalized (e.g. not yet created) are compared as given.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Field, IdeaRecord};
    use tempfile::TempDir;

    #[test]
    fn test_file_sink_writes_both_files() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::in_dir(dir.path());

        let mut result = CrawlResult::new();
        result.append(vec![IdeaRecord::new().with(Field::Title, "A")]);
        result.set_pages_processed(1);

        let saved = sink.save(&result, "senai_data").unwrap();
        assert_eq!(saved.json, dir.path().join("senai_data.json"));
        assert_eq!(saved.csv, Some(dir.path().join("senai_data_ideias.csv")));
        assert!(saved.json.exists());
        assert!(dir.path().join("senai_data_ideias.csv").exists());
    }

    #[test]
    fn test_empty_result_has_no_csv() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::in_dir(dir.path());

        let saved = sink.save(&CrawlResult::new(), "vazio").unwrap();
        assert!(saved.json.exists());
        assert_eq!(saved.csv, None);
        assert!(!dir.path().join("vazio_ideias.csv").exists());
    }

    #[test]
    fn test_save_into_missing_dir_fails() {
        let sink = FileSink::in_dir("/nonexistent/dir");
        let err = sink.save(&CrawlResult::new(), "x").unwrap_err();
        assert!(matches!(err, SinkError::Write { .. }));
    }

    #[test]
    fn test_same_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.json");
        std::fs::write(&path, "{}").unwrap();
        let indirect = dir.path().join(".").join("a.json");

        assert!(same_file(&path, &indirect));
        assert!(!same_file(&path, &dir.path().join("b.json")));
    }
}
