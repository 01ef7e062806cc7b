//! CSV export of idea records
//!
//! One row per record. The header is the union of all record keys in the
//! order they were first seen; a record lacking a key gets an empty cell.

use crate::output::atomic::write_atomic;
use crate::output::traits::{SinkError, SinkResult};
use crate::state::IdeaRecord;
use std::io::Write;
use std::path::Path;

/// Header columns for `records`: union of keys, first-seen order
pub fn csv_header(records: &[IdeaRecord]) -> Vec<String> {
    let mut header: Vec<String> = Vec::new();
    for key in records.iter().flat_map(IdeaRecord::keys) {
        if !header.iter().any(|h| h == key) {
            header.push(key.to_string());
        }
    }
    header
}

/// Writes `records` as CSV to any writer
pub fn write_records<W: Write>(records: &[IdeaRecord], writer: W) -> Result<(), csv::Error> {
    let header = csv_header(records);
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(&header)?;
    for record in records {
        writer.write_record(header.iter().map(|key| record.get(key).unwrap_or("")))?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes `records` to a CSV file at `path`, replacing it only on success
pub fn write_csv(records: &[IdeaRecord], path: &Path) -> SinkResult<()> {
    write_atomic(path, |writer| {
        write_records(records, writer).map_err(|source| SinkError::Csv {
            path: path.to_path_buf(),
            source,
        })
    })?;

    tracing::debug!("Wrote {} CSV rows to {}", records.len(), path.display());
    Ok(())
}
