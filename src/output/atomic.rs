//! Temp-then-rename file writes
//!
//! Result files are written to a `.tmp` sibling and renamed into place, so a
//! path always holds either the previous or the new complete content. The
//! sibling is removed when any step fails.

use crate::output::traits::{SinkError, SinkResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `path` through `write`, replacing it only if every step succeeds
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> SinkResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> SinkResult<()>,
{
    let tmp_path = tmp_sibling(path);

    let result = write_then_rename(path, &tmp_path, write);
    if result.is_err() {
        if let Err(e) = std::fs::remove_file(&tmp_path) {
            tracing::debug!("Could not remove {}: {}", tmp_path.display(), e);
        }
    }

    result
}

fn write_then_rename<F>(path: &Path, tmp_path: &Path, write: F) -> SinkResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> SinkResult<()>,
{
    let write_err = |source| SinkError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(tmp_path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer.flush().map_err(write_err)?;
    drop(writer);

    std::fs::rename(tmp_path, path).map_err(write_err)
}

pub(crate) fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
