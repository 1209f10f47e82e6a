use cfsub_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Return the regular file in `dir` with the most recent creation time.
///
/// Platforms that do not record creation time fall back to modification time.
/// A missing or unreadable directory counts as having no results.
pub fn latest_result(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|_| Error::NoResults(dir.to_path_buf()))?;
    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let Ok(meta) = entry.metadata() else { continue };
        if !meta.is_file() { continue; }
        let Ok(stamp) = meta.created().or_else(|_| meta.modified()) else { continue };
        if newest.as_ref().map_or(true, |(t, _)| stamp > *t) {
            newest = Some((stamp, entry.path()));
        }
    }
    let (_, path) = newest.ok_or_else(|| Error::NoResults(dir.to_path_buf()))?;
    debug!(path = %path.display(), "latest result file");
    Ok(path)
}
