use cfsub_core::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directories cleared on every conversion run.
#[derive(Debug, Clone)]
pub struct WorkingDirs {
    pub configs: PathBuf,
    pub logs: PathBuf,
    pub results: PathBuf,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    pub configs: usize,
    pub logs: usize,
    pub results: usize,
}

/// Delete every regular file in the configs and log directories, and every regular file
/// in the results directory except `keep`. Missing directories are skipped and
/// subdirectories are left alone.
///
/// Afterwards `keep` is the only file left in the results directory, which is what bounds
/// the scan history kept on disk.
pub fn reset_working_dirs(dirs: &WorkingDirs, keep: &Path) -> Result<PurgeReport> {
    let report = PurgeReport {
        configs: clear_dir(&dirs.configs, None)?,
        logs: clear_dir(&dirs.logs, None)?,
        results: clear_dir(&dirs.results, Some(keep))?,
    };
    info!(configs = report.configs, logs = report.logs, results = report.results, "reset working directories");
    Ok(report)
}

fn clear_dir(dir: &Path, keep: Option<&Path>) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(Error::io(dir, e)),
    };
    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if keep.is_some_and(|k| same_file(k, &path)) { continue; }
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file { continue; }
        fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        debug!(path = %path.display(), "removed");
        removed += 1;
    }
    Ok(removed)
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b { return true; }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}
