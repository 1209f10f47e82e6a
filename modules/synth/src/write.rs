use cfsub_core::{Error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serialize with four-space indentation, keeping template key order.
pub fn to_config_json(doc: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    doc.serialize(&mut ser)?;
    Ok(buf)
}

pub fn config_path(dir: &Path, ordinal: usize) -> PathBuf {
    dir.join(format!("{ordinal}.json"))
}

/// Write `doc` to `{dir}/{ordinal}.json`, replacing any previous file.
pub fn write_config(dir: &Path, ordinal: usize, doc: &Value) -> Result<PathBuf> {
    let path = config_path(dir, ordinal);
    fs::write(&path, to_config_json(doc)?).map_err(|e| Error::io(&path, e))?;
    debug!(path = %path.display(), "wrote config");
    Ok(path)
}
