//! Client config synthesis: fill a dialect template per selected endpoint and write
//! the numbered config files.

mod schema;
mod select;
mod template;
mod write;

pub use schema::{apply_endpoint, apply_profile, schema_for, ClientSchema, SingBox, Xray, SING_BOX_FINGERPRINT};
pub use select::{Endpoint, Selection, LOOPBACK};
pub use template::load_template;
pub use write::{config_path, to_config_json, write_config};

use cfsub_core::{Error, Result, Settings};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// A filled-in config, not yet on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub ordinal: usize,
    pub document: Value,
}

/// Fill `template` once with the run-wide fields, then once per endpoint.
pub fn render(
    template: &Value,
    schema: &dyn ClientSchema,
    settings: &Settings,
    identity: &str,
    endpoints: &[Endpoint],
) -> Result<Vec<Rendered>> {
    let base = apply_profile(template, schema, settings, identity)?;
    endpoints
        .iter()
        .map(|ep| -> Result<Rendered> {
            Ok(Rendered { ordinal: ep.ordinal, document: apply_endpoint(&base, schema, ep)? })
        })
        .collect()
}

/// Write every rendered config into `dir`, creating it if needed.
pub fn write_all(dir: &Path, rendered: &[Rendered]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let paths = rendered
        .iter()
        .map(|r| write_config(dir, r.ordinal, &r.document))
        .collect::<Result<Vec<_>>>()?;
    info!(dir = %dir.display(), count = paths.len(), "wrote client configs");
    Ok(paths)
}
