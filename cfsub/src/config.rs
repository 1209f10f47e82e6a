use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_FILE: &str = "cfsub.yaml";

#[derive(Debug, Default, Deserialize, Clone)]
pub struct PathsConfig {
    pub results: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub configs: Option<PathBuf>,
    pub logs: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct IdentityConfig {
    pub url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub fallback_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    pub paths: Option<PathsConfig>,
    pub identity: Option<IdentityConfig>,
}

/// Load `path`, or `./cfsub.yaml` when no path is given. Only a missing default file is
/// silently skipped.
pub fn load_config(path: Option<&Path>) -> Result<Option<Config>> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = Path::new(DEFAULT_FILE);
            if p.exists() { p.to_path_buf() } else { return Ok(None); }
        }
    };
    let s = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: Config = serde_yaml::from_str(&s).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(cfg))
}

/// Working directories, relative to the current directory unless configured otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub results: PathBuf,
    pub templates: PathBuf,
    pub configs: PathBuf,
    pub logs: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            results: "result".into(),
            templates: "template".into(),
            configs: ".configs".into(),
            logs: "log".into(),
        }
    }
}

impl Layout {
    pub fn from_config(cfg: &Config) -> Self {
        let d = Layout::default();
        let Some(p) = &cfg.paths else { return d };
        Layout {
            results: p.results.clone().unwrap_or(d.results),
            templates: p.templates.clone().unwrap_or(d.templates),
            configs: p.configs.clone().unwrap_or(d.configs),
            logs: p.logs.clone().unwrap_or(d.logs),
        }
    }

    pub fn working_dirs(&self) -> results::WorkingDirs {
        results::WorkingDirs { configs: self.configs.clone(), logs: self.logs.clone(), results: self.results.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityOptions {
    pub url: String,
    pub timeout: Duration,
    pub fallback_file: PathBuf,
}

impl IdentityOptions {
    pub fn from_config(cfg: &Config) -> Self {
        let id = cfg.identity.clone().unwrap_or_default();
        IdentityOptions {
            url: id.url.unwrap_or_else(|| identity::DEFAULT_URL.to_string()),
            timeout: id.timeout_ms.map(Duration::from_millis).unwrap_or(identity::DEFAULT_TIMEOUT),
            fallback_file: id.fallback_file.unwrap_or_else(|| identity::DEFAULT_FALLBACK_FILE.into()),
        }
    }
}
