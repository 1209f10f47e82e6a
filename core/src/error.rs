use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the conversion pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The results directory is missing, unreadable, or holds no files.
    #[error("no results found in {}", .0.display())]
    NoResults(PathBuf),

    #[error("{}:{line}: expected {expected} columns, found {found}", path.display())]
    ColumnCount { path: PathBuf, line: u64, expected: usize, found: usize },

    #[error("{}:{line}: column {column} is not a number: {value:?}", path.display())]
    NotNumeric { path: PathBuf, line: u64, column: usize, value: String },

    #[error("unsupported core type {0:?} (expected \"xray\" or \"sing-box\")")]
    UnsupportedCoreType(String),

    /// A field mapping points below a node the template does not have.
    #[error("template has no node at {pointer}")]
    TemplateField { pointer: String },

    #[error("could not resolve client identity: {0}")]
    IdentityUnavailable(String),

    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("{}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io { path: path.as_ref().to_path_buf(), source }
    }

    pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
        Self::Csv { path: path.as_ref().to_path_buf(), source }
    }
}
