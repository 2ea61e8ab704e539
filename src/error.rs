use std::path::PathBuf;

use thiserror::Error;

/// Failures of the local chart bookmark file. These are the only errors the
/// user is expected to see; everything remote degrades silently.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid chart list: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Chart already exists: {0}")]
    DuplicateUrl(String),
    #[error("No chart with id {0}")]
    NotFound(String),
}
