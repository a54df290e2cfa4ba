use std::path::PathBuf;
use thiserror::Error;

use crate::git::GitError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Repository(#[from] GitError),

    #[error("could not write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid config {}: {source}", path.display())]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Intent-to-add entries could not be reset; the index still holds them.
    #[error("failed to unstage intent-to-add entries: {0}")]
    StagingCleanup(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
