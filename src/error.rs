//! Crate-level error type.

use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the codecs, the converters and the remote layer.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The project layout is unusable (e.g. a root directory is missing).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A translation file exists but does not have the expected shape.
    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A value required at this point was never set.
    #[error("{owner} is missing parameter: {name}")]
    MissingParameter { owner: &'static str, name: &'static str },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The remote translation service rejected or garbled a request.
    #[error("Remote service error: {0}")]
    Remote(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SyncError {
    pub(crate) fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse { path: path.to_path_buf(), message: message.into() }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }
}

pub type Result<T, E = SyncError> = std::result::Result<T, E>;
