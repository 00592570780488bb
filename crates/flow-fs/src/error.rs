//! Error types for flow-fs

use std::path::PathBuf;

/// Result type for flow-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in flow-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Expected a file but found a directory: {path}")]
    IsDirectory { path: PathBuf },

    #[error("Could not make {path} absolute: {source}")]
    Absolute {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
