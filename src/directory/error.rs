use std::path::PathBuf;

use thiserror::Error;

use crate::error::{ErrorClass, ErrorKind};
use crate::model::CenterId;

#[derive(Debug, Error)]
/// Errors returned by a [`super::DirectoryStore`].
pub enum DirectoryError {
    /// Directory file could not be read.
    #[error("failed to read center directory '{path}': {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Directory file is not valid JSON for a list of centers.
    #[error("failed to parse center directory '{path}': {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// A center record is unusable.
    #[error("invalid center {id}: {reason}")]
    InvalidCenter {
        /// Center id.
        id: CenterId,
        /// Error message.
        reason: String,
    },

    /// Backend could not serve the query.
    #[error("center directory unavailable: {reason}")]
    Unavailable {
        /// Error message.
        reason: String,
    },
}

impl ErrorClass for DirectoryError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Directory
    }
}
