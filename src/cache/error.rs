use thiserror::Error;

use crate::error::{ErrorClass, ErrorKind};

#[derive(Debug, Error)]
/// Errors returned by a [`super::CacheStore`].
pub enum CacheError {
    /// Backend rejected or failed the operation.
    #[error("cache {operation} failed: {reason}")]
    Unavailable {
        /// Operation name (`get`, `set`, `delete`).
        operation: &'static str,
        /// Error message.
        reason: String,
    },

    /// Operation did not finish within the per-operation budget.
    #[error("cache {operation} timed out")]
    Timeout {
        /// Operation name.
        operation: &'static str,
    },

    /// Stored bytes could not be encoded or decoded.
    #[error("cache value serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Returns the operation name, if known.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            CacheError::Unavailable { operation, .. } | CacheError::Timeout { operation } => {
                Some(operation)
            }
            CacheError::Serialization(_) => None,
        }
    }
}

impl ErrorClass for CacheError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Cache
    }
}
