use thiserror::Error;

use crate::error::{ErrorClass, ErrorKind};

#[derive(Debug, Error)]
/// Errors returned by vector store operations.
pub enum VectorDbError {
    /// Could not reach the Qdrant endpoint.
    #[error("failed to connect to Qdrant at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Collection does not exist.
    #[error("collection not found: {collection}")]
    CollectionNotFound {
        /// Collection name.
        collection: String,
    },

    /// Search failed.
    #[error("failed to search in '{collection}': {message}")]
    SearchFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Query vector dimension mismatch.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Query vector is empty or contains non-finite values.
    #[error("invalid query vector: {reason}")]
    InvalidQueryVector {
        /// Error message.
        reason: String,
    },
}

impl ErrorClass for VectorDbError {
    fn kind(&self) -> ErrorKind {
        match self {
            VectorDbError::ConnectionFailed { .. }
            | VectorDbError::CollectionNotFound { .. }
            | VectorDbError::SearchFailed { .. } => ErrorKind::VectorStore,
            VectorDbError::InvalidDimension { .. } | VectorDbError::InvalidQueryVector { .. } => {
                ErrorKind::SemanticSearch
            }
        }
    }
}
