//! Failure taxonomy shared by every module.
//!
//! Each module keeps its own `thiserror` enum; all of them implement [`ErrorClass`] so the
//! orchestrator can decide between retry, fallback and abort by matching on [`ErrorKind`].
//! [`RecommendError`] is the only error type that escapes [`crate::recommend::Recommender`].


use thiserror::Error;

use crate::directory::DirectoryError;

/// Category of a failure, independent of the module that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Embedding provider 5xx, timeout or connection failure.
    EmbeddingProvider,
    /// Embedding provider answered 429.
    RateLimitExceeded,
    /// Input text rejected before or by the provider (empty, oversized).
    EmbeddingGeneration,
    /// Vector store unreachable or misconfigured.
    VectorStore,
    /// Query vector malformed or search result unusable.
    SemanticSearch,
    /// Cache store failure. Always swallowed at the cache layer.
    Cache,
    /// Caller input is invalid.
    Validation,
    /// Internal invariant violated.
    Recommendation,
    /// Candidate directory could not be read.
    Directory,
    /// Caller abandoned the request.
    Cancelled,
}

impl ErrorKind {
    /// Returns `true` if the operation may succeed when retried with backoff.
    pub fn is_retriable(&self) -> bool {
        match self {
            ErrorKind::EmbeddingProvider
            | ErrorKind::RateLimitExceeded
            | ErrorKind::Cache
            | ErrorKind::Directory => true,
            ErrorKind::EmbeddingGeneration
            | ErrorKind::VectorStore
            | ErrorKind::SemanticSearch
            | ErrorKind::Validation
            | ErrorKind::Recommendation
            | ErrorKind::Cancelled => false,
        }
    }

    /// Returns `true` if the failure aborts the request instead of degrading it.
    pub fn is_fatal(&self) -> bool {
        match self {
            ErrorKind::Validation
            | ErrorKind::Recommendation
            | ErrorKind::Directory
            | ErrorKind::Cancelled => true,
            ErrorKind::EmbeddingProvider
            | ErrorKind::RateLimitExceeded
            | ErrorKind::EmbeddingGeneration
            | ErrorKind::VectorStore
            | ErrorKind::SemanticSearch
            | ErrorKind::Cache => false,
        }
    }

    /// Machine-readable identifier.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::EmbeddingProvider => "EMBEDDING_PROVIDER_ERROR",
            ErrorKind::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorKind::EmbeddingGeneration => "EMBEDDING_GENERATION_ERROR",
            ErrorKind::VectorStore => "VECTOR_STORE_ERROR",
            ErrorKind::SemanticSearch => "SEMANTIC_SEARCH_ERROR",
            ErrorKind::Cache => "CACHE_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Recommendation => "RECOMMENDATION_ERROR",
            ErrorKind::Directory => "DIRECTORY_ERROR",
            ErrorKind::Cancelled => "CANCELLED",
        }
    }

    /// HTTP status a routing layer should answer with when this kind aborts a request.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::Cancelled => 499,
            ErrorKind::Directory => 503,
            _ => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Classification shared by all module errors.
pub trait ErrorClass: std::error::Error {
    /// The failure category.
    fn kind(&self) -> ErrorKind;

    /// Shorthand for `self.kind().is_retriable()`.
    fn is_retriable(&self) -> bool {
        self.kind().is_retriable()
    }

    /// Shorthand for `self.kind().is_fatal()`.
    fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }
}

/// Errors surfaced to the caller of [`crate::recommend::Recommender::recommend`].
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Request rejected before any work was done.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Offending request field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// Candidates could not be fetched.
    #[error("candidate directory failed: {0}")]
    Directory(#[from] DirectoryError),

    /// Internal invariant violation (should be unreachable).
    #[error("recommendation invariant violated in {operation}: {reason}")]
    Recommendation {
        /// Stage that detected the violation.
        operation: &'static str,
        /// Human-readable explanation.
        reason: String,
    },

    /// Caller cancelled the request.
    #[error("request cancelled during {stage}")]
    Cancelled {
        /// Stage that was interrupted.
        stage: &'static str,
    },
}

impl RecommendError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        RecommendError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(operation: &'static str, reason: impl Into<String>) -> Self {
        RecommendError::Recommendation {
            operation,
            reason: reason.into(),
        }
    }

    /// Returns `true` if the error is the caller's fault.
    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl ErrorClass for RecommendError {
    fn kind(&self) -> ErrorKind {
        match self {
            RecommendError::Validation { .. } => ErrorKind::Validation,
            RecommendError::Directory(_) => ErrorKind::Directory,
            RecommendError::Recommendation { .. } => ErrorKind::Recommendation,
            RecommendError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }
}

/// Serializable error body for a routing layer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ErrorResponse {
    /// Machine-readable [`ErrorKind::code`].
    pub kind: &'static str,
    /// Human-readable message.
    pub error: String,
    /// Suggested HTTP status.
    pub code: u16,
}

impl From<&RecommendError> for ErrorResponse {
    fn from(err: &RecommendError) -> Self {
        let kind = err.kind();
        Self {
            kind: kind.code(),
            error: err.to_string(),
            code: kind.http_status(),
        }
    }
}
