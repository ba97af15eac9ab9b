use std::time::Duration;

use thiserror::Error;

use crate::error::{ErrorClass, ErrorKind};

#[derive(Debug, Error)]
/// Errors returned by embedding providers and the [`super::EmbeddingClient`].
pub enum EmbeddingError {
    /// Provider unreachable, timed out or answered 5xx.
    #[error("embedding provider {operation} failed: {reason}")]
    Provider {
        /// Operation name (`embed`, `probe`).
        operation: &'static str,
        /// Error message.
        reason: String,
    },

    /// Provider answered 429.
    #[error("embedding provider rate limited; retry after {retry_after:?}")]
    RateLimited {
        /// Wait requested by the provider.
        retry_after: Duration,
    },

    /// Input text is empty, oversized or was rejected by the provider.
    #[error("embedding generation rejected input: {reason}")]
    Generation {
        /// Error message.
        reason: String,
    },

    /// Too many texts in one batch.
    #[error("embedding batch of {size} exceeds the maximum of {max}")]
    BatchTooLarge {
        /// Requested batch size.
        size: usize,
        /// Maximum batch size.
        max: usize,
    },

    /// Provider answered 2xx with an unusable body.
    #[error("malformed embedding response: {reason}")]
    MalformedResponse {
        /// Error message.
        reason: String,
    },
}

impl EmbeddingError {
    pub(crate) fn provider(operation: &'static str, reason: impl Into<String>) -> Self {
        EmbeddingError::Provider {
            operation,
            reason: reason.into(),
        }
    }

    pub(crate) fn generation(reason: impl Into<String>) -> Self {
        EmbeddingError::Generation {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        EmbeddingError::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// The provider-requested wait, for [`EmbeddingError::RateLimited`].
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            EmbeddingError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

impl ErrorClass for EmbeddingError {
    fn kind(&self) -> ErrorKind {
        match self {
            EmbeddingError::Provider { .. } => ErrorKind::EmbeddingProvider,
            EmbeddingError::RateLimited { .. } => ErrorKind::RateLimitExceeded,
            EmbeddingError::Generation { .. } => ErrorKind::EmbeddingGeneration,
            EmbeddingError::BatchTooLarge { .. } => ErrorKind::Validation,
            EmbeddingError::MalformedResponse { .. } => ErrorKind::SemanticSearch,
        }
    }
}
