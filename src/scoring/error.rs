use thiserror::Error;

use crate::error::{ErrorClass, ErrorKind, RecommendError};
use crate::model::CenterId;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// A candidate carries attributes the rule scorer cannot use.
    #[error("malformed candidate {id}: {reason}")]
    MalformedCandidate { id: CenterId, reason: String },

    /// Score vectors and candidate list disagree in length.
    #[error("{operation}: expected {expected} scores, got {actual}")]
    CountMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Rule sub-score weights are not a unit set.
    #[error("invalid rule weights: {reason}")]
    InvalidWeights { reason: String },
}

impl ErrorClass for ScoringError {
    fn kind(&self) -> ErrorKind {
        match self {
            ScoringError::MalformedCandidate { .. } => ErrorKind::Validation,
            ScoringError::CountMismatch { .. } | ScoringError::InvalidWeights { .. } => {
                ErrorKind::Recommendation
            }
        }
    }
}

impl From<ScoringError> for RecommendError {
    fn from(err: ScoringError) -> Self {
        let reason = err.to_string();
        match err {
            ScoringError::MalformedCandidate { .. } => {
                RecommendError::validation("candidates", reason)
            }
            ScoringError::CountMismatch { operation, .. } => {
                RecommendError::invariant(operation, reason)
            }
            ScoringError::InvalidWeights { .. } => RecommendError::invariant("rule_scoring", reason),
        }
    }
}
