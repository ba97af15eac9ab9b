use std::collections::HashMap;

use crate::constants::validate_unit_weights;
use crate::error::ErrorKind;
use crate::model::{CenterId, CenterType, Symptom, ValidatedRequest};

use super::error::ScoringError;

/// Preference sub-score for a requested preference the center does not meet, and for
/// requests with no preference at all.
pub const NEUTRAL_PREFERENCE: f64 = 0.5;

/// Internal weighting of the rule sub-scores. Proximity dominates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleWeights {
    pub proximity: f64,
    pub symptom_affinity: f64,
    pub type_match: f64,
    pub preference: f64,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            proximity: 0.40,
            symptom_affinity: 0.25,
            type_match: 0.20,
            preference: 0.15,
        }
    }
}

impl RuleWeights {
    /// Fails unless the four weights are non-negative and sum to one.
    pub fn validate(&self) -> Result<(), ScoringError> {
        if validate_unit_weights(&[
            self.proximity,
            self.symptom_affinity,
            self.type_match,
            self.preference,
        ]) {
            Ok(())
        } else {
            Err(ScoringError::InvalidWeights {
                reason: format!("{self:?} must be non-negative and sum to 1"),
            })
        }
    }
}

/// Each rule sub-score, all in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleSubScores {
    pub proximity: f64,
    pub type_match: f64,
    pub symptom_affinity: f64,
    pub preference: f64,
}

impl RuleSubScores {
    /// Weighted sum, clamped to `[0, 1]`.
    pub fn weighted(&self, weights: &RuleWeights) -> f64 {
        let total = weights.proximity * self.proximity
            + weights.type_match * self.type_match
            + weights.symptom_affinity * self.symptom_affinity
            + weights.preference * self.preference;
        total.clamp(0.0, 1.0)
    }
}

/// Request-derived inputs to the rule scorer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleCriteria {
    pub max_distance_meters: f64,
    /// Empty means any type.
    pub type_filter: Vec<CenterType>,
    /// Empty when no profile was supplied.
    pub symptoms: Vec<Symptom>,
    pub wants_free: bool,
    pub wants_online: bool,
}

impl RuleCriteria {
    pub fn from_request(request: &ValidatedRequest) -> Self {
        Self {
            max_distance_meters: request.max_distance_meters(),
            type_filter: request.filters.center_types.clone(),
            symptoms: request
                .user_profile
                .as_ref()
                .map(|p| p.symptoms.clone())
                .unwrap_or_default(),
            wants_free: request.wants_free(),
            wants_online: request.wants_online(),
        }
    }
}

/// Outcome of the semantic path for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticScores {
    /// Normalized similarity per candidate, in `[0, 1]`.
    Available(HashMap<CenterId, f64>),
    /// Semantic scoring failed; carries the classified cause.
    Unavailable { kind: ErrorKind, reason: String },
    /// No query text, so semantic scoring was never attempted.
    Skipped,
}

impl SemanticScores {
    pub fn is_available(&self) -> bool {
        matches!(self, SemanticScores::Available(_))
    }

    /// Score for `id`; candidates without a returned similarity score 0.
    pub fn get(&self, id: CenterId) -> Option<f64> {
        match self {
            SemanticScores::Available(scores) => Some(scores.get(&id).copied().unwrap_or(0.0)),
            SemanticScores::Unavailable { .. } | SemanticScores::Skipped => None,
        }
    }

    /// Failure kind, when unavailable.
    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match self {
            SemanticScores::Available(_) | SemanticScores::Skipped => None,
            SemanticScores::Unavailable { kind, .. } => Some(*kind),
        }
    }
}
