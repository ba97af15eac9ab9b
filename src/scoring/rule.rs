//! Deterministic scoring over structured center attributes.

use tracing::debug;

use super::error::ScoringError;
use super::types::{NEUTRAL_PREFERENCE, RuleCriteria, RuleSubScores, RuleWeights};
use crate::model::{Candidate, CenterType, Symptom};

/// Symptoms each center type is equipped to address.
pub fn affinity(center_type: CenterType) -> &'static [Symptom] {
    use Symptom::*;

    match center_type {
        CenterType::WelfareCenter => &[Depression, Anxiety, Stress, Insomnia, Trauma],
        CenterType::SuicidePrevention => &[SuicidalThoughts, SelfHarm, Depression, Trauma],
        CenterType::AddictionManagement => &[Addiction, Stress, FamilyConflict],
        CenterType::YouthCounseling => {
            &[SchoolIssues, FamilyConflict, Anxiety, Depression, SelfHarm]
        }
        CenterType::ChildProtection => &[Trauma, FamilyConflict, SchoolIssues],
    }
}

/// `1` at distance 0, falling linearly to `0` at `max_distance_meters` and beyond.
pub fn proximity_score(distance_meters: f64, max_distance_meters: f64) -> f64 {
    if max_distance_meters <= 0.0 {
        return 0.0;
    }
    (1.0 - distance_meters / max_distance_meters).clamp(0.0, 1.0)
}

/// `1` if the type passes `type_filter` (an empty filter passes everything).
pub fn type_match_score(center_type: CenterType, type_filter: &[CenterType]) -> f64 {
    if type_filter.is_empty() || type_filter.contains(&center_type) {
        1.0
    } else {
        0.0
    }
}

/// Fraction of `symptoms` the center type is equipped to address; `0` with no symptoms.
pub fn symptom_affinity_score(center_type: CenterType, symptoms: &[Symptom]) -> f64 {
    if symptoms.is_empty() {
        return 0.0;
    }
    let table = affinity(center_type);
    let matched = symptoms.iter().filter(|s| table.contains(s)).count();
    matched as f64 / symptoms.len() as f64
}

/// Mean over requested preferences of `1` (met) or [`NEUTRAL_PREFERENCE`] (unmet).
pub fn preference_score(candidate: &Candidate, wants_free: bool, wants_online: bool) -> f64 {
    let requested = [
        (wants_free, candidate.is_free_available),
        (wants_online, candidate.is_online_available),
    ];

    let (count, sum) = requested
        .iter()
        .filter(|(wanted, _)| *wanted)
        .fold((0usize, 0.0), |(n, acc), (_, met)| {
            (n + 1, acc + if *met { 1.0 } else { NEUTRAL_PREFERENCE })
        });

    if count == 0 {
        NEUTRAL_PREFERENCE
    } else {
        sum / count as f64
    }
}

/// Pure rule-based scorer.
#[derive(Debug, Clone, Default)]
pub struct RuleScorer {
    weights: RuleWeights,
}

impl RuleScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: RuleWeights) -> Result<Self, ScoringError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &RuleWeights {
        &self.weights
    }

    /// Sub-scores for one candidate. Fails on negative/non-finite distance or bad coordinates.
    pub fn sub_scores(
        &self,
        candidate: &Candidate,
        criteria: &RuleCriteria,
    ) -> Result<RuleSubScores, ScoringError> {
        candidate
            .check()
            .map_err(|reason| ScoringError::MalformedCandidate {
                id: candidate.id,
                reason,
            })?;

        Ok(RuleSubScores {
            proximity: proximity_score(candidate.distance_meters, criteria.max_distance_meters),
            type_match: type_match_score(candidate.center_type, &criteria.type_filter),
            symptom_affinity: symptom_affinity_score(candidate.center_type, &criteria.symptoms),
            preference: preference_score(candidate, criteria.wants_free, criteria.wants_online),
        })
    }

    /// Rule score in `[0, 1]` for one candidate.
    pub fn score(
        &self,
        candidate: &Candidate,
        criteria: &RuleCriteria,
    ) -> Result<f64, ScoringError> {
        Ok(self.sub_scores(candidate, criteria)?.weighted(&self.weights))
    }

    /// Scores every candidate, in input order. One malformed candidate fails the batch.
    pub fn score_all(
        &self,
        candidates: &[Candidate],
        criteria: &RuleCriteria,
    ) -> Result<Vec<f64>, ScoringError> {
        let scores = candidates
            .iter()
            .map(|c| self.score(c, criteria))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = scores.len(), "rule scoring complete");
        Ok(scores)
    }
}
