//! Fuses rule and semantic scores and orders the result.

use std::cmp::Ordering;

use super::error::ScoringError;
use super::types::SemanticScores;
use crate::model::{Algorithm, Candidate, RankedCandidate, ScoreBreakdown, Weights};

#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCombiner;

impl ScoreCombiner {
    pub fn new() -> Self {
        Self
    }

    /// One breakdown per candidate, aligned with `candidates`.
    ///
    /// With semantic scores unavailable the total is the rule score alone.
    pub fn combine(
        &self,
        candidates: &[Candidate],
        rule_scores: &[f64],
        semantic: &SemanticScores,
        weights: Weights,
    ) -> Result<Vec<ScoreBreakdown>, ScoringError> {
        if rule_scores.len() != candidates.len() {
            return Err(ScoringError::CountMismatch {
                operation: "score_combination",
                expected: candidates.len(),
                actual: rule_scores.len(),
            });
        }

        let breakdowns = candidates
            .iter()
            .zip(rule_scores)
            .map(|(candidate, &rule)| {
                let rule = rule.clamp(0.0, 1.0);
                let embedding = semantic.get(candidate.id).map(|s| s.clamp(0.0, 1.0));
                let total = match embedding {
                    Some(e) => (weights.rule * rule + weights.embedding * e).clamp(0.0, 1.0),
                    None => rule,
                };
                ScoreBreakdown {
                    rule_based_score: rule,
                    embedding_score: embedding,
                    total_score: total,
                    weights,
                }
            })
            .collect();

        Ok(breakdowns)
    }

    /// Labels the scoring mode actually used.
    pub fn algorithm(&self, semantic_available: bool, weights: &Weights) -> Algorithm {
        if !semantic_available {
            Algorithm::RuleBased
        } else if weights.rule == 0.0 {
            Algorithm::Semantic
        } else {
            Algorithm::Hybrid
        }
    }

    /// Orders best-first: total descending, then distance ascending, then input order.
    pub fn rank(
        &self,
        candidates: Vec<Candidate>,
        breakdowns: Vec<ScoreBreakdown>,
    ) -> Result<Vec<RankedCandidate>, ScoringError> {
        if breakdowns.len() != candidates.len() {
            return Err(ScoringError::CountMismatch {
                operation: "ranking",
                expected: candidates.len(),
                actual: breakdowns.len(),
            });
        }

        let mut ranked: Vec<(usize, RankedCandidate)> = candidates
            .into_iter()
            .zip(breakdowns)
            .map(|(candidate, scores)| RankedCandidate { candidate, scores })
            .enumerate()
            .collect();

        ranked.sort_by(|(ia, a), (ib, b)| {
            b.scores
                .total_score
                .total_cmp(&a.scores.total_score)
                .then_with(|| {
                    a.candidate
                        .distance_meters
                        .partial_cmp(&b.candidate.distance_meters)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| ia.cmp(ib))
        });

        Ok(ranked.into_iter().map(|(_, r)| r).collect())
    }
}
