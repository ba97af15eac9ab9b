use serde::{Deserialize, Serialize};

use super::center::{Candidate, CenterId, CenterType};
use super::request::Weights;

/// Scoring mode that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    RuleBased,
    Hybrid,
    Semantic,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::RuleBased => "rule_based",
            Algorithm::Hybrid => "hybrid",
            Algorithm::Semantic => "semantic",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-candidate score decomposition.
///
/// When `embedding_score` is `None`, `total_score == rule_based_score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub rule_based_score: f64,
    pub embedding_score: Option<f64>,
    pub total_score: f64,
    pub weights: Weights,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub scores: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationMetadata {
    pub algorithm: Algorithm,
    /// Semantic scores were not used, whether never requested or unavailable.
    pub fallback_mode: bool,
    /// Semantic scoring was attempted and failed.
    pub degraded: bool,
    /// [`crate::error::ErrorKind::code`] of the failure behind `degraded`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded_reason: Option<String>,
    pub query_time_ms: u64,
    pub weights: Weights,
    /// Candidates considered before truncation.
    pub candidate_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    /// Ordered best-first.
    pub recommendations: Vec<RankedCandidate>,
    pub metadata: RecommendationMetadata,
}

impl RecommendationResult {
    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn top(&self) -> Option<&RankedCandidate> {
        self.recommendations.first()
    }
}

/// Outbound score pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreView {
    pub rule_based_score: f64,
    pub embedding_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    pub center_id: CenterId,
    pub center_name: String,
    pub center_type: CenterType,
    pub distance_meters: f64,
    pub total_score: f64,
    pub scores: ScoreView,
}

/// Wire shape returned to the routing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationItem>,
    pub metadata: RecommendationMetadata,
}

impl From<&RecommendationResult> for RecommendationResponse {
    fn from(result: &RecommendationResult) -> Self {
        let recommendations = result
            .recommendations
            .iter()
            .map(|ranked| RecommendationItem {
                center_id: ranked.candidate.id,
                center_name: ranked.candidate.name.clone(),
                center_type: ranked.candidate.center_type,
                distance_meters: ranked.candidate.distance_meters,
                total_score: ranked.scores.total_score,
                scores: ScoreView {
                    rule_based_score: ranked.scores.rule_based_score,
                    embedding_score: ranked.scores.embedding_score,
                },
            })
            .collect();

        Self {
            recommendations,
            metadata: result.metadata.clone(),
        }
    }
}
