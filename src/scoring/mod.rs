//! Candidate scoring.
//!
//! Two independent scorers feed one combiner:
//!
//! - [`RuleScorer`] is deterministic over center attributes and never needs the network.
//! - [`SemanticScorer`] embeds the user query and asks the vector store for per-center
//!   similarity. It never fails; errors become [`SemanticScores::Unavailable`].
//! - [`ScoreCombiner`] fuses both with the request [`Weights`](crate::model::Weights) and
//!   produces a deterministic ordering.

pub mod combiner;
pub mod error;
pub mod rule;
pub mod semantic;
pub mod types;


pub use combiner::ScoreCombiner;
pub use error::ScoringError;
pub use rule::{
    RuleScorer, affinity, preference_score, proximity_score, symptom_affinity_score,
    type_match_score,
};
pub use semantic::{SemanticScorer, normalize_similarity};
pub use types::{NEUTRAL_PREFERENCE, RuleCriteria, RuleSubScores, RuleWeights, SemanticScores};
