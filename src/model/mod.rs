//! Request, candidate and result types.
//!
//! Wire types serialize with camelCase keys to match the routing layer's JSON.

pub mod center;
pub mod profile;
pub mod request;
pub mod response;

#[cfg(test)]
mod tests;

pub use center::{Candidate, Center, CenterId, CenterType, EARTH_RADIUS_METERS, GeoPoint};
pub use profile::{AgeGroup, CounselingType, RecommendationFilters, Symptom, UserProfile};
pub use request::{RecommendationRequest, ValidatedRequest, Weights};
pub use response::{
    Algorithm, RankedCandidate, RecommendationItem, RecommendationMetadata,
    RecommendationResponse, RecommendationResult, ScoreBreakdown, ScoreView,
};
