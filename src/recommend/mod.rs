//! Recommendation orchestration.
//!
//! Per request: validate, fetch candidates, rule-score, optionally semantic-score under a time
//! budget, fuse, rank and truncate. [`Recommender::check_health`] reports on the two external
//! dependencies of the semantic path.

pub mod config;
pub mod health;
pub mod orchestrator;


pub use config::RecommenderConfig;
pub use health::{
    ComponentHealth, HealthComponents, HealthState, HealthStatus, aggregate, provider_health,
    vector_store_health,
};
pub use orchestrator::Recommender;
