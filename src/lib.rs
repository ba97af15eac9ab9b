//! Haven library crate (used by the `haven` binary and integration tests).
//!
//! Ranks mental-health centers for a user by fusing a deterministic rule-based score with a
//! semantic similarity score, and degrades to rule-only ranking when the embedding provider
//! or the vector store misbehaves.
//!
//! # Public API Surface
//!
//! ## Entry Point
//! - [`Recommender`], [`RecommenderConfig`] - Orchestration, timeouts, cancellation
//! - [`HealthStatus`] - Dependency health aggregate
//!
//! ## Data Model
//! - [`RecommendationRequest`], [`RecommendationResult`], [`RecommendationResponse`]
//! - [`Candidate`], [`Center`], [`CenterType`], [`UserProfile`], [`Weights`]
//!
//! ## Collaborators
//! - [`DirectoryStore`], [`JsonDirectory`] - Candidate source
//! - [`EmbeddingProvider`], [`HttpEmbeddingProvider`], [`EmbeddingClient`] - Embeddings
//! - [`VectorStore`], [`QdrantVectorStore`] - Similarity search
//! - [`CacheStore`], [`MokaCacheStore`], [`EmbeddingCache`] - Embedding cache
//!
//! ## Errors
//! Each module owns a `thiserror` enum implementing [`ErrorClass`]; only [`RecommendError`]
//! escapes [`Recommender::recommend`].
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod directory;
pub mod embedding;
pub mod error;
pub mod hashing;
pub mod model;
pub mod recommend;
pub mod scoring;
pub mod vectordb;

pub use cache::{CacheConfig, CacheError, CacheStore, EmbeddingCache, MokaCacheStore};
#[cfg(any(test, feature = "mock"))]
pub use cache::MockCacheStore;

pub use config::{Config, ConfigError};
pub use directory::{DirectoryError, DirectoryStore, JsonDirectory};
#[cfg(any(test, feature = "mock"))]
pub use directory::MockDirectory;

pub use embedding::{
    EmbeddingClient, EmbeddingClientConfig, EmbeddingError, EmbeddingProvider,
    HttpEmbeddingProvider, HttpProviderConfig, RetryPolicy, StubEmbeddingProvider,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::{MockEmbeddingProvider, MockFailure};

pub use error::{ErrorClass, ErrorKind, ErrorResponse, RecommendError};
pub use hashing::{embedding_cache_key, hash_to_u64, normalize_query};
pub use model::{
    Algorithm, Candidate, Center, CenterId, CenterType, GeoPoint, RankedCandidate,
    RecommendationFilters, RecommendationMetadata, RecommendationRequest,
    RecommendationResponse, RecommendationResult, ScoreBreakdown, Symptom, UserProfile,
    Weights,
};
pub use recommend::{ComponentHealth, HealthState, HealthStatus, Recommender, RecommenderConfig};
pub use scoring::{RuleScorer, ScoreCombiner, ScoringError, SemanticScorer, SemanticScores};

pub use vectordb::{QdrantVectorStore, SimilarityHit, VectorDbError, VectorStore};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::{MockStoreFailure, MockVectorStore};
