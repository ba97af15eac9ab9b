//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Score Invariants
//!
//! Every score produced by the engine lies in `0.0..=1.0`. The rule sub-score weights and the
//! default fusion weights each sum to exactly `1.0`; [`validate_unit_weights`] is used at module
//! boundaries to catch drift early.

use std::time::Duration;

pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Fusion weight given to the embedding score when the caller supplies none.
pub const DEFAULT_EMBEDDING_WEIGHT: f64 = 0.5;
/// Fusion weight given to the rule score when the caller supplies none.
pub const DEFAULT_RULE_WEIGHT: f64 = 0.5;

pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 20;

pub const DEFAULT_MAX_DISTANCE_KM: f64 = 10.0;
pub const MAX_DISTANCE_KM: f64 = 100.0;

pub const MAX_PROFILE_SYMPTOMS: usize = 10;

/// Query text bounds, counted in characters after trimming.
pub const MIN_TEXT_CHARS: usize = 1;
pub const MAX_TEXT_CHARS: usize = 5000;

pub const MAX_EMBED_BATCH: usize = 50;

/// Retries after the first failed provider call.
pub const PROVIDER_MAX_RETRIES: u32 = 2;
pub const PROVIDER_BACKOFF_BASE: Duration = Duration::from_millis(200);

/// Upper bound on a provider-supplied `Retry-After`.
pub const RATE_LIMIT_WAIT_CAP: Duration = Duration::from_secs(5);
/// Used when a 429 carries no parsable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

pub const DEFAULT_SEMANTIC_TIMEOUT: Duration = Duration::from_millis(4000);
pub const MAX_SEMANTIC_TIMEOUT: Duration = Duration::from_secs(10);
/// Part of the semantic budget held back for the vector search after embedding.
pub const VECTOR_SEARCH_RESERVE: Duration = Duration::from_millis(500);

/// Ceiling on a single HTTP embedding request.
pub const DEFAULT_PROVIDER_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
pub const MIN_PROVIDER_REQUEST_TIMEOUT: Duration = Duration::from_millis(100);

pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_CACHE_OP_TIMEOUT: Duration = Duration::from_millis(100);

/// Tolerance used when checking that a weight set sums to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Returns `true` if `weights` are finite, non-negative and sum to `1.0`.
pub fn validate_unit_weights(weights: &[f64]) -> bool {
    weights.iter().all(|w| w.is_finite() && *w >= 0.0)
        && (weights.iter().sum::<f64>() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
}
