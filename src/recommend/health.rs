//! Dependency health aggregation.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::orchestrator::Recommender;
use crate::directory::DirectoryStore;
use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::error::ErrorClass;
use crate::vectordb::{VectorDbError, VectorStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: HealthState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: HealthState::Healthy,
            detail: None,
        }
    }

    pub fn degraded(detail: impl Into<String>) -> Self {
        Self {
            status: HealthState::Degraded,
            detail: Some(detail.into()),
        }
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self {
            status: HealthState::Unavailable,
            detail: Some(detail.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthComponents {
    /// Embedding provider.
    pub llm: ComponentHealth,
    #[serde(rename = "vectorDB")]
    pub vector_db: ComponentHealth,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub components: HealthComponents,
}

impl HealthStatus {
    /// Unavailable iff both components are, healthy iff both are, degraded otherwise.
    pub fn from_components(llm: ComponentHealth, vector_db: ComponentHealth) -> Self {
        let status = aggregate(llm.status, vector_db.status);
        Self {
            status,
            components: HealthComponents { llm, vector_db },
        }
    }
}

/// Overall status: healthy only when both components are, unavailable only when both are.
///
/// Two degraded components stay `Degraded`; the rule-based path still serves.
pub fn aggregate(llm: HealthState, vector_db: HealthState) -> HealthState {
    use HealthState::*;

    match (llm, vector_db) {
        (Healthy, Healthy) => Healthy,
        (Unavailable, Unavailable) => Unavailable,
        _ => Degraded,
    }
}

/// Maps a provider probe outcome. A rate-limited provider is reachable, so only degraded.
pub fn provider_health(outcome: Result<(), EmbeddingError>) -> ComponentHealth {
    match outcome {
        Ok(()) => ComponentHealth::healthy(),
        Err(e @ EmbeddingError::RateLimited { .. }) => ComponentHealth::degraded(e.to_string()),
        Err(e) => ComponentHealth::unavailable(e.to_string()),
    }
}

/// Maps a vector store probe outcome. A reachable store missing its collection is degraded.
pub fn vector_store_health(outcome: Result<(), VectorDbError>) -> ComponentHealth {
    match outcome {
        Ok(()) => ComponentHealth::healthy(),
        Err(e @ VectorDbError::CollectionNotFound { .. }) => {
            ComponentHealth::degraded(e.to_string())
        }
        Err(e) => ComponentHealth::unavailable(e.to_string()),
    }
}

async fn bounded_probe<E, F>(
    component: &'static str,
    budget: Duration,
    probe: F,
    classify: impl FnOnce(Result<(), E>) -> ComponentHealth,
) -> ComponentHealth
where
    E: ErrorClass,
    F: Future<Output = Result<(), E>>,
{
    match tokio::time::timeout(budget, probe).await {
        Ok(outcome) => {
            if let Err(e) = &outcome {
                warn!(
                    component,
                    kind = %e.kind(),
                    operation = "probe",
                    retriable = e.is_retriable(),
                    error = %e,
                    "health probe failed"
                );
            }
            classify(outcome)
        }
        Err(_) => {
            warn!(
                component,
                budget_ms = budget.as_millis() as u64,
                "health probe timed out"
            );
            ComponentHealth::unavailable(format!("probe exceeded {}ms", budget.as_millis()))
        }
    }
}

impl<D, P, V> Recommender<D, P, V>
where
    D: DirectoryStore,
    P: EmbeddingProvider,
    V: VectorStore,
{
    /// Probes the embedding provider and the vector store concurrently. Never fails.
    #[instrument(skip(self))]
    pub async fn check_health(&self) -> HealthStatus {
        let budget = self.config().health_timeout;
        let semantic = self.semantic();

        let (llm, vector_db) = tokio::join!(
            bounded_probe(
                "llm",
                budget,
                semantic.embedder().provider().probe(),
                provider_health
            ),
            bounded_probe(
                "vectorDB",
                budget,
                semantic.store().probe(),
                vector_store_health
            ),
        );

        let health = HealthStatus::from_components(llm, vector_db);
        debug!(status = ?health.status, "health checked");
        health
    }
}
