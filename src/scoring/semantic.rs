//! Query-to-center similarity via the embedding client and vector store.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use super::types::SemanticScores;
use crate::constants::{DEFAULT_SEMANTIC_TIMEOUT, RATE_LIMIT_WAIT_CAP, VECTOR_SEARCH_RESERVE};
use crate::embedding::{EmbeddingClient, EmbeddingError, EmbeddingProvider};
use crate::error::{ErrorClass, ErrorKind};
use crate::model::{Candidate, CenterId};
use crate::vectordb::VectorStore;

/// Maps cosine similarity in `[-1, 1]` onto `[0, 1]`.
pub fn normalize_similarity(cosine: f32) -> f64 {
    ((f64::from(cosine) + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Semantic scorer. Never fails: any error yields [`SemanticScores::Unavailable`].
pub struct SemanticScorer<P, V> {
    embedder: EmbeddingClient<P>,
    store: V,
    rate_limit_cap: Duration,
    budget: Duration,
}

impl<P: EmbeddingProvider, V: VectorStore> SemanticScorer<P, V> {
    pub fn new(embedder: EmbeddingClient<P>, store: V) -> Self {
        Self {
            embedder,
            store,
            rate_limit_cap: RATE_LIMIT_WAIT_CAP,
            budget: DEFAULT_SEMANTIC_TIMEOUT,
        }
    }

    /// Caps the wait honored for a provider `Retry-After`.
    pub fn with_rate_limit_cap(mut self, cap: Duration) -> Self {
        self.rate_limit_cap = cap;
        self
    }

    /// Time the whole scoring call may take. A rate-limit wait that would overrun it is skipped.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn embedder(&self) -> &EmbeddingClient<P> {
        &self.embedder
    }

    pub fn store(&self) -> &V {
        &self.store
    }

    /// Scores `candidates` against `query`.
    ///
    /// Candidates the store returns no similarity for score 0.
    #[instrument(skip(self, candidates, query), fields(candidates = candidates.len()))]
    pub async fn score(&self, candidates: &[Candidate], query: &str) -> SemanticScores {
        let deadline = Instant::now() + self.budget;
        match self.try_score(candidates, query, deadline).await {
            Ok(scores) => SemanticScores::Available(scores),
            Err((kind, operation, reason, retriable)) => {
                warn!(
                    kind = %kind,
                    operation,
                    retriable,
                    error = %reason,
                    "semantic scoring unavailable; falling back"
                );
                SemanticScores::Unavailable { kind, reason }
            }
        }
    }

    async fn try_score(
        &self,
        candidates: &[Candidate],
        query: &str,
        deadline: Instant,
    ) -> Result<HashMap<CenterId, f64>, (ErrorKind, &'static str, String, bool)> {
        if candidates.is_empty() {
            return Ok(HashMap::new());
        }

        let vector = self
            .embed_with_rate_limit_retry(query, deadline)
            .await
            .map_err(|e| (e.kind(), "embed", e.to_string(), e.is_retriable()))?;

        let ids: Vec<CenterId> = candidates.iter().map(|c| c.id).collect();
        let hits = self
            .store
            .query(vector, ids.len() as u64, Some(ids.as_slice()))
            .await
            .map_err(|e| (e.kind(), "vector_search", e.to_string(), e.is_retriable()))?;

        let scores: HashMap<CenterId, f64> = hits
            .into_iter()
            .filter(|hit| ids.contains(&hit.candidate_id))
            .filter(|hit| hit.similarity.is_finite())
            .map(|hit| (hit.candidate_id, normalize_similarity(hit.similarity)))
            .collect();

        debug!(
            matched = scores.len(),
            candidates = ids.len(),
            "semantic scores computed"
        );
        Ok(scores)
    }

    async fn embed_with_rate_limit_retry(
        &self,
        query: &str,
        deadline: Instant,
    ) -> Result<Vec<f32>, EmbeddingError> {
        match self.embedder.embed(query).await {
            Err(EmbeddingError::RateLimited { retry_after }) => {
                let wait = retry_after.min(self.rate_limit_cap);
                let remaining = deadline.saturating_duration_since(Instant::now());
                if wait.saturating_add(VECTOR_SEARCH_RESERVE) >= remaining {
                    warn!(
                        kind = %ErrorKind::RateLimitExceeded,
                        operation = "embed",
                        retriable = false,
                        wait_ms = wait.as_millis() as u64,
                        remaining_ms = remaining.as_millis() as u64,
                        "embedding provider rate limited past the semantic budget; not retrying"
                    );
                    return Err(EmbeddingError::RateLimited { retry_after });
                }

                warn!(
                    kind = %ErrorKind::RateLimitExceeded,
                    operation = "embed",
                    retriable = true,
                    wait_ms = wait.as_millis() as u64,
                    "embedding provider rate limited; retrying once"
                );
                tokio::time::sleep(wait).await;
                self.embedder.embed(query).await
            }
            other => other,
        }
    }
}

impl<P, V: std::fmt::Debug> std::fmt::Debug for SemanticScorer<P, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScorer")
            .field("embedder", &self.embedder)
            .field("store", &self.store)
            .field("rate_limit_cap", &self.rate_limit_cap)
            .field("budget", &self.budget)
            .finish()
    }
}
