use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::config::RecommenderConfig;
use crate::directory::DirectoryStore;
use crate::embedding::EmbeddingProvider;
use crate::error::{ErrorKind, RecommendError};
use crate::model::{
    Candidate, RecommendationMetadata, RecommendationRequest, RecommendationResult,
    ValidatedRequest,
};
use crate::scoring::{RuleCriteria, RuleScorer, ScoreCombiner, SemanticScorer, SemanticScores};
use crate::vectordb::VectorStore;

/// Public entry point: fetches, scores, fuses and ranks candidates for one request.
///
/// Holds no per-request state; one instance serves concurrent requests.
pub struct Recommender<D, P, V> {
    directory: D,
    rule: RuleScorer,
    semantic: SemanticScorer<P, V>,
    combiner: ScoreCombiner,
    config: RecommenderConfig,
}

impl<D, P, V> Recommender<D, P, V>
where
    D: DirectoryStore,
    P: EmbeddingProvider,
    V: VectorStore,
{
    /// The scorer's budget is set to `config.semantic_timeout`.
    pub fn new(directory: D, semantic: SemanticScorer<P, V>, config: RecommenderConfig) -> Self {
        Self {
            directory,
            rule: RuleScorer::new(),
            semantic: semantic.with_budget(config.semantic_timeout),
            combiner: ScoreCombiner::new(),
            config,
        }
    }

    pub fn with_rule_scorer(mut self, rule: RuleScorer) -> Self {
        self.rule = rule;
        self
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn semantic(&self) -> &SemanticScorer<P, V> {
        &self.semantic
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Ranks candidates for `request`.
    ///
    /// Semantic-path failures degrade the result instead of failing it. Only invalid input,
    /// a directory failure, an internal invariant violation or cancellation return `Err`.
    #[instrument(skip(self, request, cancel))]
    pub async fn recommend(
        &self,
        request: RecommendationRequest,
        cancel: &CancellationToken,
    ) -> Result<RecommendationResult, RecommendError> {
        let started = Instant::now();
        if cancel.is_cancelled() {
            return Err(RecommendError::Cancelled { stage: "init" });
        }

        let request = request.validate()?;

        let candidates = self.fetch(&request, cancel).await?;
        debug!(count = candidates.len(), "candidates fetched");

        let criteria = RuleCriteria::from_request(&request);
        let rule_scores = self.rule.score_all(&candidates, &criteria)?;
        debug!("rule scored");

        let semantic = match request.user_query.as_deref() {
            Some(query) => self.score_semantic(&candidates, query, cancel).await?,
            None => {
                debug!("no query text; semantic scoring skipped");
                SemanticScores::Skipped
            }
        };

        let breakdowns =
            self.combiner
                .combine(&candidates, &rule_scores, &semantic, request.weights)?;
        let candidate_count = candidates.len();
        let mut ranked = self.combiner.rank(candidates, breakdowns)?;
        ranked.truncate(request.limit);

        let available = semantic.is_available();
        let degraded_reason = semantic.failure_kind().map(|k| k.code().to_string());
        let metadata = RecommendationMetadata {
            algorithm: self.combiner.algorithm(available, &request.weights),
            fallback_mode: !available,
            degraded: degraded_reason.is_some(),
            degraded_reason,
            query_time_ms: started.elapsed().as_millis() as u64,
            weights: request.weights,
            candidate_count,
        };

        info!(
            algorithm = %metadata.algorithm,
            fallback_mode = metadata.fallback_mode,
            degraded = metadata.degraded,
            query_time_ms = metadata.query_time_ms,
            result_count = ranked.len(),
            "recommendation complete"
        );

        Ok(RecommendationResult {
            recommendations: ranked,
            metadata,
        })
    }

    async fn fetch(
        &self,
        request: &ValidatedRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<Candidate>, RecommendError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RecommendError::Cancelled { stage: "fetch_candidates" }),
            fetched = self.directory.fetch_candidates(
                &request.location,
                request.max_distance_km,
                &request.filters.center_types,
            ) => Ok(fetched?),
        }
    }

    /// Runs the semantic path under the configured budget. Only cancellation is an error.
    async fn score_semantic(
        &self,
        candidates: &[Candidate],
        query: &str,
        cancel: &CancellationToken,
    ) -> Result<SemanticScores, RecommendError> {
        let budget = self.config.semantic_timeout;
        let bounded = tokio::time::timeout(budget, self.semantic.score(candidates, query));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RecommendError::Cancelled { stage: "semantic_scoring" }),
            outcome = bounded => Ok(match outcome {
                Ok(scores) => scores,
                Err(_) => {
                    warn!(
                        kind = %ErrorKind::SemanticSearch,
                        operation = "semantic_scoring",
                        retriable = false,
                        budget_ms = budget.as_millis() as u64,
                        "semantic path timed out; falling back"
                    );
                    SemanticScores::Unavailable {
                        kind: ErrorKind::SemanticSearch,
                        reason: format!("semantic path exceeded {}ms", budget.as_millis()),
                    }
                }
            }),
        }
    }
}

impl<D: std::fmt::Debug, P, V: std::fmt::Debug> std::fmt::Debug for Recommender<D, P, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("directory", &self.directory)
            .field("rule", &self.rule)
            .field("semantic", &self.semantic)
            .field("config", &self.config)
            .finish()
    }
}
