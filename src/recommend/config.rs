use std::time::Duration;

use crate::constants::{DEFAULT_HEALTH_TIMEOUT, DEFAULT_SEMANTIC_TIMEOUT};

#[derive(Debug, Clone, PartialEq)]
/// Per-orchestrator time budgets.
pub struct RecommenderConfig {
    /// Budget for the whole semantic path (embed, retries, vector search).
    pub semantic_timeout: Duration,
    /// Budget for each health probe.
    pub health_timeout: Duration,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            semantic_timeout: DEFAULT_SEMANTIC_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }
}

impl RecommenderConfig {
    pub fn with_semantic_timeout(mut self, timeout: Duration) -> Self {
        self.semantic_timeout = timeout;
        self
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }
}
