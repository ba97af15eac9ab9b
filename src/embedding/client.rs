//! Validating, caching, retrying front for an [`EmbeddingProvider`].

use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::cache::EmbeddingCache;
use crate::constants::{
    MAX_EMBED_BATCH, MAX_TEXT_CHARS, MIN_TEXT_CHARS, PROVIDER_BACKOFF_BASE, PROVIDER_MAX_RETRIES,
};
use crate::error::{ErrorClass, ErrorKind};

/// Exponential backoff for transient provider failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base: Duration,
    /// Multiplier applied per retry.
    pub factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: PROVIDER_MAX_RETRIES,
            base: PROVIDER_BACKOFF_BASE,
            factor: 2,
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (0-based): `base * factor^retry`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base
            .saturating_mul(self.factor.saturating_pow(retry))
    }

    /// Longest per-attempt timeout that lets every attempt and backoff fit in `budget`.
    pub fn attempt_timeout(&self, budget: Duration) -> Duration {
        let backoff: Duration = (0..self.max_retries).map(|r| self.delay_for(r)).sum();
        budget.saturating_sub(backoff) / self.max_retries.saturating_add(1)
    }
}

/// Settings for [`EmbeddingClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingClientConfig {
    pub retry: RetryPolicy,
    /// Largest accepted batch.
    pub max_batch: usize,
    /// Bounds on trimmed text length, in characters.
    pub min_chars: usize,
    pub max_chars: usize,
}

impl Default for EmbeddingClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            max_batch: MAX_EMBED_BATCH,
            min_chars: MIN_TEXT_CHARS,
            max_chars: MAX_TEXT_CHARS,
        }
    }
}

impl EmbeddingClientConfig {
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }
}

/// Embedding front used by the semantic scorer.
///
/// - rejects empty or oversized text with [`EmbeddingError::Generation`]
/// - serves cached vectors and sends only the misses upstream, in one call
/// - retries [`ErrorKind::EmbeddingProvider`] failures per [`RetryPolicy`]
/// - returns [`EmbeddingError::RateLimited`] immediately; the caller owns that wait
pub struct EmbeddingClient<P> {
    provider: P,
    cache: EmbeddingCache,
    config: EmbeddingClientConfig,
}

impl<P: EmbeddingProvider> EmbeddingClient<P> {
    pub fn new(provider: P, cache: EmbeddingCache, config: EmbeddingClientConfig) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    pub fn config(&self) -> &EmbeddingClientConfig {
        &self.config
    }

    /// Embeds a single text.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::malformed("provider returned no embedding"))
    }

    /// Embeds `texts`, preserving order. Cache hits are not sent upstream.
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.len() > self.config.max_batch {
            return Err(EmbeddingError::BatchTooLarge {
                size: texts.len(),
                max: self.config.max_batch,
            });
        }

        let trimmed = texts
            .iter()
            .map(|t| self.check_text(t))
            .collect::<Result<Vec<&str>, _>>()?;

        let version = self.provider.version();
        let dimension = self.provider.dimension();

        let mut slots: Vec<Option<Vec<f32>>> = Vec::with_capacity(trimmed.len());
        for text in &trimmed {
            slots.push(self.cache.get_embedding(text, version, dimension).await);
        }

        let missing: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.is_none().then_some(i))
            .collect();
        debug!(
            hits = trimmed.len() - missing.len(),
            misses = missing.len(),
            "embedding cache lookup"
        );

        if !missing.is_empty() {
            let upstream: Vec<String> = missing.iter().map(|&i| trimmed[i].to_string()).collect();
            let vectors = self.call_provider(&upstream).await?;

            if vectors.len() != upstream.len() {
                return Err(EmbeddingError::malformed(format!(
                    "requested {} embeddings, received {}",
                    upstream.len(),
                    vectors.len()
                )));
            }

            for (&i, vector) in missing.iter().zip(vectors) {
                if vector.len() != dimension {
                    return Err(EmbeddingError::malformed(format!(
                        "expected dimension {dimension}, got {}",
                        vector.len()
                    )));
                }
                self.cache.put_embedding(trimmed[i], version, &vector).await;
                slots[i] = Some(vector);
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.ok_or_else(|| EmbeddingError::malformed("embedding slot left empty")))
            .collect()
    }

    fn check_text<'a>(&self, text: &'a str) -> Result<&'a str, EmbeddingError> {
        let trimmed = text.trim();
        let chars = trimmed.chars().count();
        if chars < self.config.min_chars {
            return Err(EmbeddingError::generation("text is empty"));
        }
        if chars > self.config.max_chars {
            return Err(EmbeddingError::generation(format!(
                "text has {chars} characters; the maximum is {}",
                self.config.max_chars
            )));
        }
        Ok(trimmed)
    }

    async fn call_provider(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let policy = self.config.retry;
        let mut retry = 0;

        loop {
            match self.provider.embed_batch(texts).await {
                Ok(vectors) => return Ok(vectors),
                Err(e) if e.kind() == ErrorKind::EmbeddingProvider && retry < policy.max_retries => {
                    let delay = policy.delay_for(retry);
                    warn!(
                        kind = %e.kind(),
                        operation = "embed",
                        retriable = true,
                        attempt = retry + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "embedding provider failed; backing off"
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl<P> std::fmt::Debug for EmbeddingClient<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingClient")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}
