//! Embedding cache that never fails its caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::error::CacheError;
use super::store::CacheStore;
use crate::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_OP_TIMEOUT, DEFAULT_CACHE_TTL};
use crate::error::ErrorClass;
use crate::hashing::embedding_cache_key;

/// Cache tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheConfig {
    /// Entry lifetime.
    pub ttl: Duration,
    /// Budget for a single get/set/delete.
    pub op_timeout: Duration,
    /// Capacity of the in-process store.
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
            op_timeout: DEFAULT_CACHE_OP_TIMEOUT,
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }

    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Embedding cache keyed by normalized text and provider version.
///
/// Every store error, timeout or undecodable entry is logged and reported as a miss, so the
/// presence of a store only ever affects latency.
#[derive(Clone)]
pub struct EmbeddingCache {
    store: Option<Arc<dyn CacheStore>>,
    config: CacheConfig,
}

impl EmbeddingCache {
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self {
            store: Some(store),
            config,
        }
    }

    /// A cache that always misses and never writes.
    pub fn disabled() -> Self {
        Self {
            store: None,
            config: CacheConfig::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the cached vector for `text`, or `None` on a miss of any kind.
    ///
    /// An entry that fails to decode or whose length differs from `dimension` is deleted.
    pub async fn get_embedding(
        &self,
        text: &str,
        provider_version: &str,
        dimension: usize,
    ) -> Option<Vec<f32>> {
        let store = self.store.as_ref()?;
        let key = embedding_cache_key(text, provider_version);

        let bytes = match self.bounded("get", store.get(&key)).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key = %key, "embedding cache miss");
                return None;
            }
            Err(e) => {
                log_absorbed(&e, "get");
                return None;
            }
        };

        match serde_json::from_slice::<Vec<f32>>(&bytes) {
            Ok(vector) if vector.len() == dimension => {
                debug!(key = %key, "embedding cache hit");
                Some(vector)
            }
            Ok(vector) => {
                warn!(
                    key = %key,
                    expected = dimension,
                    actual = vector.len(),
                    "cached embedding has wrong dimension; evicting"
                );
                self.evict(store, &key).await;
                None
            }
            Err(e) => {
                log_absorbed(&CacheError::Serialization(e), "decode");
                self.evict(store, &key).await;
                None
            }
        }
    }

    /// Stores `vector` for `text`. Failures are logged and dropped.
    pub async fn put_embedding(&self, text: &str, provider_version: &str, vector: &[f32]) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let key = embedding_cache_key(text, provider_version);

        let bytes = match serde_json::to_vec(vector) {
            Ok(bytes) => bytes,
            Err(e) => {
                log_absorbed(&CacheError::Serialization(e), "encode");
                return;
            }
        };

        if let Err(e) = self
            .bounded("set", store.set(&key, bytes, self.config.ttl))
            .await
        {
            log_absorbed(&e, "set");
        }
    }

    async fn evict(&self, store: &Arc<dyn CacheStore>, key: &str) {
        if let Err(e) = self.bounded("delete", store.delete(key)).await {
            log_absorbed(&e, "delete");
        }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        tokio::time::timeout(self.config.op_timeout, fut)
            .await
            .map_err(|_| CacheError::Timeout { operation })?
    }
}

impl std::fmt::Debug for EmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingCache")
            .field("enabled", &self.is_enabled())
            .field("config", &self.config)
            .finish()
    }
}

fn log_absorbed(err: &CacheError, operation: &'static str) {
    warn!(
        kind = %err.kind(),
        operation,
        retriable = err.is_retriable(),
        error = %err,
        "cache error treated as miss"
    );
}
