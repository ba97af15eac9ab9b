use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use super::stub::{STUB_PROVIDER_VERSION, stub_vector};
use crate::hashing::normalize_query;

/// Failure injected into [`MockEmbeddingProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    Provider,
    RateLimited(Duration),
    Generation,
    Malformed,
}

impl MockFailure {
    fn to_error(&self, operation: &'static str) -> EmbeddingError {
        match self {
            MockFailure::Provider => EmbeddingError::provider(operation, "mock provider failure"),
            MockFailure::RateLimited(retry_after) => EmbeddingError::RateLimited {
                retry_after: *retry_after,
            },
            MockFailure::Generation => EmbeddingError::generation("mock rejected input"),
            MockFailure::Malformed => EmbeddingError::malformed("mock malformed response"),
        }
    }
}

/// Deterministic provider with failure injection and call recording.
///
/// Unregistered texts embed like [`super::StubEmbeddingProvider`]. Failures can be scripted per
/// call or made permanent.
pub struct MockEmbeddingProvider {
    dimension: usize,
    version: String,
    fixed: RwLock<HashMap<String, Vec<f32>>>,
    scripted: Mutex<VecDeque<MockFailure>>,
    always: RwLock<Option<MockFailure>>,
    probe_failure: RwLock<Option<MockFailure>>,
    delay: RwLock<Option<Duration>>,
    calls: AtomicUsize,
    batches: Mutex<Vec<Vec<String>>>,
}

impl MockEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            version: STUB_PROVIDER_VERSION.to_string(),
            fixed: RwLock::new(HashMap::new()),
            scripted: Mutex::new(VecDeque::new()),
            always: RwLock::new(None),
            probe_failure: RwLock::new(None),
            delay: RwLock::new(None),
            calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Returns `vector` for `text` (after normalization) instead of a stub vector.
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.fixed.write().insert(normalize_query(text), vector);
        self
    }

    /// Fails the next `embed_batch` call with `failure`. Queued failures are consumed in order.
    pub fn push_failure(&self, failure: MockFailure) {
        self.scripted.lock().push_back(failure);
    }

    /// Fails every call with `failure` until cleared.
    pub fn set_always_fail(&self, failure: Option<MockFailure>) {
        *self.always.write() = failure;
    }

    pub fn set_probe_failure(&self, failure: Option<MockFailure>) {
        *self.probe_failure.write() = failure;
    }

    /// Delays every call by `delay`.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Texts received by each `embed_batch` call, in call order.
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.batches.lock().clone()
    }

    /// The vector this provider returns for `text` when no failure is injected.
    pub fn vector_for(&self, text: &str) -> Vec<f32> {
        let normalized = normalize_query(text);
        if let Some(v) = self.fixed.read().get(&normalized) {
            return v.clone();
        }
        stub_vector(&normalized, self.dimension)
    }

    fn next_failure(&self) -> Option<MockFailure> {
        if let Some(f) = self.scripted.lock().pop_front() {
            return Some(f);
        }
        self.always.read().clone()
    }
}

impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().push(texts.to_vec());

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(failure) = self.next_failure() {
            debug!(?failure, "mock provider failing call");
            return Err(failure.to_error("embed"));
        }

        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    async fn probe(&self) -> Result<(), EmbeddingError> {
        let failure = self.probe_failure.read().clone();
        match failure {
            Some(f) => Err(f.to_error("probe")),
            None => Ok(()),
        }
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
