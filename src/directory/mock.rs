use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use super::error::DirectoryError;
use super::store::{DirectoryStore, JsonDirectory};
use crate::model::{Candidate, CenterType, GeoPoint};

/// Directory wrapper with failure and latency injection.
pub struct MockDirectory {
    inner: JsonDirectory,
    failing: AtomicBool,
    delay: RwLock<Option<Duration>>,
    calls: AtomicUsize,
    /// Returned verbatim instead of querying `inner` when set.
    canned: RwLock<Option<Vec<Candidate>>>,
}

impl MockDirectory {
    pub fn new(inner: JsonDirectory) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
            delay: RwLock::new(None),
            calls: AtomicUsize::new(0),
            canned: RwLock::new(None),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    /// Serves `candidates` as-is, bypassing distance computation.
    pub fn set_canned(&self, candidates: Option<Vec<Candidate>>) {
        *self.canned.write() = candidates;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DirectoryStore for MockDirectory {
    async fn fetch_candidates(
        &self,
        location: &GeoPoint,
        max_distance_km: f64,
        type_filter: &[CenterType],
    ) -> Result<Vec<Candidate>, DirectoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(DirectoryError::Unavailable {
                reason: "mock failure".to_string(),
            });
        }
        if let Some(canned) = self.canned.read().clone() {
            return Ok(canned);
        }
        Ok(self.inner.query(location, max_distance_km, type_filter))
    }
}
