use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use super::client::VectorStore;
use super::error::VectorDbError;
use super::model::{SimilarityHit, check_query_vector};
use crate::model::CenterId;

/// Failure injected into [`MockVectorStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStoreFailure {
    Unreachable,
    MissingCollection,
}

/// In-memory [`VectorStore`] computing exact cosine similarity.
pub struct MockVectorStore {
    dimension: usize,
    points: RwLock<BTreeMap<CenterId, Vec<f32>>>,
    failure: RwLock<Option<MockStoreFailure>>,
    delay: RwLock<Option<Duration>>,
    queries: AtomicUsize,
}

impl MockVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            points: RwLock::new(BTreeMap::new()),
            failure: RwLock::new(None),
            delay: RwLock::new(None),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, id: CenterId, vector: Vec<f32>) {
        self.points.write().insert(id, vector);
    }

    pub fn with_points(self, points: impl IntoIterator<Item = (CenterId, Vec<f32>)>) -> Self {
        self.points.write().extend(points);
        self
    }

    pub fn point_count(&self) -> usize {
        self.points.read().len()
    }

    pub fn set_failure(&self, failure: Option<MockStoreFailure>) {
        *self.failure.write() = failure;
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write() = delay;
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), VectorDbError> {
        match *self.failure.read() {
            Some(MockStoreFailure::Unreachable) => Err(VectorDbError::ConnectionFailed {
                url: "mock://".to_string(),
                message: "mock store unreachable".to_string(),
            }),
            Some(MockStoreFailure::MissingCollection) => Err(VectorDbError::CollectionNotFound {
                collection: "mock".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl VectorStore for MockVectorStore {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        candidate_filter: Option<&[CenterId]>,
    ) -> Result<Vec<SimilarityHit>, VectorDbError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_failure()?;
        check_query_vector(&vector, self.dimension)?;

        let mut hits: Vec<SimilarityHit> = self
            .points
            .read()
            .iter()
            .filter(|(id, _)| candidate_filter.is_none_or(|ids| ids.contains(id)))
            .map(|(&id, stored)| SimilarityHit::new(id, cosine_similarity(&vector, stored)))
            .collect();

        hits.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then(a.candidate_id.cmp(&b.candidate_id))
        });
        hits.truncate(top_k as usize);
        Ok(hits)
    }

    async fn probe(&self) -> Result<(), VectorDbError> {
        self.check_failure()
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
