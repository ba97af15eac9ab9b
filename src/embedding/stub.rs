use tracing::debug;

use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use crate::hashing::{hash_to_u64, normalize_query};

pub const STUB_PROVIDER_VERSION: &str = "stub-embedding-v1";

/// Offline provider returning deterministic unit vectors.
///
/// Used when no embeddings API is configured. Vectors carry no meaning beyond identity:
/// equal normalized texts embed equally.
#[derive(Debug, Clone)]
pub struct StubEmbeddingProvider {
    dimension: usize,
}

impl StubEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl EmbeddingProvider for StubEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(count = texts.len(), "generating stub embeddings");
        Ok(texts
            .iter()
            .map(|t| stub_vector(&normalize_query(t), self.dimension))
            .collect())
    }

    async fn probe(&self) -> Result<(), EmbeddingError> {
        Ok(())
    }

    fn version(&self) -> &str {
        STUB_PROVIDER_VERSION
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Unit-length pseudo-random vector seeded from `text`.
pub fn stub_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut state = hash_to_u64(text.as_bytes());
    let mut vector = Vec::with_capacity(dimension);

    for _ in 0..dimension {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
        vector.push(value);
    }

    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}
