use std::future::Future;

use super::error::EmbeddingError;

/// Text-to-vector backend.
///
/// Implementations make exactly one upstream call per [`EmbeddingProvider::embed_batch`] and do
/// not retry; retry policy lives in [`super::EmbeddingClient`].
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `texts`, returning one vector per text in input order.
    fn embed_batch(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>> + Send;

    /// Lightweight reachability check that does not generate embeddings.
    fn probe(&self) -> impl Future<Output = Result<(), EmbeddingError>> + Send;

    /// Identifies the embedding space (model name). Part of every cache key.
    fn version(&self) -> &str;

    /// Length of every returned vector.
    fn dimension(&self) -> usize;
}
