use std::future::Future;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{Condition, Filter, SearchPointsBuilder};
use tracing::{debug, instrument};

use super::error::VectorDbError;
use super::model::{SimilarityHit, check_query_vector};
use crate::model::CenterId;

/// Nearest-neighbour search over precomputed center vectors.
pub trait VectorStore: Send + Sync {
    /// Returns up to `top_k` hits, most similar first.
    ///
    /// With `candidate_filter`, only those ids are considered.
    fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        candidate_filter: Option<&[CenterId]>,
    ) -> impl Future<Output = Result<Vec<SimilarityHit>, VectorDbError>> + Send;

    /// Lightweight reachability check that does not search.
    fn probe(&self) -> impl Future<Output = Result<(), VectorDbError>> + Send;
}

#[derive(Clone)]
/// Qdrant-backed [`VectorStore`] over one collection.
pub struct QdrantVectorStore {
    client: Qdrant,
    url: String,
    collection: String,
    dimension: usize,
}

impl QdrantVectorStore {
    /// Creates a store for `collection` at `url`. No request is made until first use.
    pub fn new(url: &str, collection: &str, dimension: usize) -> Result<Self, VectorDbError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| VectorDbError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
            dimension,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), VectorDbError> {
        self.client
            .health_check()
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Returns `true` if the configured collection exists.
    pub async fn collection_exists(&self) -> Result<bool, VectorDbError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| VectorDbError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })
    }

    fn map_search_error(&self, err: qdrant_client::QdrantError) -> VectorDbError {
        let message = err.to_string();
        if message.to_ascii_lowercase().contains("not found") {
            VectorDbError::CollectionNotFound {
                collection: self.collection.clone(),
            }
        } else {
            VectorDbError::SearchFailed {
                collection: self.collection.clone(),
                message,
            }
        }
    }
}

impl std::fmt::Debug for QdrantVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantVectorStore")
            .field("url", &self.url)
            .field("collection", &self.collection)
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl VectorStore for QdrantVectorStore {
    #[instrument(skip(self, vector, candidate_filter), fields(collection = %self.collection))]
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        candidate_filter: Option<&[CenterId]>,
    ) -> Result<Vec<SimilarityHit>, VectorDbError> {
        check_query_vector(&vector, self.dimension)?;

        let mut search = SearchPointsBuilder::new(&self.collection, vector, top_k);
        if let Some(ids) = candidate_filter {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            search = search.filter(Filter::must([Condition::has_id(ids.iter().copied())]));
        }

        let response = self
            .client
            .search_points(search)
            .await
            .map_err(|e| self.map_search_error(e))?;

        let hits: Vec<SimilarityHit> = response
            .result
            .into_iter()
            .filter_map(SimilarityHit::from_scored_point)
            .collect();

        debug!(hits = hits.len(), "vector search complete");
        Ok(hits)
    }

    async fn probe(&self) -> Result<(), VectorDbError> {
        self.health_check().await?;
        if !self.collection_exists().await? {
            return Err(VectorDbError::CollectionNotFound {
                collection: self.collection.clone(),
            });
        }
        Ok(())
    }
}
