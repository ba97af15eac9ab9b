#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use haven::cache::{CacheConfig, CacheStore, EmbeddingCache};
use haven::directory::{JsonDirectory, MockDirectory};
use haven::embedding::{EmbeddingClient, EmbeddingClientConfig, MockEmbeddingProvider};
use haven::model::RecommendationRequest;
use haven::recommend::{Recommender, RecommenderConfig};
use haven::scoring::SemanticScorer;
use haven::vectordb::MockVectorStore;

use fixtures::{CITY_HALL, DEPRESSION_QUERY, DIM, axis, seoul_centers, seoul_points, topic_vector};

pub type TestRecommender = Recommender<MockDirectory, MockEmbeddingProvider, MockVectorStore>;

/// Fixture-backed recommender. `cache` of `None` disables caching.
pub fn recommender(cache: Option<Arc<dyn CacheStore>>) -> TestRecommender {
    let directory = JsonDirectory::from_centers(seoul_centers()).unwrap();
    let provider = MockEmbeddingProvider::new(DIM)
        .with_vector(DEPRESSION_QUERY, topic_vector(axis::DEPRESSION, None));
    let store = MockVectorStore::new(DIM).with_points(seoul_points());

    let cache = match cache {
        Some(store) => EmbeddingCache::new(store, CacheConfig::default()),
        None => EmbeddingCache::disabled(),
    };
    let client = EmbeddingClient::new(provider, cache, EmbeddingClientConfig::default());

    Recommender::new(
        MockDirectory::new(directory),
        SemanticScorer::new(client, store),
        RecommenderConfig::default(),
    )
}

/// The canonical example request around Seoul City Hall.
pub fn example_request() -> RecommendationRequest {
    RecommendationRequest::new(CITY_HALL.latitude, CITY_HALL.longitude)
        .user_query(DEPRESSION_QUERY)
        .max_distance_km(10.0)
        .limit(5)
}
