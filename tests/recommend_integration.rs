//! End-to-end recommendation tests over the Seoul fixture.

mod common;

use std::sync::Arc;
use std::time::Duration;

use haven::cache::{CacheStore, MockCacheStore, MokaCacheStore};
use haven::embedding::MockFailure;
use haven::error::{ErrorClass, ErrorKind, RecommendError};
use haven::model::{
    Algorithm, CenterType, RecommendationRequest, RecommendationResponse, Symptom, UserProfile,
    Weights,
};
use haven::recommend::HealthState;
use haven::vectordb::MockStoreFailure;
use tokio_util::sync::CancellationToken;

use common::fixtures::CITY_HALL;
use common::{example_request, recommender};

fn scores(result: &haven::model::RecommendationResult) -> Vec<(u64, f64)> {
    result
        .recommendations
        .iter()
        .map(|r| (r.candidate.id, r.scores.total_score))
        .collect()
}

#[tokio::test]
async fn test_example_request_is_hybrid_top_five() {
    let rec = recommender(None);
    let result = rec
        .recommend(example_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.len(), 5);
    assert_eq!(result.metadata.algorithm, Algorithm::Hybrid);
    assert!(!result.metadata.fallback_mode);
    assert!(result.top().unwrap().candidate.distance_meters <= 10_000.0);
    assert_eq!(result.metadata.candidate_count, 15);

    // Depression-focused centers nearby should lead.
    let top = &result.top().unwrap().candidate;
    assert_eq!(top.center_type, CenterType::WelfareCenter);
}

#[tokio::test]
async fn test_provider_failure_falls_back_to_rule_based() {
    let rec = recommender(None);
    rec.semantic()
        .embedder()
        .provider()
        .set_always_fail(Some(MockFailure::Provider));

    let result = rec
        .recommend(example_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.metadata.algorithm, Algorithm::RuleBased);
    assert!(result.metadata.fallback_mode);
    assert!(result.metadata.degraded);
    assert_eq!(
        result.metadata.degraded_reason.as_deref(),
        Some(ErrorKind::EmbeddingProvider.code())
    );
    assert!(!result.is_empty());
    // One attempt plus two retries.
    assert_eq!(rec.semantic().embedder().provider().call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_exhaustion_falls_back() {
    let rec = recommender(None);
    rec.semantic()
        .embedder()
        .provider()
        .set_always_fail(Some(MockFailure::RateLimited(Duration::from_secs(1))));

    let result = rec
        .recommend(example_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.metadata.fallback_mode);
    assert_eq!(
        result.metadata.degraded_reason.as_deref(),
        Some("RATE_LIMIT_EXCEEDED")
    );
    assert_eq!(result.len(), 5);
}

#[tokio::test]
async fn test_vector_store_outage_falls_back() {
    let rec = recommender(None);
    rec.semantic()
        .store()
        .set_failure(Some(MockStoreFailure::Unreachable));

    let result = rec
        .recommend(example_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(result.metadata.algorithm, Algorithm::RuleBased);
    assert_eq!(result.len(), 5);
}

#[tokio::test]
async fn test_limit_is_clamped_to_twenty() {
    let rec = recommender(None);
    let request = example_request().max_distance_km(100.0).limit(25);
    let result = rec.recommend(request, &CancellationToken::new()).await.unwrap();

    assert_eq!(result.len(), 20);
}

#[tokio::test]
async fn test_cache_failure_does_not_change_scores() {
    let baseline = recommender(None)
        .recommend(example_request(), &CancellationToken::new())
        .await
        .unwrap();

    let failing = Arc::new(MockCacheStore::new());
    failing.set_failing(true);
    let rec = recommender(Some(failing.clone() as Arc<dyn CacheStore>));
    let result = rec
        .recommend(example_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(scores(&baseline), scores(&result));
    assert_eq!(result.metadata.algorithm, Algorithm::Hybrid);
    assert!(failing.get_count() >= 1);
}

#[tokio::test]
async fn test_cached_embedding_skips_provider() {
    let store: Arc<dyn CacheStore> = Arc::new(MokaCacheStore::new());
    let rec = recommender(Some(store));

    let first = rec
        .recommend(example_request(), &CancellationToken::new())
        .await
        .unwrap();
    let second = rec
        .recommend(
            example_request().user_query("  우울증   상담 "),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(rec.semantic().embedder().provider().call_count(), 1);
    assert_eq!(scores(&first), scores(&second));
}

#[tokio::test]
async fn test_ordering_is_deterministic() {
    let rec = recommender(None);
    let mut runs = Vec::new();
    for _ in 0..5 {
        let result = rec
            .recommend(example_request().limit(20), &CancellationToken::new())
            .await
            .unwrap();
        runs.push(scores(&result));
    }

    assert!(runs.windows(2).all(|w| w[0] == w[1]));

    let first = &runs[0];
    assert!(first.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[tokio::test]
async fn test_ties_break_by_distance() {
    let rec = recommender(None);
    let result = rec
        .recommend(example_request().limit(20), &CancellationToken::new())
        .await
        .unwrap();

    for w in result.recommendations.windows(2) {
        if w[0].scores.total_score == w[1].scores.total_score {
            assert!(w[0].candidate.distance_meters <= w[1].candidate.distance_meters);
        }
    }
}

#[tokio::test]
async fn test_total_is_weighted_sum() {
    let rec = recommender(None);
    let weights = Weights::new(3.0, 1.0);
    let result = rec
        .recommend(
            example_request().weights(weights).limit(20),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    let used = result.metadata.weights;
    assert!((used.embedding - 0.75).abs() < 1e-12);
    assert!((used.sum() - 1.0).abs() < 1e-9);

    for r in &result.recommendations {
        let s = r.scores;
        let expected = used.rule * s.rule_based_score + used.embedding * s.embedding_score.unwrap();
        assert!((s.total_score - expected).abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_scores_are_bounded() {
    let rec = recommender(None);
    let profile = UserProfile {
        symptoms: vec![Symptom::Depression, Symptom::Insomnia, Symptom::Depression],
        prefer_free: true,
        ..Default::default()
    };
    let result = rec
        .recommend(
            example_request()
                .max_distance_km(100.0)
                .limit(20)
                .user_profile(profile),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    for r in &result.recommendations {
        assert!((0.0..=1.0).contains(&r.scores.rule_based_score));
        assert!((0.0..=1.0).contains(&r.scores.total_score));
        assert!(
            r.scores
                .embedding_score
                .is_some_and(|e| (0.0..=1.0).contains(&e))
        );
    }
}

#[tokio::test]
async fn test_without_query_is_rule_based() {
    let rec = recommender(None);
    let request = RecommendationRequest::new(CITY_HALL.latitude, CITY_HALL.longitude);
    let result = rec.recommend(request, &CancellationToken::new()).await.unwrap();

    assert_eq!(result.metadata.algorithm, Algorithm::RuleBased);
    assert!(result.metadata.fallback_mode);
    assert!(!result.metadata.degraded);
    assert_eq!(result.len(), 5);
    assert_eq!(rec.semantic().embedder().provider().call_count(), 0);
}

#[tokio::test]
async fn test_invalid_coordinates_are_client_errors() {
    let rec = recommender(None);
    let err = rec
        .recommend(
            RecommendationRequest::new(37.5, 200.0),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RecommendError::Validation {
            field: "longitude",
            ..
        }
    ));
    assert_eq!(err.kind().http_status(), 400);
}

#[tokio::test(start_paused = true)]
async fn test_slow_semantic_path_degrades() {
    let rec = recommender(None);
    rec.semantic()
        .store()
        .set_delay(Some(Duration::from_secs(60)));

    let result = rec
        .recommend(example_request(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.metadata.degraded);
    assert_eq!(result.metadata.algorithm, Algorithm::RuleBased);
    assert_eq!(result.len(), 5);
}

#[tokio::test]
async fn test_cancelled_request_errors() {
    let rec = recommender(None);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = rec.recommend(example_request(), &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(err.kind().http_status(), 499);
}

#[tokio::test]
async fn test_response_json_shape() {
    let rec = recommender(None);
    let result = rec
        .recommend(example_request(), &CancellationToken::new())
        .await
        .unwrap();

    let json = serde_json::to_value(RecommendationResponse::from(&result)).unwrap();
    let first = &json["recommendations"][0];
    assert!(first["centerId"].is_u64());
    assert!(first["centerName"].is_string());
    assert!(first["totalScore"].is_f64());
    assert!(first["scores"]["ruleBasedScore"].is_f64());
    assert!(first["scores"]["embeddingScore"].is_f64());
    assert_eq!(json["metadata"]["algorithm"], "hybrid");
    assert_eq!(json["metadata"]["fallbackMode"], false);
    assert!(json["metadata"]["queryTimeMs"].is_u64());
    assert_eq!(json["metadata"]["weights"]["embedding"], 0.5);
}

#[tokio::test]
async fn test_health_reports_components() {
    let rec = recommender(None);
    assert_eq!(rec.check_health().await.status, HealthState::Healthy);

    rec.semantic()
        .store()
        .set_failure(Some(MockStoreFailure::Unreachable));
    let health = rec.check_health().await;
    assert_eq!(health.status, HealthState::Degraded);
    assert_eq!(health.components.vector_db.status, HealthState::Unavailable);

    rec.semantic()
        .embedder()
        .provider()
        .set_probe_failure(Some(MockFailure::Provider));
    assert_eq!(rec.check_health().await.status, HealthState::Unavailable);
}
