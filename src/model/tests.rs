use super::*;
use crate::error::{ErrorClass, ErrorKind, RecommendError};

const SEOUL_CITY_HALL: GeoPoint = GeoPoint {
    latitude: 37.5665,
    longitude: 126.9780,
};

fn validation_field(err: RecommendError) -> &'static str {
    match err {
        RecommendError::Validation { field, .. } => field,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_distance_to_self_is_zero() {
    assert_eq!(SEOUL_CITY_HALL.distance_to(&SEOUL_CITY_HALL), 0.0);
}

#[test]
fn test_distance_city_hall_to_gangnam() {
    let gangnam = GeoPoint::new(37.4979, 127.0276);
    let d = SEOUL_CITY_HALL.distance_to(&gangnam);

    assert!((8_000.0..9_500.0).contains(&d), "got {d}");
    assert!((d - gangnam.distance_to(&SEOUL_CITY_HALL)).abs() < 1e-6);
}

#[test]
fn test_geo_point_validity() {
    assert!(SEOUL_CITY_HALL.is_valid());
    assert!(GeoPoint::new(90.0, -180.0).is_valid());
    assert!(!GeoPoint::new(90.1, 0.0).is_valid());
    assert!(!GeoPoint::new(0.0, 180.5).is_valid());
    assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
}

#[test]
fn test_center_type_serde() {
    let json = serde_json::to_string(&CenterType::SuicidePrevention).unwrap();
    assert_eq!(json, "\"suicide-prevention\"");

    let parsed: CenterType = serde_json::from_str("\"youth-counseling\"").unwrap();
    assert_eq!(parsed, CenterType::YouthCounseling);

    for t in CenterType::ALL {
        assert_eq!(
            serde_json::to_string(&t).unwrap(),
            format!("\"{}\"", t.as_str())
        );
    }
}

#[test]
fn test_center_to_candidate_computes_distance() {
    let center = Center {
        id: 7,
        name: "마포구정신건강복지센터".to_string(),
        center_type: CenterType::WelfareCenter,
        location: GeoPoint::new(37.5663, 126.9019),
        is_free_available: true,
        is_online_available: false,
        programs: vec!["우울증 상담".to_string()],
        embedding_vector: None,
    };

    let candidate = center.to_candidate(&SEOUL_CITY_HALL);
    assert_eq!(candidate.id, 7);
    assert!(candidate.distance_meters > 6_000.0 && candidate.distance_meters < 7_500.0);
    assert!(candidate.check().is_ok());
}

#[test]
fn test_candidate_check_rejects_bad_distance() {
    let center = Center {
        id: 1,
        name: "x".to_string(),
        center_type: CenterType::WelfareCenter,
        location: SEOUL_CITY_HALL,
        is_free_available: false,
        is_online_available: false,
        programs: vec![],
        embedding_vector: None,
    };
    let mut candidate = center.to_candidate(&SEOUL_CITY_HALL);

    candidate.distance_meters = -1.0;
    assert!(candidate.check().is_err());

    candidate.distance_meters = f64::INFINITY;
    assert!(candidate.check().is_err());
}

#[test]
fn test_center_deserializes_from_directory_json() {
    let json = r#"{
        "id": 3,
        "name": "서울시자살예방센터",
        "type": "suicide-prevention",
        "location": {"latitude": 37.56, "longitude": 126.97},
        "isFreeAvailable": true
    }"#;
    let center: Center = serde_json::from_str(json).unwrap();

    assert_eq!(center.center_type, CenterType::SuicidePrevention);
    assert!(center.is_free_available);
    assert!(!center.is_online_available);
    assert!(center.programs.is_empty());
    assert!(center.embedding_vector.is_none());
}

#[test]
fn test_weights_normalization() {
    let w = Weights::new(3.0, 1.0).normalized().unwrap();
    assert!((w.embedding - 0.75).abs() < 1e-12);
    assert!((w.rule - 0.25).abs() < 1e-12);
    assert!((w.sum() - 1.0).abs() < 1e-9);

    let w = Weights::new(0.0, 0.0).normalized().unwrap();
    assert_eq!(w, Weights::default());

    assert!(Weights::new(-0.1, 1.1).normalized().is_err());
    assert!(Weights::new(f64::NAN, 1.0).normalized().is_err());
}

#[test]
fn test_weights_normalize_huge_values() {
    let w = Weights::new(f64::MAX, f64::MAX).normalized().unwrap();
    assert!((w.embedding - 0.5).abs() < 1e-12);
    assert!((w.rule - 0.5).abs() < 1e-12);
    assert!((w.sum() - 1.0).abs() < 1e-9);

    let w = Weights::new(f64::MAX, 1.0).normalized().unwrap();
    assert!(w.embedding.is_finite() && w.rule.is_finite());
    assert!((w.embedding - 1.0).abs() < 1e-12);
    assert!((w.sum() - 1.0).abs() < 1e-9);

    let req = RecommendationRequest::new(37.5665, 126.9780)
        .weights(Weights::new(f64::MAX, f64::MAX))
        .validate()
        .unwrap();
    assert!((req.weights.sum() - 1.0).abs() < 1e-9);
}

#[test]
fn test_request_defaults() {
    let req = RecommendationRequest::new(37.5665, 126.9780).validate().unwrap();

    assert_eq!(req.limit, 5);
    assert_eq!(req.max_distance_km, 10.0);
    assert_eq!(req.max_distance_meters(), 10_000.0);
    assert_eq!(req.weights, Weights::default());
    assert!(req.user_query.is_none());
    assert!(req.filters.center_types.is_empty());
}

#[test]
fn test_request_limit_clamped() {
    let req = RecommendationRequest::new(37.5665, 126.9780)
        .limit(25)
        .validate()
        .unwrap();
    assert_eq!(req.limit, 20);
}

#[test]
fn test_request_zero_limit_rejected() {
    let err = RecommendationRequest::new(37.5665, 126.9780)
        .limit(0)
        .validate()
        .unwrap_err();
    assert_eq!(validation_field(err), "limit");
}

#[test]
fn test_request_coordinate_validation() {
    let err = RecommendationRequest::new(91.0, 126.9780)
        .validate()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(validation_field(err), "latitude");

    let err = RecommendationRequest::new(37.0, -181.0)
        .validate()
        .unwrap_err();
    assert_eq!(validation_field(err), "longitude");

    let err = RecommendationRequest::new(f64::NAN, 0.0)
        .validate()
        .unwrap_err();
    assert_eq!(validation_field(err), "latitude");
}

#[test]
fn test_request_distance_validation() {
    for km in [0.0, -3.0, 150.0, f64::INFINITY] {
        let err = RecommendationRequest::new(37.5665, 126.9780)
            .max_distance_km(km)
            .validate()
            .unwrap_err();
        assert_eq!(validation_field(err), "maxDistanceKm");
    }
}

#[test]
fn test_request_blank_query_is_absent() {
    let req = RecommendationRequest::new(37.5665, 126.9780)
        .user_query("   \n ")
        .validate()
        .unwrap();
    assert!(req.user_query.is_none());

    let req = RecommendationRequest::new(37.5665, 126.9780)
        .user_query("  우울증 상담 ")
        .validate()
        .unwrap();
    assert_eq!(req.user_query.as_deref(), Some("우울증 상담"));
}

#[test]
fn test_request_weights_normalized() {
    let req = RecommendationRequest::new(37.5665, 126.9780)
        .weights(Weights::new(0.6, 0.6))
        .validate()
        .unwrap();
    assert!((req.weights.embedding - 0.5).abs() < 1e-12);
    assert!((req.weights.sum() - 1.0).abs() < 1e-9);

    let err = RecommendationRequest::new(37.5665, 126.9780)
        .weights(Weights::new(-1.0, 2.0))
        .validate()
        .unwrap_err();
    assert_eq!(validation_field(err), "weights");
}

#[test]
fn test_request_symptoms_deduplicated() {
    let profile = UserProfile {
        symptoms: vec![Symptom::Anxiety, Symptom::Depression, Symptom::Anxiety],
        ..Default::default()
    };
    let req = RecommendationRequest::new(37.5665, 126.9780)
        .user_profile(profile)
        .validate()
        .unwrap();

    let symptoms = &req.user_profile.as_ref().unwrap().symptoms;
    assert_eq!(symptoms, &vec![Symptom::Depression, Symptom::Anxiety]);
}

#[test]
fn test_request_preferences() {
    let profile = UserProfile {
        preferred_counseling_type: Some(CounselingType::Online),
        prefer_free: true,
        ..Default::default()
    };
    let req = RecommendationRequest::new(37.5665, 126.9780)
        .user_profile(profile)
        .validate()
        .unwrap();
    assert!(req.wants_online());
    assert!(req.wants_free());

    let req = RecommendationRequest::new(37.5665, 126.9780)
        .filters(RecommendationFilters {
            center_types: vec![],
            prefer_online: true,
        })
        .validate()
        .unwrap();
    assert!(req.wants_online());
    assert!(!req.wants_free());
}

#[test]
fn test_request_deserializes_camel_case() {
    let json = r#"{
        "latitude": 37.5665,
        "longitude": 126.9780,
        "userQuery": "우울증 상담",
        "maxDistanceKm": 10,
        "limit": 5,
        "weights": {"embedding": 0.7, "rule": 0.3},
        "userProfile": {"symptoms": ["depression", "insomnia"], "preferFree": true},
        "filters": {"centerTypes": ["welfare-center"]}
    }"#;
    let req: RecommendationRequest = serde_json::from_str(json).unwrap();

    assert_eq!(req.user_query.as_deref(), Some("우울증 상담"));
    assert_eq!(req.max_distance_km, Some(10.0));
    assert_eq!(req.weights, Some(Weights::new(0.7, 0.3)));
    let profile = req.user_profile.unwrap();
    assert_eq!(profile.symptoms, vec![Symptom::Depression, Symptom::Insomnia]);
    assert!(profile.prefer_free);
    assert_eq!(
        req.filters.unwrap().center_types,
        vec![CenterType::WelfareCenter]
    );
}

#[test]
fn test_response_shape() {
    let center = Center {
        id: 11,
        name: "종로구정신건강복지센터".to_string(),
        center_type: CenterType::WelfareCenter,
        location: GeoPoint::new(37.5730, 126.9794),
        is_free_available: true,
        is_online_available: true,
        programs: vec![],
        embedding_vector: Some(vec![0.1, 0.2]),
    };
    let result = RecommendationResult {
        recommendations: vec![RankedCandidate {
            candidate: center.to_candidate(&SEOUL_CITY_HALL),
            scores: ScoreBreakdown {
                rule_based_score: 0.8,
                embedding_score: Some(0.6),
                total_score: 0.7,
                weights: Weights::default(),
            },
        }],
        metadata: RecommendationMetadata {
            algorithm: Algorithm::Hybrid,
            fallback_mode: false,
            degraded: false,
            degraded_reason: None,
            query_time_ms: 12,
            weights: Weights::default(),
            candidate_count: 1,
        },
    };

    let json = serde_json::to_value(RecommendationResponse::from(&result)).unwrap();

    assert_eq!(json["recommendations"][0]["centerId"], 11);
    assert_eq!(json["recommendations"][0]["centerName"], "종로구정신건강복지센터");
    assert_eq!(json["recommendations"][0]["totalScore"], 0.7);
    assert_eq!(json["recommendations"][0]["scores"]["ruleBasedScore"], 0.8);
    assert_eq!(json["recommendations"][0]["scores"]["embeddingScore"], 0.6);
    assert_eq!(json["metadata"]["algorithm"], "hybrid");
    assert_eq!(json["metadata"]["fallbackMode"], false);
    assert_eq!(json["metadata"]["queryTimeMs"], 12);
    assert_eq!(json["metadata"]["weights"]["embedding"], 0.5);
    assert!(json["metadata"].get("degradedReason").is_none());
    assert!(json["recommendations"][0].get("embeddingVector").is_none());
}
