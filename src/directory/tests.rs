use std::io::Write;

use super::*;
use crate::error::{ErrorClass, ErrorKind};
use crate::model::{Center, CenterType, GeoPoint};

const CITY_HALL: GeoPoint = GeoPoint {
    latitude: 37.5665,
    longitude: 126.9780,
};

fn center(id: u64, center_type: CenterType, lat: f64, lng: f64) -> Center {
    Center {
        id,
        name: format!("center-{id}"),
        center_type,
        location: GeoPoint::new(lat, lng),
        is_free_available: false,
        is_online_available: false,
        programs: vec![],
        embedding_vector: None,
    }
}

fn sample_directory() -> JsonDirectory {
    JsonDirectory::from_centers(vec![
        // ~6.7 km west
        center(1, CenterType::WelfareCenter, 37.5663, 126.9019),
        // ~0.7 km north
        center(2, CenterType::SuicidePrevention, 37.5730, 126.9794),
        // Busan, far outside any default radius
        center(3, CenterType::WelfareCenter, 35.1796, 129.0756),
        // ~8.8 km south-east
        center(4, CenterType::YouthCounseling, 37.4979, 127.0276),
    ])
    .unwrap()
}

#[tokio::test]
async fn test_fetch_filters_by_distance_and_sorts() {
    let dir = sample_directory();
    let found = dir.fetch_candidates(&CITY_HALL, 10.0, &[]).await.unwrap();

    let ids: Vec<u64> = found.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 1, 4]);
    assert!(found.windows(2).all(|w| w[0].distance_meters <= w[1].distance_meters));
    assert!(found.iter().all(|c| c.distance_meters <= 10_000.0));
}

#[tokio::test]
async fn test_fetch_applies_type_filter() {
    let dir = sample_directory();
    let found = dir
        .fetch_candidates(&CITY_HALL, 10.0, &[CenterType::WelfareCenter])
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 1);
}

#[tokio::test]
async fn test_fetch_small_radius() {
    let dir = sample_directory();
    let found = dir.fetch_candidates(&CITY_HALL, 1.0, &[]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
}

#[test]
fn test_duplicate_ids_rejected() {
    let err = JsonDirectory::from_centers(vec![
        center(1, CenterType::WelfareCenter, 37.0, 127.0),
        center(1, CenterType::ChildProtection, 37.1, 127.1),
    ])
    .unwrap_err();

    assert!(matches!(err, DirectoryError::InvalidCenter { id: 1, .. }));
    assert_eq!(err.kind(), ErrorKind::Directory);
}

#[test]
fn test_invalid_location_rejected() {
    let err = JsonDirectory::from_centers(vec![center(9, CenterType::WelfareCenter, 95.0, 127.0)])
        .unwrap_err();
    assert!(matches!(err, DirectoryError::InvalidCenter { id: 9, .. }));
}

#[tokio::test]
async fn test_from_path_reads_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"id": 1, "name": "a", "type": "welfare-center",
              "location": {{"latitude": 37.5663, "longitude": 126.9019}},
              "isFreeAvailable": true}},
            {{"id": 2, "name": "b", "type": "child-protection",
              "location": {{"latitude": 37.5730, "longitude": 126.9794}}}}
        ]"#
    )
    .unwrap();

    let dir = JsonDirectory::from_path(file.path()).await.unwrap();
    assert_eq!(dir.len(), 2);
    assert!(dir.centers()[0].is_free_available);
}

#[tokio::test]
async fn test_from_path_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonDirectory::from_path(dir.path().join("nope.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::Io { .. }));
}

#[tokio::test]
async fn test_from_path_bad_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"centers\": 3}}").unwrap();

    let err = JsonDirectory::from_path(file.path()).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Parse { .. }));
}

#[tokio::test]
async fn test_mock_directory_failure() {
    let mock = MockDirectory::new(sample_directory());
    assert_eq!(
        mock.fetch_candidates(&CITY_HALL, 10.0, &[]).await.unwrap().len(),
        3
    );

    mock.set_failing(true);
    let err = mock.fetch_candidates(&CITY_HALL, 10.0, &[]).await.unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(mock.call_count(), 2);
}
