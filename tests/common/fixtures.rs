//! Twenty Seoul-area centers with topic-axis vectors.

use haven::model::{Center, CenterType, GeoPoint};

pub const DIM: usize = 8;

pub const CITY_HALL: GeoPoint = GeoPoint {
    latitude: 37.5665,
    longitude: 126.9780,
};

pub const DEPRESSION_QUERY: &str = "우울증 상담";

/// Topic axes of the fixture embedding space.
pub mod axis {
    pub const DEPRESSION: usize = 0;
    pub const SUICIDE: usize = 1;
    pub const ADDICTION: usize = 2;
    pub const YOUTH: usize = 3;
    pub const CHILD: usize = 4;
    pub const TRAUMA: usize = 5;
}

pub fn topic_vector(primary: usize, secondary: Option<usize>) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[primary] = 1.0;
    if let Some(s) = secondary {
        v[s] = 0.5;
    }
    v
}

struct Row {
    id: u64,
    name: &'static str,
    center_type: CenterType,
    lat: f64,
    lng: f64,
    free: bool,
    online: bool,
    primary: usize,
    secondary: Option<usize>,
}

const ROWS: [Row; 20] = {
    use CenterType::*;
    use axis::*;

    [
        Row { id: 1, name: "중구 정신건강복지센터", center_type: WelfareCenter, lat: 37.5640, lng: 126.9975, free: true, online: false, primary: DEPRESSION, secondary: None },
        Row { id: 2, name: "종로구 정신건강복지센터", center_type: WelfareCenter, lat: 37.5730, lng: 126.9794, free: true, online: true, primary: DEPRESSION, secondary: Some(TRAUMA) },
        Row { id: 3, name: "서울시 자살예방센터", center_type: SuicidePrevention, lat: 37.5600, lng: 126.9700, free: true, online: true, primary: SUICIDE, secondary: Some(DEPRESSION) },
        Row { id: 4, name: "용산구 정신건강복지센터", center_type: WelfareCenter, lat: 37.5326, lng: 126.9905, free: false, online: false, primary: DEPRESSION, secondary: None },
        Row { id: 5, name: "마포구 중독관리통합지원센터", center_type: AddictionManagement, lat: 37.5663, lng: 126.9019, free: true, online: false, primary: ADDICTION, secondary: None },
        Row { id: 6, name: "서대문구 청소년상담복지센터", center_type: YouthCounseling, lat: 37.5791, lng: 126.9368, free: true, online: true, primary: YOUTH, secondary: Some(DEPRESSION) },
        Row { id: 7, name: "성북구 정신건강복지센터", center_type: WelfareCenter, lat: 37.5894, lng: 127.0167, free: false, online: true, primary: DEPRESSION, secondary: Some(TRAUMA) },
        Row { id: 8, name: "동대문구 아동보호전문기관", center_type: ChildProtection, lat: 37.5744, lng: 127.0396, free: true, online: false, primary: CHILD, secondary: None },
        Row { id: 9, name: "성동구 정신건강복지센터", center_type: WelfareCenter, lat: 37.5634, lng: 127.0369, free: true, online: false, primary: DEPRESSION, secondary: None },
        Row { id: 10, name: "영등포구 중독관리센터", center_type: AddictionManagement, lat: 37.5264, lng: 126.8962, free: false, online: false, primary: ADDICTION, secondary: Some(DEPRESSION) },
        Row { id: 11, name: "동작구 청소년상담복지센터", center_type: YouthCounseling, lat: 37.5124, lng: 126.9393, free: true, online: true, primary: YOUTH, secondary: None },
        Row { id: 12, name: "강남구 정신건강복지센터", center_type: WelfareCenter, lat: 37.4979, lng: 127.0276, free: false, online: true, primary: DEPRESSION, secondary: None },
        Row { id: 13, name: "광진구 자살예방센터", center_type: SuicidePrevention, lat: 37.5385, lng: 127.0823, free: true, online: false, primary: SUICIDE, secondary: None },
        Row { id: 14, name: "은평구 아동보호전문기관", center_type: ChildProtection, lat: 37.6027, lng: 126.9291, free: true, online: false, primary: CHILD, secondary: Some(TRAUMA) },
        Row { id: 15, name: "강북구 정신건강복지센터", center_type: WelfareCenter, lat: 37.6396, lng: 127.0257, free: true, online: false, primary: DEPRESSION, secondary: Some(SUICIDE) },
        Row { id: 16, name: "노원구 청소년상담복지센터", center_type: YouthCounseling, lat: 37.6542, lng: 127.0568, free: true, online: true, primary: YOUTH, secondary: None },
        Row { id: 17, name: "인천 정신건강복지센터", center_type: WelfareCenter, lat: 37.4563, lng: 126.7052, free: true, online: false, primary: DEPRESSION, secondary: None },
        Row { id: 18, name: "수원시 자살예방센터", center_type: SuicidePrevention, lat: 37.2636, lng: 127.0286, free: true, online: true, primary: SUICIDE, secondary: Some(DEPRESSION) },
        Row { id: 19, name: "성남시 중독관리센터", center_type: AddictionManagement, lat: 37.4200, lng: 127.1265, free: false, online: false, primary: ADDICTION, secondary: None },
        Row { id: 20, name: "고양시 청소년상담복지센터", center_type: YouthCounseling, lat: 37.6584, lng: 126.8320, free: true, online: true, primary: YOUTH, secondary: None },
    ]
};

pub fn seoul_centers() -> Vec<Center> {
    ROWS.iter()
        .map(|r| Center {
            id: r.id,
            name: r.name.to_string(),
            center_type: r.center_type,
            location: GeoPoint::new(r.lat, r.lng),
            is_free_available: r.free,
            is_online_available: r.online,
            programs: vec![],
            embedding_vector: Some(topic_vector(r.primary, r.secondary)),
        })
        .collect()
}

/// `(id, vector)` pairs as stored in the vector store.
pub fn seoul_points() -> Vec<(u64, Vec<f32>)> {
    seoul_centers()
        .into_iter()
        .filter_map(|c| c.embedding_vector.map(|v| (c.id, v)))
        .collect()
}
