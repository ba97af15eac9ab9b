use serde::{Deserialize, Serialize};

/// Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Directory-wide center identifier (also the vector store point id).
pub type CenterId = u64;

/// Kind of mental-health center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CenterType {
    WelfareCenter,
    SuicidePrevention,
    AddictionManagement,
    YouthCounseling,
    ChildProtection,
}

impl CenterType {
    pub const ALL: [CenterType; 5] = [
        CenterType::WelfareCenter,
        CenterType::SuicidePrevention,
        CenterType::AddictionManagement,
        CenterType::YouthCounseling,
        CenterType::ChildProtection,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CenterType::WelfareCenter => "welfare-center",
            CenterType::SuicidePrevention => "suicide-prevention",
            CenterType::AddictionManagement => "addiction-management",
            CenterType::YouthCounseling => "youth-counseling",
            CenterType::ChildProtection => "child-protection",
        }
    }
}

impl std::fmt::Display for CenterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if both coordinates are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Great-circle distance in meters (haversine).
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();

        EARTH_RADIUS_METERS * c
    }
}

/// A center as stored in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Center {
    pub id: CenterId,
    pub name: String,
    #[serde(rename = "type")]
    pub center_type: CenterType,
    pub location: GeoPoint,
    #[serde(default)]
    pub is_free_available: bool,
    #[serde(default)]
    pub is_online_available: bool,
    #[serde(default)]
    pub programs: Vec<String>,
    /// Precomputed vector; owned by the vector store, read-only here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_vector: Option<Vec<f32>>,
}

impl Center {
    /// Snapshots this center as a candidate relative to `origin`.
    pub fn to_candidate(&self, origin: &GeoPoint) -> Candidate {
        Candidate {
            id: self.id,
            name: self.name.clone(),
            center_type: self.center_type,
            location: self.location,
            distance_meters: origin.distance_to(&self.location),
            is_free_available: self.is_free_available,
            is_online_available: self.is_online_available,
            programs: self.programs.clone(),
            embedding_vector: self.embedding_vector.clone(),
        }
    }
}

/// One center under consideration for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CenterId,
    pub name: String,
    #[serde(rename = "type")]
    pub center_type: CenterType,
    pub location: GeoPoint,
    pub distance_meters: f64,
    pub is_free_available: bool,
    pub is_online_available: bool,
    #[serde(default)]
    pub programs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_vector: Option<Vec<f32>>,
}

impl Candidate {
    /// Checks the attributes the scorers rely on.
    pub fn check(&self) -> Result<(), String> {
        if !self.distance_meters.is_finite() || self.distance_meters < 0.0 {
            return Err(format!(
                "candidate {} has invalid distance {}",
                self.id, self.distance_meters
            ));
        }
        if !self.location.is_valid() {
            return Err(format!(
                "candidate {} has invalid location ({}, {})",
                self.id, self.location.latitude, self.location.longitude
            ));
        }
        Ok(())
    }
}
