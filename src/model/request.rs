use serde::{Deserialize, Serialize};

use super::center::GeoPoint;
use super::profile::{RecommendationFilters, UserProfile};
use crate::constants::{
    DEFAULT_EMBEDDING_WEIGHT, DEFAULT_LIMIT, DEFAULT_MAX_DISTANCE_KM, DEFAULT_RULE_WEIGHT,
    MAX_DISTANCE_KM, MAX_LIMIT, MAX_PROFILE_SYMPTOMS,
};
use crate::error::RecommendError;

/// Fusion weights between the two scorers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub embedding: f64,
    pub rule: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            embedding: DEFAULT_EMBEDDING_WEIGHT,
            rule: DEFAULT_RULE_WEIGHT,
        }
    }
}

impl Weights {
    pub fn new(embedding: f64, rule: f64) -> Self {
        Self { embedding, rule }
    }

    /// Scales the pair so it sums to one.
    ///
    /// Negative or non-finite components are rejected. A zero sum carries no preference and
    /// yields the defaults.
    pub fn normalized(&self) -> Result<Weights, String> {
        if !self.embedding.is_finite() || !self.rule.is_finite() {
            return Err("weights must be finite numbers".to_string());
        }
        if self.embedding < 0.0 || self.rule < 0.0 {
            return Err("weights must not be negative".to_string());
        }

        // Scale into [0, 1] before summing so large finite weights cannot overflow.
        let scale = self.embedding.max(self.rule);
        if scale == 0.0 {
            return Ok(Weights::default());
        }

        let (embedding, rule) = (self.embedding / scale, self.rule / scale);
        let sum = embedding + rule;
        Ok(Weights {
            embedding: embedding / sum,
            rule: rule / sum,
        })
    }

    pub fn sum(&self) -> f64 {
        self.embedding + self.rule
    }
}

/// Inbound request as received from a routing layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub user_query: Option<String>,
    #[serde(default)]
    pub max_distance_km: Option<f64>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub weights: Option<Weights>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub filters: Option<RecommendationFilters>,
}

impl RecommendationRequest {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Default::default()
        }
    }

    pub fn user_query(mut self, query: impl Into<String>) -> Self {
        self.user_query = Some(query.into());
        self
    }

    pub fn max_distance_km(mut self, km: f64) -> Self {
        self.max_distance_km = Some(km);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn weights(mut self, weights: Weights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn user_profile(mut self, profile: UserProfile) -> Self {
        self.user_profile = Some(profile);
        self
    }

    pub fn filters(mut self, filters: RecommendationFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Validates and normalizes the request.
    ///
    /// Coordinates, distance, weights and profile size are checked; `limit` is clamped to
    /// [`MAX_LIMIT`]; a blank query counts as absent.
    pub fn validate(self) -> Result<ValidatedRequest, RecommendError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(RecommendError::validation(
                "latitude",
                format!("{} is outside -90..=90", self.latitude),
            ));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(RecommendError::validation(
                "longitude",
                format!("{} is outside -180..=180", self.longitude),
            ));
        }

        let max_distance_km = self.max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM);
        if !max_distance_km.is_finite() || max_distance_km <= 0.0 || max_distance_km > MAX_DISTANCE_KM
        {
            return Err(RecommendError::validation(
                "maxDistanceKm",
                format!("{max_distance_km} is outside (0, {MAX_DISTANCE_KM}]"),
            ));
        }

        let limit = match self.limit {
            Some(0) => {
                return Err(RecommendError::validation(
                    "limit",
                    "must be at least 1",
                ));
            }
            Some(n) => n.min(MAX_LIMIT),
            None => DEFAULT_LIMIT,
        };

        let weights = match self.weights {
            Some(w) => w
                .normalized()
                .map_err(|reason| RecommendError::validation("weights", reason))?,
            None => Weights::default(),
        };

        let user_profile = match self.user_profile {
            Some(mut profile) => {
                profile.dedup_symptoms();
                if profile.symptoms.len() > MAX_PROFILE_SYMPTOMS {
                    return Err(RecommendError::validation(
                        "userProfile.symptoms",
                        format!("at most {MAX_PROFILE_SYMPTOMS} symptoms are allowed"),
                    ));
                }
                Some(profile)
            }
            None => None,
        };

        let user_query = self
            .user_query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        Ok(ValidatedRequest {
            location: GeoPoint::new(self.latitude, self.longitude),
            user_query,
            max_distance_km,
            limit,
            weights,
            user_profile,
            filters: self.filters.unwrap_or_default(),
        })
    }
}

/// A request that passed validation; every field is in range.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub location: GeoPoint,
    pub user_query: Option<String>,
    pub max_distance_km: f64,
    pub limit: usize,
    /// Already normalized to sum to one.
    pub weights: Weights,
    pub user_profile: Option<UserProfile>,
    pub filters: RecommendationFilters,
}

impl ValidatedRequest {
    pub fn max_distance_meters(&self) -> f64 {
        self.max_distance_km * 1000.0
    }

    /// Returns `true` if either the profile or the filters ask for online counseling.
    pub fn wants_online(&self) -> bool {
        self.filters.prefer_online
            || self
                .user_profile
                .as_ref()
                .is_some_and(UserProfile::prefers_online)
    }

    pub fn wants_free(&self) -> bool {
        self.user_profile.as_ref().is_some_and(|p| p.prefer_free)
    }
}
