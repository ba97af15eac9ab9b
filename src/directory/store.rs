use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, instrument};

use super::error::DirectoryError;
use crate::model::{Candidate, Center, CenterType, GeoPoint};

/// Read-only source of candidate centers.
pub trait DirectoryStore: Send + Sync {
    /// Returns the centers within `max_distance_km` of `location`, nearest first.
    ///
    /// An empty `type_filter` matches every type.
    fn fetch_candidates(
        &self,
        location: &GeoPoint,
        max_distance_km: f64,
        type_filter: &[CenterType],
    ) -> impl std::future::Future<Output = Result<Vec<Candidate>, DirectoryError>> + Send;
}

/// Directory loaded once from a JSON array of centers and queried in memory.
#[derive(Debug, Clone)]
pub struct JsonDirectory {
    centers: Vec<Center>,
}

impl JsonDirectory {
    /// Reads and validates the directory file at `path`.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DirectoryError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let centers: Vec<Center> =
            serde_json::from_slice(&bytes).map_err(|source| DirectoryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), count = centers.len(), "loaded center directory");
        Self::from_centers(centers)
    }

    /// Builds a directory from in-memory records.
    ///
    /// Rejects duplicate ids and out-of-range coordinates.
    pub fn from_centers(centers: Vec<Center>) -> Result<Self, DirectoryError> {
        let mut seen = HashSet::with_capacity(centers.len());
        for center in &centers {
            if !seen.insert(center.id) {
                return Err(DirectoryError::InvalidCenter {
                    id: center.id,
                    reason: "duplicate id".to_string(),
                });
            }
            if !center.location.is_valid() {
                return Err(DirectoryError::InvalidCenter {
                    id: center.id,
                    reason: format!(
                        "location ({}, {}) out of range",
                        center.location.latitude, center.location.longitude
                    ),
                });
            }
        }
        Ok(Self { centers })
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    pub fn centers(&self) -> &[Center] {
        &self.centers
    }

    /// Synchronous core of [`DirectoryStore::fetch_candidates`].
    pub fn query(
        &self,
        location: &GeoPoint,
        max_distance_km: f64,
        type_filter: &[CenterType],
    ) -> Vec<Candidate> {
        let max_meters = max_distance_km * 1000.0;

        let mut candidates: Vec<Candidate> = self
            .centers
            .iter()
            .filter(|c| type_filter.is_empty() || type_filter.contains(&c.center_type))
            .map(|c| c.to_candidate(location))
            .filter(|c| c.distance_meters <= max_meters)
            .collect();

        // Stable: equal distances keep file order.
        candidates.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
        candidates
    }
}

impl DirectoryStore for JsonDirectory {
    #[instrument(skip(self), fields(centers = self.centers.len()))]
    async fn fetch_candidates(
        &self,
        location: &GeoPoint,
        max_distance_km: f64,
        type_filter: &[CenterType],
    ) -> Result<Vec<Candidate>, DirectoryError> {
        let candidates = self.query(location, max_distance_km, type_filter);
        debug!(count = candidates.len(), "candidates fetched");
        Ok(candidates)
    }
}
