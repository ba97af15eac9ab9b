use qdrant_client::qdrant::ScoredPoint;
use qdrant_client::qdrant::point_id::PointIdOptions;

use super::VectorDbError;
use crate::model::CenterId;

/// One nearest-neighbour result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityHit {
    pub candidate_id: CenterId,
    /// Cosine similarity in `[-1, 1]`.
    pub similarity: f32,
}

impl SimilarityHit {
    pub fn new(candidate_id: CenterId, similarity: f32) -> Self {
        Self {
            candidate_id,
            similarity,
        }
    }

    /// Converts a Qdrant point; `None` for non-numeric ids.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let id = match point.id.and_then(|pid| pid.point_id_options) {
            Some(PointIdOptions::Num(n)) => n,
            _ => return None,
        };

        Some(Self {
            candidate_id: id,
            similarity: point.score,
        })
    }
}

/// Rejects empty, wrong-length or non-finite query vectors.
pub fn check_query_vector(vector: &[f32], dimension: usize) -> Result<(), VectorDbError> {
    if vector.is_empty() {
        return Err(VectorDbError::InvalidQueryVector {
            reason: "vector is empty".to_string(),
        });
    }
    if vector.len() != dimension {
        return Err(VectorDbError::InvalidDimension {
            expected: dimension,
            actual: vector.len(),
        });
    }
    if let Some(pos) = vector.iter().position(|v| !v.is_finite()) {
        return Err(VectorDbError::InvalidQueryVector {
            reason: format!("non-finite value at index {pos}"),
        });
    }
    Ok(())
}
