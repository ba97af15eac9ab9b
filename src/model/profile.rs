use serde::{Deserialize, Serialize};

use super::center::CenterType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Child,
    Teen,
    Youth,
    Adult,
    Senior,
}

/// Enumerated symptom tags a user may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    Depression,
    Anxiety,
    Stress,
    Insomnia,
    SuicidalThoughts,
    SelfHarm,
    Addiction,
    Trauma,
    FamilyConflict,
    SchoolIssues,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounselingType {
    InPerson,
    Phone,
    Online,
}

/// Caller-supplied profile; immutable within a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub age_group: Option<AgeGroup>,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
    #[serde(default)]
    pub preferred_counseling_type: Option<CounselingType>,
    #[serde(default)]
    pub prefer_free: bool,
}

impl UserProfile {
    /// Returns `true` if the user asked for online counseling.
    pub fn prefers_online(&self) -> bool {
        self.preferred_counseling_type == Some(CounselingType::Online)
    }

    /// Sorts and deduplicates the symptom tags.
    pub(crate) fn dedup_symptoms(&mut self) {
        self.symptoms.sort_unstable();
        self.symptoms.dedup();
    }
}

/// Structured filters applied on top of the location query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationFilters {
    /// Restrict to these types; empty means any type.
    #[serde(default)]
    pub center_types: Vec<CenterType>,
    /// Favor centers offering online counseling.
    #[serde(default)]
    pub prefer_online: bool,
}
