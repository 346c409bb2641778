//! Domain records served by the content-management API.
//!
//! Field names follow the wire contract (camelCase JSON). Records are
//! created server-side and read-only to this client, apart from the
//! capability-mapping write payload.

use serde::{Deserialize, Serialize};

use capability::BloomLevel;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A unit-level learning outcome, the root of the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Unique identifier
    pub id: String,
    /// Display code (e.g. "ULO1")
    pub code: String,
    /// Free-text description
    pub description: String,
    /// Bloom taxonomy level
    pub bloom_level: BloomLevel,
    /// Number of materials mapped to this outcome
    pub material_count: u32,
    /// Number of assessments mapped to this outcome
    pub assessment_count: u32,
}

impl Outcome {
    /// Create an outcome record.
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
        bloom_level: BloomLevel,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            description: description.into(),
            bloom_level,
            material_count: 0,
            assessment_count: 0,
        }
    }

    /// Set material and assessment counts.
    pub fn with_counts(mut self, materials: u32, assessments: u32) -> Self {
        self.material_count = materials;
        self.assessment_count = assessments;
        self
    }
}

/// A learning material owned by the content-management subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Unique identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Material type (e.g. "lecture", "reading")
    pub material_type: String,
    /// Week number the material is scheduled in (positive)
    pub week: u32,
    /// Duration in minutes, if known
    pub duration_minutes: Option<u32>,
    /// Outcome ids this material is mapped to
    pub outcome_ids: Vec<String>,
    /// Local outcomes, in authoring order
    pub local_outcomes: Vec<LocalOutcome>,
}

impl Material {
    /// Create a material record.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        material_type: impl Into<String>,
        week: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            material_type: material_type.into(),
            week,
            duration_minutes: None,
            outcome_ids: vec![],
            local_outcomes: vec![],
        }
    }

    /// Set the mapped outcome ids.
    pub fn with_outcomes(mut self, outcome_ids: Vec<String>) -> Self {
        self.outcome_ids = outcome_ids;
        self
    }

    /// Set the local outcomes.
    pub fn with_local_outcomes(mut self, local_outcomes: Vec<LocalOutcome>) -> Self {
        self.local_outcomes = local_outcomes;
        self
    }

    /// Set the duration in minutes.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }
}

/// A material-local outcome, owned by exactly one material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct LocalOutcome {
    /// Unique identifier
    pub id: String,
    /// Free-text description
    pub description: String,
}

impl LocalOutcome {
    /// Create a local outcome record.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

/// A capability mapping saved on the server for one outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SavedMapping {
    /// Capability code
    pub capability_code: String,
}

/// Payload for persisting an outcome's capability mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct MappingWrite {
    /// Full replacement set of capability codes
    pub capability_codes: Vec<String>,
    /// Whether the codes were accepted straight from suggestions
    pub is_ai_suggested: bool,
}
