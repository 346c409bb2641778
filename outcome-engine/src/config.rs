//! Configuration for the engine.

use serde::{Deserialize, Serialize};

/// Configuration for an [`crate::OutcomeEngine`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// How many suggestions to compute per outcome
    pub suggestion_count: usize,
    /// Whether to re-fetch each material's detail (local outcomes and
    /// mapped outcome ids) after the unit-level listing
    pub hydrate_material_detail: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            suggestion_count: 3,
            hydrate_material_detail: true,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the suggestion count.
    pub fn with_suggestion_count(mut self, count: usize) -> Self {
        self.suggestion_count = count;
        self
    }

    /// Enable or disable material detail hydration.
    pub fn with_material_detail(mut self, hydrate: bool) -> Self {
        self.hydrate_material_detail = hydrate;
        self
    }

    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
