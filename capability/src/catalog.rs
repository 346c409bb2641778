//! The graduate capability catalog.
//!
//! The catalog is loaded once per process and treated as immutable. The
//! standard catalog ships as data literals so deployments can replace it
//! with a YAML file without touching the scorer.

use serde::{Deserialize, Serialize};

use crate::types::{BloomBonus, BloomLevel, CapabilityDefinition};

/// Error types for catalog construction.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two definitions share a code
    #[error("Duplicate capability code: {0}")]
    DuplicateCode(String),

    /// A definition has no keywords to score with
    #[error("Capability {0} has no keywords")]
    EmptyKeywords(String),

    /// YAML parse failure
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Immutable catalog of capability definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityCatalog {
    definitions: Vec<CapabilityDefinition>,
}

impl CapabilityCatalog {
    /// Build a catalog from definitions, validating code uniqueness.
    pub fn new(definitions: Vec<CapabilityDefinition>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for def in &definitions {
            if !seen.insert(def.code.clone()) {
                return Err(CatalogError::DuplicateCode(def.code.clone()));
            }
            if def.keywords.is_empty() {
                return Err(CatalogError::EmptyKeywords(def.code.clone()));
            }
        }
        Ok(Self { definitions })
    }

    /// The standard six-entry graduate capability catalog.
    pub fn standard() -> Self {
        Self {
            definitions: vec![
                CapabilityDefinition {
                    id: "cap-apply-knowledge".to_string(),
                    code: "apply-knowledge".to_string(),
                    name: "Knowledge Application".to_string(),
                    keywords: vec![
                        "apply".to_string(),
                        "knowledge".to_string(),
                        "practical".to_string(),
                        "implement".to_string(),
                        "demonstrate".to_string(),
                    ],
                    bloom_bonus: Some(BloomBonus::at_levels(
                        5,
                        vec![BloomLevel::Apply, BloomLevel::Understand, BloomLevel::Remember],
                    )),
                },
                CapabilityDefinition {
                    id: "cap-innovation".to_string(),
                    code: "innovation".to_string(),
                    name: "Innovation and Creativity".to_string(),
                    keywords: vec![
                        "design".to_string(),
                        "innovative".to_string(),
                        "invent".to_string(),
                        "prototype".to_string(),
                        "original".to_string(),
                    ],
                    bloom_bonus: Some(BloomBonus::at_levels(
                        8,
                        vec![BloomLevel::Create, BloomLevel::Evaluate, BloomLevel::Analyze],
                    )),
                },
                CapabilityDefinition {
                    id: "cap-communication".to_string(),
                    code: "communication".to_string(),
                    name: "Communication".to_string(),
                    keywords: vec![
                        "communicate".to_string(),
                        "present".to_string(),
                        "write".to_string(),
                        "report".to_string(),
                        "explain".to_string(),
                        "discuss".to_string(),
                    ],
                    // Communication is relevant at every cognitive level
                    bloom_bonus: Some(BloomBonus::universal(2)),
                },
                CapabilityDefinition {
                    id: "cap-critical-thinking".to_string(),
                    code: "critical-thinking".to_string(),
                    name: "Critical Thinking".to_string(),
                    keywords: vec![
                        "analyse".to_string(),
                        "analyze".to_string(),
                        "evaluate".to_string(),
                        "critique".to_string(),
                        "justify".to_string(),
                        "interpret".to_string(),
                    ],
                    bloom_bonus: None,
                },
                CapabilityDefinition {
                    id: "cap-problem-solving".to_string(),
                    code: "problem-solving".to_string(),
                    name: "Problem Solving".to_string(),
                    keywords: vec![
                        "problem".to_string(),
                        "solve".to_string(),
                        "solution".to_string(),
                        "investigate".to_string(),
                        "troubleshoot".to_string(),
                    ],
                    bloom_bonus: None,
                },
                CapabilityDefinition {
                    id: "cap-teamwork".to_string(),
                    code: "teamwork".to_string(),
                    name: "Teamwork and Collaboration".to_string(),
                    keywords: vec![
                        "team".to_string(),
                        "collaborate".to_string(),
                        "group".to_string(),
                        "peer".to_string(),
                        "negotiate".to_string(),
                    ],
                    bloom_bonus: None,
                },
            ],
        }
    }

    /// Load a catalog from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<CapabilityDefinition> = serde_yaml::from_str(yaml)?;
        Self::new(definitions)
    }

    /// Serialize the definitions to YAML.
    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml::to_string(&self.definitions)?)
    }

    /// All definitions in declaration order.
    pub fn definitions(&self) -> &[CapabilityDefinition] {
        &self.definitions
    }

    /// Look up a definition by code.
    pub fn get(&self, code: &str) -> Option<&CapabilityDefinition> {
        self.definitions.iter().find(|d| d.code == code)
    }

    /// Check whether a code is in the catalog.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for CapabilityCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
