//! Core types for the capability catalog.
//!
//! These types model the fixed graduate-capability definitions and the
//! bloom taxonomy they are scored against.
//!
//! With the `typescript` feature enabled, these types can be exported to
//! TypeScript using ts-rs for consistency with the frontend.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Bloom cognitive taxonomy level attached to a learning outcome.
///
/// Fixed six-level hierarchy from lowest to highest cognitive demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum BloomLevel {
    /// Recall facts and basic concepts
    Remember = 1,
    /// Explain ideas or concepts
    Understand = 2,
    /// Use information in new situations
    Apply = 3,
    /// Draw connections among ideas
    Analyze = 4,
    /// Justify a stand or decision
    Evaluate = 5,
    /// Produce new or original work
    Create = 6,
}

impl BloomLevel {
    /// Parse a level from free text, case-insensitively.
    ///
    /// Outcome records arrive with the level as a plain string; anything
    /// outside the fixed taxonomy yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "remember" => Some(Self::Remember),
            "understand" => Some(Self::Understand),
            "apply" => Some(Self::Apply),
            "analyze" => Some(Self::Analyze),
            "evaluate" => Some(Self::Evaluate),
            "create" => Some(Self::Create),
            _ => None,
        }
    }

    /// Get the normalized lowercase form used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Remember => "remember",
            Self::Understand => "understand",
            Self::Apply => "apply",
            Self::Analyze => "analyze",
            Self::Evaluate => "evaluate",
            Self::Create => "create",
        }
    }

    /// All levels in ascending cognitive order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Remember,
            Self::Understand,
            Self::Apply,
            Self::Analyze,
            Self::Evaluate,
            Self::Create,
        ]
    }
}

/// A graduate capability definition.
///
/// Definitions are data, not code: the catalog can grow without touching
/// the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct CapabilityDefinition {
    /// Unique identifier
    pub id: String,
    /// Unique short code used in mappings
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Keywords matched against outcome text, in declaration order
    pub keywords: Vec<String>,
    /// Optional bloom-level bonus rule
    pub bloom_bonus: Option<BloomBonus>,
}

/// Bonus points granted when an outcome's bloom level matches a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct BloomBonus {
    /// Points added to the keyword score
    pub points: u32,
    /// Levels the bonus applies at; `None` means every level
    pub levels: Option<Vec<BloomLevel>>,
}

impl BloomBonus {
    /// Bonus restricted to the given levels.
    pub fn at_levels(points: u32, levels: Vec<BloomLevel>) -> Self {
        Self {
            points,
            levels: Some(levels),
        }
    }

    /// Bonus granted at every bloom level.
    pub fn universal(points: u32) -> Self {
        Self {
            points,
            levels: None,
        }
    }

    /// Check whether the bonus applies at a level.
    pub fn applies_at(&self, level: BloomLevel) -> bool {
        match &self.levels {
            Some(levels) => levels.contains(&level),
            None => true,
        }
    }
}

/// A scored capability suggestion for one outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Suggestion {
    /// Capability code
    pub code: String,
    /// Capability name for display
    pub name: String,
    /// Combined keyword + bloom score
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bloom_parse() {
        assert_eq!(BloomLevel::parse("Apply"), Some(BloomLevel::Apply));
        assert_eq!(BloomLevel::parse("  CREATE "), Some(BloomLevel::Create));
        assert_eq!(BloomLevel::parse("synthesize"), None);
    }

    #[test]
    fn test_bloom_ordering() {
        assert!(BloomLevel::Create > BloomLevel::Remember);
        assert_eq!(BloomLevel::all().len(), 6);
    }

    #[test]
    fn test_bonus_applicability() {
        let restricted = BloomBonus::at_levels(5, vec![BloomLevel::Apply, BloomLevel::Remember]);
        assert!(restricted.applies_at(BloomLevel::Apply));
        assert!(!restricted.applies_at(BloomLevel::Create));

        let universal = BloomBonus::universal(2);
        assert!(universal.applies_at(BloomLevel::Create));
        assert!(universal.applies_at(BloomLevel::Remember));
    }
}
