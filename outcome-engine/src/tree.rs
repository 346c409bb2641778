//! Hierarchy assembly.
//!
//! Builds the four-level tree (outcome → week → material → local
//! outcome) from the flat collections the API serves. Assembly is pure:
//! same inputs always produce the same tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use capability::BloomLevel;
use unit_client::{Material, Outcome};

/// A node in the outcome hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Identifier; material nodes reuse the material id even when the
    /// material appears under several outcomes
    pub id: String,
    /// Display label
    pub label: String,
    /// Variant-specific metadata
    pub kind: TreeNodeKind,
    /// Ordered children
    pub children: Vec<TreeNode>,
}

/// Variant metadata for a tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNodeKind {
    /// Unit-level outcome root
    Outcome {
        bloom_level: BloomLevel,
        material_count: u32,
        assessment_count: u32,
    },
    /// Week grouping under an outcome
    Week { number: u32 },
    /// Material scheduled in a week
    Material {
        material_type: String,
        duration_minutes: Option<u32>,
    },
    /// Material-local outcome leaf
    LocalOutcome,
}

/// Assemble the hierarchy: one root per outcome, in input order.
///
/// Materials are matched by mapped outcome id (a linear scan per
/// outcome; callers with large collections should pre-index, correctness
/// does not depend on it). Weeks are emitted in ascending numeric order;
/// materials within a week keep their input order. An outcome with no
/// mapped materials still produces a root with no children. A material
/// mapped to several outcomes becomes a distinct node instance under
/// each of them, sharing only the material id.
pub fn build_hierarchy(outcomes: &[Outcome], materials: &[Material]) -> Vec<TreeNode> {
    outcomes
        .iter()
        .map(|outcome| {
            let mut by_week: BTreeMap<u32, Vec<&Material>> = BTreeMap::new();
            for material in materials {
                if material.outcome_ids.iter().any(|id| id == &outcome.id) {
                    by_week.entry(material.week).or_default().push(material);
                }
            }

            let children = by_week
                .into_iter()
                .map(|(week, week_materials)| TreeNode {
                    id: format!("{}:week-{}", outcome.id, week),
                    label: format!("Week {}", week),
                    kind: TreeNodeKind::Week { number: week },
                    children: week_materials.into_iter().map(material_node).collect(),
                })
                .collect();

            TreeNode {
                id: outcome.id.clone(),
                label: format!("{}: {}", outcome.code, outcome.description),
                kind: TreeNodeKind::Outcome {
                    bloom_level: outcome.bloom_level,
                    material_count: outcome.material_count,
                    assessment_count: outcome.assessment_count,
                },
                children,
            }
        })
        .collect()
}

fn material_node(material: &Material) -> TreeNode {
    TreeNode {
        id: material.id.clone(),
        label: material.title.clone(),
        kind: TreeNodeKind::Material {
            material_type: material.material_type.clone(),
            duration_minutes: material.duration_minutes,
        },
        children: material
            .local_outcomes
            .iter()
            .map(|local| TreeNode {
                id: local.id.clone(),
                label: local.description.clone(),
                kind: TreeNodeKind::LocalOutcome,
                children: vec![],
            })
            .collect(),
    }
}
