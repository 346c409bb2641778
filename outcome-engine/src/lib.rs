//! Outcome Engine - hierarchy assembly and capability reconciliation
//!
//! Provides the data-shape core of the education-content client:
//! - Pure four-level hierarchy assembly (outcome → week → material →
//!   local outcome) from flat, independently-fetched collections
//! - Per-outcome three-way capability state (server-saved / locally
//!   edited / suggested) with toggle, apply and batched save
//! - The [`OutcomeEngine`] orchestrator tying fetches, scoring and state
//!   together for the presentation layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             OutcomeEngine               │
//! │   (unit load, session, delegation)      │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┼───────────────┐
//!      ▼           ▼               ▼
//! ┌─────────┐ ┌──────────┐ ┌────────────────┐
//! │ UnitApi │ │Hierarchy │ │ CapabilityState│
//! │ (REST)  │ │ Builder  │ │    Manager     │
//! └─────────┘ └──────────┘ └────────────────┘
//! ```

pub mod config;
pub mod engine;
pub mod manager;
pub mod state;
pub mod tree;
pub mod types;

// Re-export main types for convenience
pub use config::EngineConfig;
pub use engine::OutcomeEngine;
pub use manager::CapabilityStateManager;
pub use state::{CapabilityState, CapabilityStateView, CodeSet};
pub use tree::{build_hierarchy, TreeNode, TreeNodeKind};
pub use types::{EngineError, Result};
