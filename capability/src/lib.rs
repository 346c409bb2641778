//! Graduate capability catalog and suggestion scoring.
//!
//! Provides the fixed catalog of cross-cutting graduate capabilities and
//! a pure scorer that ranks capabilities against free-text learning
//! outcome descriptions:
//! - Data-driven [`CapabilityCatalog`] (YAML-loadable, validated)
//! - [`CapabilitySuggester`] keyword/bloom scoring
//! - [`BloomLevel`] cognitive taxonomy shared across the workspace
//!
//! With the `typescript` feature enabled, the public types can be
//! exported to TypeScript using ts-rs for consistency with the frontend.

pub mod catalog;
pub mod suggest;
pub mod types;

// Re-export main types for convenience
pub use catalog::{CapabilityCatalog, CatalogError};
pub use suggest::CapabilitySuggester;
pub use types::{BloomBonus, BloomLevel, CapabilityDefinition, Suggestion};
