//! Content-management API client for unit outcome data.
//!
//! Defines the collaborator boundary the reconciliation core consumes:
//! - Domain records ([`Outcome`], [`Material`], [`LocalOutcome`])
//! - The [`UnitApi`] trait over the content-management REST API
//! - [`RestUnitApi`], the reqwest implementation
//! - [`MockUnitApi`], a configurable in-memory implementation for tests
//!
//! All records are read-only to the core; the only write operation is
//! persisting capability mappings for an outcome.

pub mod api;
pub mod mock;
pub mod rest;
pub mod types;

// Re-export main types for convenience
pub use api::{ApiError, UnitApi};
pub use mock::MockUnitApi;
pub use rest::RestUnitApi;
pub use types::{LocalOutcome, MappingWrite, Material, Outcome, SavedMapping};
