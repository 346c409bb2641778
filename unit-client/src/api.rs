//! Core trait for the content-management API.
//!
//! This module defines the `UnitApi` trait - the collaborator boundary
//! between the reconciliation core and the REST backend.

use async_trait::async_trait;

use crate::types::{MappingWrite, Material, Outcome, SavedMapping};

/// Error types for API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Server returned a non-success status
    #[error("Request failed with HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Core trait over the content-management API.
///
/// Fetch operations are read-only; the only write is
/// `persist_capability_mappings`. A failed
/// `fetch_capability_mappings` call is routinely interpreted by callers
/// as "no mappings recorded yet" rather than an error.
#[async_trait]
pub trait UnitApi: Send + Sync {
    /// Fetch the unit-level outcomes for a unit.
    async fn fetch_outcomes_by_unit(&self, unit_id: &str) -> Result<Vec<Outcome>, ApiError>;

    /// Fetch the materials scheduled in a unit.
    async fn fetch_materials_by_unit(&self, unit_id: &str) -> Result<Vec<Material>, ApiError>;

    /// Fetch one material, optionally with its local outcomes populated.
    async fn fetch_material_detail(
        &self,
        material_id: &str,
        include_local_outcomes: bool,
    ) -> Result<Material, ApiError>;

    /// Fetch the saved capability mappings for an outcome.
    async fn fetch_capability_mappings(
        &self,
        outcome_id: &str,
    ) -> Result<Vec<SavedMapping>, ApiError>;

    /// Replace the capability mappings for an outcome.
    async fn persist_capability_mappings(
        &self,
        outcome_id: &str,
        write: &MappingWrite,
    ) -> Result<(), ApiError>;
}
