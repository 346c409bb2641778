//! Error types for the engine.

use unit_client::ApiError;

/// Error types for engine operations.
///
/// A failed per-outcome mapping fetch is deliberately not represented
/// here: it degrades to "no saved mappings" inside initialization and is
/// never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Hierarchy load failed; the caller may retry the load
    #[error("Failed to load unit data: {0}")]
    Load(#[from] ApiError),

    /// Batched save failed; no local state was promoted
    #[error("Batch save failed: {failed} of {total} mapping writes failed")]
    SaveFailed { failed: usize, total: usize },

    /// No unit loaded - call load_unit() first
    #[error("No unit loaded - call load_unit() first")]
    NoUnitLoaded,

    /// A newer load started before this one finished
    #[error("Unit load superseded by a newer load")]
    Superseded,

    /// Outcome id not present in the loaded unit
    #[error("Unknown outcome: {0}")]
    UnknownOutcome(String),

    /// Capability code outside the catalog universe
    #[error("Unknown capability code: {0}")]
    UnknownCapability(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
