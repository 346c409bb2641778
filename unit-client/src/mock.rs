//! Mock content-management API for testing.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::api::{ApiError, UnitApi};
use crate::types::{MappingWrite, Material, Outcome, SavedMapping};

/// Mock API for testing.
///
/// Seeded with in-memory records; supports per-outcome failure injection
/// and per-unit fetch latency so callers can exercise degraded and
/// interleaved paths.
pub struct MockUnitApi {
    outcomes: Vec<Outcome>,
    materials: Vec<Material>,
    mappings: HashMap<String, Vec<String>>,
    failing_mapping_fetches: HashSet<String>,
    failing_persists: HashSet<String>,
    failing_units: HashSet<String>,
    unit_latency: HashMap<String, Duration>,
    mapping_fetch_count: AtomicU32,
    persist_log: Mutex<Vec<(String, MappingWrite)>>,
}

impl MockUnitApi {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            materials: Vec::new(),
            mappings: HashMap::new(),
            failing_mapping_fetches: HashSet::new(),
            failing_persists: HashSet::new(),
            failing_units: HashSet::new(),
            unit_latency: HashMap::new(),
            mapping_fetch_count: AtomicU32::new(0),
            persist_log: Mutex::new(Vec::new()),
        }
    }

    /// Seed the outcome records.
    pub fn with_outcomes(mut self, outcomes: Vec<Outcome>) -> Self {
        self.outcomes = outcomes;
        self
    }

    /// Seed the material records.
    pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
        self.materials = materials;
        self
    }

    /// Seed saved capability mappings for an outcome.
    pub fn with_mappings(mut self, outcome_id: impl Into<String>, codes: Vec<&str>) -> Self {
        self.mappings
            .insert(outcome_id.into(), codes.into_iter().map(String::from).collect());
        self
    }

    /// Make `fetch_capability_mappings` fail for an outcome.
    pub fn with_failing_mapping_fetch(mut self, outcome_id: impl Into<String>) -> Self {
        self.failing_mapping_fetches.insert(outcome_id.into());
        self
    }

    /// Make `persist_capability_mappings` fail for an outcome.
    pub fn with_failing_persist(mut self, outcome_id: impl Into<String>) -> Self {
        self.failing_persists.insert(outcome_id.into());
        self
    }

    /// Make unit-level fetches fail for a unit.
    pub fn with_failing_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.failing_units.insert(unit_id.into());
        self
    }

    /// Delay unit-level fetches for a unit.
    pub fn with_unit_latency(mut self, unit_id: impl Into<String>, latency: Duration) -> Self {
        self.unit_latency.insert(unit_id.into(), latency);
        self
    }

    /// Number of mapping fetches issued.
    pub fn mapping_fetch_count(&self) -> u32 {
        self.mapping_fetch_count.load(Ordering::SeqCst)
    }

    /// Persist calls recorded so far, in completion order.
    pub async fn persist_calls(&self) -> Vec<(String, MappingWrite)> {
        self.persist_log.lock().await.clone()
    }

    async fn unit_gate(&self, unit_id: &str) -> Result<(), ApiError> {
        if let Some(latency) = self.unit_latency.get(unit_id) {
            tokio::time::sleep(*latency).await;
        }
        if self.failing_units.contains(unit_id) {
            return Err(ApiError::Network(format!("mock failure for unit {}", unit_id)));
        }
        Ok(())
    }
}

impl Default for MockUnitApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitApi for MockUnitApi {
    async fn fetch_outcomes_by_unit(&self, unit_id: &str) -> Result<Vec<Outcome>, ApiError> {
        self.unit_gate(unit_id).await?;
        Ok(self.outcomes.clone())
    }

    async fn fetch_materials_by_unit(&self, unit_id: &str) -> Result<Vec<Material>, ApiError> {
        self.unit_gate(unit_id).await?;
        Ok(self.materials.clone())
    }

    async fn fetch_material_detail(
        &self,
        material_id: &str,
        include_local_outcomes: bool,
    ) -> Result<Material, ApiError> {
        let mut material = self
            .materials
            .iter()
            .find(|m| m.id == material_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(material_id.to_string()))?;

        if !include_local_outcomes {
            material.local_outcomes.clear();
        }
        Ok(material)
    }

    async fn fetch_capability_mappings(
        &self,
        outcome_id: &str,
    ) -> Result<Vec<SavedMapping>, ApiError> {
        self.mapping_fetch_count.fetch_add(1, Ordering::SeqCst);

        if self.failing_mapping_fetches.contains(outcome_id) {
            return Err(ApiError::RequestFailed {
                status: 500,
                body: format!("mock mapping failure for {}", outcome_id),
            });
        }

        Ok(self
            .mappings
            .get(outcome_id)
            .map(|codes| {
                codes
                    .iter()
                    .map(|code| SavedMapping {
                        capability_code: code.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn persist_capability_mappings(
        &self,
        outcome_id: &str,
        write: &MappingWrite,
    ) -> Result<(), ApiError> {
        if self.failing_persists.contains(outcome_id) {
            return Err(ApiError::RequestFailed {
                status: 500,
                body: format!("mock persist failure for {}", outcome_id),
            });
        }

        let mut log = self.persist_log.lock().await;
        log.push((outcome_id.to_string(), write.clone()));
        Ok(())
    }
}
