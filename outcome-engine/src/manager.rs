//! CapabilityStateManager - the only stateful component.
//!
//! Holds one [`CapabilityState`] per outcome for the loaded unit and
//! exposes the reducer-style operations the presentation layer drives:
//! toggle, apply suggestions, dirty checks and the batched save.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use capability::{CapabilityCatalog, CapabilitySuggester};
use unit_client::{MappingWrite, Outcome, UnitApi};

use crate::state::{CapabilityState, CapabilityStateView};
use crate::types::{EngineError, Result};

/// Per-unit capability reconciliation state.
pub struct CapabilityStateManager {
    catalog: Arc<CapabilityCatalog>,
    states: HashMap<String, CapabilityState>,
}

impl CapabilityStateManager {
    /// Build the per-outcome state for a freshly loaded unit.
    ///
    /// Saved-mapping fetches for all outcomes are issued concurrently; a
    /// failed fetch degrades to "no mappings recorded yet" and is never
    /// surfaced. Suggestions are computed for every outcome regardless of
    /// fetch outcome, so immediately after initialization nothing is
    /// dirty.
    pub async fn initialize(
        outcomes: &[Outcome],
        api: &dyn UnitApi,
        suggester: &CapabilitySuggester,
        suggestion_count: usize,
    ) -> Self {
        let fetches = outcomes.iter().map(|outcome| async move {
            let saved = match api.fetch_capability_mappings(&outcome.id).await {
                Ok(mappings) => mappings.into_iter().map(|m| m.capability_code).collect(),
                Err(err) => {
                    debug!(
                        outcome_id = %outcome.id,
                        error = %err,
                        "No saved capability mappings; starting empty"
                    );
                    Vec::new()
                }
            };
            (outcome, saved)
        });

        let mut states = HashMap::new();
        for (outcome, saved) in join_all(fetches).await {
            let suggested = suggester.top_n(
                &outcome.description,
                Some(outcome.bloom_level),
                suggestion_count,
            );
            states.insert(outcome.id.clone(), CapabilityState::new(saved, suggested));
        }

        debug!(outcomes = states.len(), "Capability state initialized");

        Self {
            catalog: Arc::clone(suggester.catalog()),
            states,
        }
    }

    /// Number of outcomes under management.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether any outcomes are under management.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Toggle a capability code on one outcome's working copy.
    ///
    /// Rejects codes outside the catalog universe so `current` can never
    /// hold an unknown capability.
    pub fn toggle(&mut self, outcome_id: &str, code: &str) -> Result<()> {
        if !self.catalog.contains(code) {
            return Err(EngineError::UnknownCapability(code.to_string()));
        }
        let state = self.state_mut(outcome_id)?;
        state.toggle(code);
        Ok(())
    }

    /// Apply every remaining suggestion to one outcome's working copy.
    pub fn apply_suggestions(&mut self, outcome_id: &str) -> Result<()> {
        let state = self.state_mut(outcome_id)?;
        state.apply_suggestions();
        Ok(())
    }

    /// Whether one outcome's working copy differs from the server truth.
    pub fn is_dirty(&self, outcome_id: &str) -> Result<bool> {
        Ok(self.state(outcome_id)?.is_dirty())
    }

    /// Whether any outcome has unsaved changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.states.values().any(CapabilityState::is_dirty)
    }

    /// Presentation snapshot for one outcome.
    pub fn view(&self, outcome_id: &str) -> Result<CapabilityStateView> {
        Ok(CapabilityStateView::from(self.state(outcome_id)?))
    }

    /// Persist every dirty outcome in one batch.
    ///
    /// All writes are issued concurrently and joined as one unit. Only
    /// when every write succeeds is `saved` promoted to `current`, for
    /// every batch member at once. On any failure nothing is promoted -
    /// including outcomes whose individual write succeeded server-side,
    /// so client and server can diverge until the next successful save.
    /// That divergence is a documented limitation of the batch contract,
    /// kept pending product review rather than papered over.
    ///
    /// Returns the number of outcomes saved (0 when nothing was dirty).
    pub async fn save_all(&mut self, api: &dyn UnitApi) -> Result<usize> {
        let dirty: Vec<(String, Vec<String>)> = self
            .states
            .iter()
            .filter(|(_, state)| state.is_dirty())
            .map(|(id, state)| (id.clone(), state.current().to_vec()))
            .collect();

        if dirty.is_empty() {
            debug!("No dirty outcomes; nothing to save");
            return Ok(0);
        }

        let writes = dirty.iter().map(|(outcome_id, codes)| {
            let write = MappingWrite {
                capability_codes: codes.clone(),
                is_ai_suggested: false,
            };
            async move { api.persist_capability_mappings(outcome_id, &write).await }
        });

        let results = join_all(writes).await;
        let failed = results.iter().filter(|r| r.is_err()).count();

        if failed > 0 {
            warn!(
                failed,
                total = dirty.len(),
                "Batch save failed; local state left dirty"
            );
            return Err(EngineError::SaveFailed {
                failed,
                total: dirty.len(),
            });
        }

        for (outcome_id, _) in &dirty {
            if let Some(state) = self.states.get_mut(outcome_id) {
                state.promote_saved();
            }
        }

        info!(count = dirty.len(), "Capability mappings saved");
        Ok(dirty.len())
    }

    fn state(&self, outcome_id: &str) -> Result<&CapabilityState> {
        self.states
            .get(outcome_id)
            .ok_or_else(|| EngineError::UnknownOutcome(outcome_id.to_string()))
    }

    fn state_mut(&mut self, outcome_id: &str) -> Result<&mut CapabilityState> {
        self.states
            .get_mut(outcome_id)
            .ok_or_else(|| EngineError::UnknownOutcome(outcome_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capability::BloomLevel;
    use unit_client::MockUnitApi;

    fn outcomes() -> Vec<Outcome> {
        vec![
            Outcome::new(
                "o-1",
                "ULO1",
                "Students will apply knowledge to design an innovative solution",
                BloomLevel::Apply,
            ),
            Outcome::new(
                "o-2",
                "ULO2",
                "Present a written report to peers",
                BloomLevel::Understand,
            ),
        ]
    }

    fn suggester() -> CapabilitySuggester {
        CapabilitySuggester::new(Arc::new(CapabilityCatalog::standard()))
    }

    async fn manager_with(api: &MockUnitApi) -> CapabilityStateManager {
        CapabilityStateManager::initialize(&outcomes(), api, &suggester(), 3).await
    }

    #[tokio::test]
    async fn test_initialize_clean_with_saved_mappings() {
        let api = MockUnitApi::new().with_mappings("o-1", vec!["communication"]);
        let manager = manager_with(&api).await;

        assert_eq!(manager.len(), 2);
        assert!(!manager.is_dirty("o-1").unwrap());
        assert!(!manager.is_dirty("o-2").unwrap());
        assert!(!manager.has_unsaved_changes());

        let view = manager.view("o-1").unwrap();
        assert_eq!(view.saved, vec!["communication".to_string()]);
        assert_eq!(view.current, view.saved);
        assert_eq!(api.mapping_fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty() {
        let api = MockUnitApi::new()
            .with_mappings("o-2", vec!["communication"])
            .with_failing_mapping_fetch("o-1");
        let manager = manager_with(&api).await;

        let view = manager.view("o-1").unwrap();
        assert!(view.saved.is_empty());
        assert!(!view.dirty);
        // Suggestions are computed regardless of the failed fetch
        assert!(!view.remaining_suggestions.is_empty());
        assert_eq!(view.remaining_suggestions[0], "apply-knowledge");
    }

    #[tokio::test]
    async fn test_toggle_validates_inputs() {
        let api = MockUnitApi::new();
        let mut manager = manager_with(&api).await;

        assert!(matches!(
            manager.toggle("o-1", "time-travel"),
            Err(EngineError::UnknownCapability(_))
        ));
        assert!(matches!(
            manager.toggle("o-404", "teamwork"),
            Err(EngineError::UnknownOutcome(_))
        ));

        manager.toggle("o-1", "teamwork").unwrap();
        assert!(manager.is_dirty("o-1").unwrap());
        assert!(manager.has_unsaved_changes());

        manager.toggle("o-1", "teamwork").unwrap();
        assert!(!manager.has_unsaved_changes());
    }

    #[tokio::test]
    async fn test_apply_suggestions_marks_dirty() {
        let api = MockUnitApi::new();
        let mut manager = manager_with(&api).await;

        manager.apply_suggestions("o-1").unwrap();

        let view = manager.view("o-1").unwrap();
        assert!(view.remaining_suggestions.is_empty());
        assert!(view.dirty);
        assert_eq!(view.current[0], "apply-knowledge");
    }

    #[tokio::test]
    async fn test_save_all_promotes_every_batch_member() {
        let api = MockUnitApi::new();
        let mut manager = manager_with(&api).await;

        manager.toggle("o-1", "teamwork").unwrap();
        manager.apply_suggestions("o-2").unwrap();

        let saved = manager.save_all(&api).await.unwrap();
        assert_eq!(saved, 2);
        assert!(!manager.has_unsaved_changes());

        let calls = api.persist_calls().await;
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|(_, write)| !write.is_ai_suggested));
        let o1 = calls.iter().find(|(id, _)| id == "o-1").unwrap();
        assert_eq!(o1.1.capability_codes, vec!["teamwork".to_string()]);
    }

    #[tokio::test]
    async fn test_save_all_skips_clean_outcomes() {
        let api = MockUnitApi::new();
        let mut manager = manager_with(&api).await;

        assert_eq!(manager.save_all(&api).await.unwrap(), 0);
        assert!(api.persist_calls().await.is_empty());

        manager.toggle("o-1", "teamwork").unwrap();
        assert_eq!(manager.save_all(&api).await.unwrap(), 1);

        let calls = api.persist_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "o-1");
    }

    #[tokio::test]
    async fn test_partial_failure_promotes_nothing() {
        // o-1's write succeeds server-side, o-2's rejects: both must stay
        // dirty, o-1 is not silently promoted to clean.
        let api = MockUnitApi::new().with_failing_persist("o-2");
        let mut manager = manager_with(&api).await;

        manager.toggle("o-1", "teamwork").unwrap();
        manager.toggle("o-2", "communication").unwrap();

        let result = manager.save_all(&api).await;
        assert!(matches!(
            result,
            Err(EngineError::SaveFailed { failed: 1, total: 2 })
        ));

        assert!(manager.is_dirty("o-1").unwrap());
        assert!(manager.is_dirty("o-2").unwrap());

        // The o-1 write really did reach the server
        let calls = api.persist_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "o-1");
    }

    #[tokio::test]
    async fn test_retry_after_partial_failure_succeeds() {
        let api = MockUnitApi::new().with_failing_persist("o-2");
        let mut manager = manager_with(&api).await;

        manager.toggle("o-1", "teamwork").unwrap();
        manager.toggle("o-2", "communication").unwrap();
        assert!(manager.save_all(&api).await.is_err());

        // User retries against a recovered backend
        let recovered = MockUnitApi::new();
        assert_eq!(manager.save_all(&recovered).await.unwrap(), 2);
        assert!(!manager.has_unsaved_changes());
    }
}
