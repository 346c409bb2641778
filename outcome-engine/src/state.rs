//! Per-outcome reconciliation state.
//!
//! Each outcome carries three collections: the last known server truth
//! (`saved`), the working copy (`current`) and the suggestion ranking
//! computed once at load (`suggested`). The remaining-suggestions display
//! list is a derived view over `current`, never a mutation of the
//! ranking.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// An insertion-ordered set of capability codes.
///
/// Display order is the append order; membership and equality are pure
/// set semantics backed by a hash index, so dirty checks stay correct
/// regardless of toggle order.
#[derive(Debug, Clone, Default)]
pub struct CodeSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl CodeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a code if absent. Returns whether it was inserted.
    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        if self.members.contains(&code) {
            return false;
        }
        self.members.insert(code.clone());
        self.order.push(code);
        true
    }

    /// Remove a code. Returns whether it was present.
    pub fn remove(&mut self, code: &str) -> bool {
        if !self.members.remove(code) {
            return false;
        }
        self.order.retain(|c| c != code);
        true
    }

    /// Check membership.
    pub fn contains(&self, code: &str) -> bool {
        self.members.contains(code)
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate codes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Codes in insertion order.
    pub fn to_vec(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Set equality: equal length plus one-direction containment, which
    /// is sufficient because duplicates cannot exist.
    pub fn set_eq(&self, other: &CodeSet) -> bool {
        self.len() == other.len() && self.order.iter().all(|c| other.contains(c))
    }
}

impl FromIterator<String> for CodeSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for code in iter {
            set.insert(code);
        }
        set
    }
}

/// Three-way capability state for one outcome.
#[derive(Debug, Clone)]
pub struct CapabilityState {
    saved: CodeSet,
    current: CodeSet,
    suggested: Vec<String>,
}

impl CapabilityState {
    /// Create state from the fetched server truth and the computed
    /// suggestion ranking. `saved` and `current` start identical.
    pub fn new(saved_codes: Vec<String>, suggested: Vec<String>) -> Self {
        let saved: CodeSet = saved_codes.into_iter().collect();
        let current = saved.clone();
        Self {
            saved,
            current,
            suggested,
        }
    }

    /// Last known server truth.
    pub fn saved(&self) -> &CodeSet {
        &self.saved
    }

    /// Working copy.
    pub fn current(&self) -> &CodeSet {
        &self.current
    }

    /// The stable suggestion ranking computed at load.
    pub fn suggested(&self) -> &[String] {
        &self.suggested
    }

    /// Suggestions not yet in the working copy, in ranking order.
    /// Derived view; the underlying ranking is never mutated.
    pub fn remaining_suggestions(&self) -> Vec<String> {
        self.suggested
            .iter()
            .filter(|code| !self.current.contains(code))
            .cloned()
            .collect()
    }

    /// Whether the working copy differs from the server truth as a set.
    pub fn is_dirty(&self) -> bool {
        !self.saved.set_eq(&self.current)
    }

    /// Toggle a code in the working copy: remove if present, otherwise
    /// append. `saved` and `suggested` are untouched.
    pub fn toggle(&mut self, code: &str) {
        if !self.current.remove(code) {
            self.current.insert(code);
        }
    }

    /// Append every suggestion missing from the working copy, in ranking
    /// order. Afterwards the remaining-suggestions view is empty.
    pub fn apply_suggestions(&mut self) {
        for code in self.suggested.clone() {
            self.current.insert(code);
        }
    }

    /// Collapse the state after a successful save: the working copy
    /// becomes the new server truth.
    pub(crate) fn promote_saved(&mut self) {
        self.saved = self.current.clone();
    }
}

/// Immutable snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityStateView {
    /// Last known server truth
    pub saved: Vec<String>,
    /// Working copy, in display order
    pub current: Vec<String>,
    /// Suggestions not yet applied, in ranking order
    pub remaining_suggestions: Vec<String>,
    /// Whether the outcome has unsaved changes
    pub dirty: bool,
}

impl From<&CapabilityState> for CapabilityStateView {
    fn from(state: &CapabilityState) -> Self {
        Self {
            saved: state.saved().to_vec(),
            current: state.current().to_vec(),
            remaining_suggestions: state.remaining_suggestions(),
            dirty: state.is_dirty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_set_ordering_and_membership() {
        let mut set = CodeSet::new();
        assert!(set.insert("b"));
        assert!(set.insert("a"));
        assert!(!set.insert("b")); // duplicate ignored
        assert_eq!(set.to_vec(), vec!["b".to_string(), "a".to_string()]);
        assert!(set.contains("a"));

        assert!(set.remove("b"));
        assert!(!set.remove("b"));
        assert_eq!(set.to_vec(), vec!["a".to_string()]);
    }

    #[test]
    fn test_set_eq_ignores_order() {
        let left: CodeSet = vec!["a".to_string(), "b".to_string()].into_iter().collect();
        let right: CodeSet = vec!["b".to_string(), "a".to_string()].into_iter().collect();
        assert!(left.set_eq(&right));

        let shorter: CodeSet = vec!["a".to_string()].into_iter().collect();
        assert!(!left.set_eq(&shorter));
        assert!(!shorter.set_eq(&left));
    }

    #[test]
    fn test_new_state_is_clean() {
        let state = CapabilityState::new(
            vec!["communication".to_string()],
            vec!["teamwork".to_string()],
        );
        assert!(!state.is_dirty());
        assert_eq!(state.remaining_suggestions(), vec!["teamwork".to_string()]);
    }

    #[test]
    fn test_toggle_self_inverse() {
        let mut state = CapabilityState::new(vec!["communication".to_string()], vec![]);

        state.toggle("teamwork");
        assert!(state.is_dirty());
        state.toggle("teamwork");
        assert!(!state.is_dirty());

        // Removing and re-adding a saved code changes display order but
        // not set equality.
        state.toggle("communication");
        assert!(state.is_dirty());
        state.toggle("communication");
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_apply_suggestions_exhausts_view() {
        let mut state = CapabilityState::new(
            vec!["communication".to_string()],
            vec!["communication".to_string(), "teamwork".to_string(), "innovation".to_string()],
        );
        let before = state.current().to_vec();

        state.apply_suggestions();

        assert!(state.remaining_suggestions().is_empty());
        // Current grew and is a superset of its prior value
        for code in before {
            assert!(state.current().contains(&code));
        }
        // Missing suggestions appended in ranking order
        assert_eq!(
            state.current().to_vec(),
            vec![
                "communication".to_string(),
                "teamwork".to_string(),
                "innovation".to_string()
            ]
        );
        // Ranking itself untouched
        assert_eq!(state.suggested().len(), 3);
    }

    #[test]
    fn test_remaining_view_is_derived() {
        let mut state =
            CapabilityState::new(vec![], vec!["teamwork".to_string(), "innovation".to_string()]);

        state.toggle("teamwork");
        assert_eq!(state.remaining_suggestions(), vec!["innovation".to_string()]);

        // Toggling the suggested code back off re-derives the full view
        state.toggle("teamwork");
        assert_eq!(
            state.remaining_suggestions(),
            vec!["teamwork".to_string(), "innovation".to_string()]
        );
    }

    #[test]
    fn test_view_snapshot() {
        let mut state = CapabilityState::new(vec!["a".to_string()], vec!["b".to_string()]);
        state.toggle("b");
        let view = CapabilityStateView::from(&state);
        assert_eq!(view.saved, vec!["a".to_string()]);
        assert_eq!(view.current, vec!["a".to_string(), "b".to_string()]);
        assert!(view.remaining_suggestions.is_empty());
        assert!(view.dirty);
    }
}
