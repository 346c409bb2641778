//! Capability suggestion scoring.
//!
//! Pure, deterministic scoring of the catalog against free-text outcome
//! descriptions. Same text and bloom level always yield the same ranked
//! list.

use std::sync::Arc;

use crate::catalog::CapabilityCatalog;
use crate::types::{BloomLevel, Suggestion};

/// Points awarded per keyword found in the outcome text.
const KEYWORD_POINTS: u32 = 10;

/// Scores catalog capabilities against outcome text.
///
/// Keyword matching is a naive lowercase substring check, so a keyword
/// like "apply" also matches "applying". That over-matching is a known
/// limitation of the scoring contract and is kept deliberately; callers
/// must not depend on word-boundary semantics.
pub struct CapabilitySuggester {
    catalog: Arc<CapabilityCatalog>,
}

impl CapabilitySuggester {
    /// Create a suggester over a catalog.
    pub fn new(catalog: Arc<CapabilityCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog this suggester scores against.
    pub fn catalog(&self) -> &Arc<CapabilityCatalog> {
        &self.catalog
    }

    /// Score every capability against the text and rank the results.
    ///
    /// Each keyword found as a substring of the lowercased text adds 10
    /// points. A capability's bloom bonus is added when a level is given
    /// and the rule applies at that level. Zero-score capabilities are
    /// excluded. Ties keep catalog declaration order (the sort is stable).
    pub fn suggest(&self, text: &str, bloom_level: Option<BloomLevel>) -> Vec<Suggestion> {
        let text = text.to_lowercase();

        let mut ranked: Vec<Suggestion> = self
            .catalog
            .definitions()
            .iter()
            .filter_map(|def| {
                let mut score: u32 = def
                    .keywords
                    .iter()
                    .filter(|keyword| text.contains(&keyword.to_lowercase()))
                    .map(|_| KEYWORD_POINTS)
                    .sum();

                if let (Some(bonus), Some(level)) = (&def.bloom_bonus, bloom_level) {
                    if bonus.applies_at(level) {
                        score += bonus.points;
                    }
                }

                if score == 0 {
                    return None;
                }

                Some(Suggestion {
                    code: def.code.clone(),
                    name: def.name.clone(),
                    score,
                })
            })
            .collect();

        // Vec::sort_by is stable: equal scores keep catalog order.
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    /// The codes of the `n` highest-ranked suggestions.
    pub fn top_n(&self, text: &str, bloom_level: Option<BloomLevel>, n: usize) -> Vec<String> {
        self.suggest(text, bloom_level)
            .into_iter()
            .take(n)
            .map(|s| s.code)
            .collect()
    }
}
