//! Adaptive state carried by one assessment session.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::spec::{Item, SurveySpec};
use crate::types::{AxisId, AxisScore, DomainId, ItemId};

/// Everything the selector and stopping rule look at.
///
/// Owned by exactly one session and only mutated by the session manager
/// when an answer is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveState {
    /// Answered item IDs, in answer order.
    pub answered_items: Vec<ItemId>,
    /// Scores from the most recent recomputation.
    pub axis_scores: BTreeMap<AxisId, AxisScore>,
    /// Answered items touching each selected domain.
    pub domain_coverage: BTreeMap<DomainId, u32>,
    pub total_questions: u32,
    pub selected_domains: Vec<DomainId>,
}

impl AdaptiveState {
    /// Fresh state with zero coverage for every selected domain.
    #[must_use]
    pub fn new(selected_domains: Vec<DomainId>) -> Self {
        let domain_coverage = selected_domains.iter().map(|d| (d.clone(), 0)).collect();
        Self {
            answered_items: Vec::new(),
            axis_scores: BTreeMap::new(),
            domain_coverage,
            total_questions: 0,
            selected_domains,
        }
    }

    #[must_use]
    pub fn is_answered(&self, item_id: &ItemId) -> bool {
        self.answered_items.contains(item_id)
    }

    #[must_use]
    pub fn is_domain_selected(&self, domain_id: &DomainId) -> bool {
        self.selected_domains.contains(domain_id)
    }

    /// Whether `item` touches at least one selected domain.
    #[must_use]
    pub fn covers_item(&self, item: &Item, spec: &SurveySpec) -> bool {
        spec.item_domains(item)
            .into_iter()
            .any(|d| self.is_domain_selected(d))
    }

    #[must_use]
    pub fn coverage(&self, domain_id: &DomainId) -> u32 {
        self.domain_coverage.get(domain_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn axis_score(&self, axis_id: &AxisId) -> Option<&AxisScore> {
        self.axis_scores.get(axis_id)
    }

    /// Record that `item` was answered.
    ///
    /// Coverage is bumped once for each selected domain the item touches.
    pub fn record_answer(&mut self, item: &Item, spec: &SurveySpec) {
        self.answered_items.push(item.id.clone());
        self.total_questions += 1;
        for domain in spec.item_domains(item) {
            if let Some(count) = self.domain_coverage.get_mut(domain) {
                *count += 1;
            }
        }
    }

    /// Replace cached scores with a fresh recomputation.
    pub fn set_scores(&mut self, scores: impl IntoIterator<Item = AxisScore>) {
        self.axis_scores = scores
            .into_iter()
            .map(|s| (s.axis_id.clone(), s))
            .collect();
    }

    /// Mean confidence across scored axes; zero when nothing is scored.
    #[must_use]
    pub fn mean_confidence(&self) -> f64 {
        if self.axis_scores.is_empty() {
            return 0.0;
        }
        self.axis_scores.values().map(|s| s.confidence).sum::<f64>()
            / self.axis_scores.len() as f64
    }
}
