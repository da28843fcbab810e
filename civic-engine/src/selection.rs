//! Adaptive question selection.
//!
//! The [`AdaptiveSelector`] holds an ordered list of [`SelectionStrategy`]
//! objects and returns the first candidate any of them produces:
//!
//! | Order | Strategy | Active while | Prefers |
//! |-------|----------|--------------|---------|
//! | 1 | [`DomainCoverageStrategy`] | `total < coverage_phase_questions` | items in under-covered domains touching the most axes |
//! | 2 | [`UncertainAxisStrategy`] | `total < uncertainty_phase_questions` | items matching the most uncertain axes |
//! | 3 | [`MaxInformationStrategy`] | always | highest information score |
//!
//! Ties are always broken by spec declaration order. The last strategy
//! accepts any candidate, so selection only returns `None` when no eligible
//! unanswered item remains.

use std::collections::HashSet;

use crate::config::SelectorConfig;
use crate::spec::{Axis, Item, SurveySpec};
use crate::state::AdaptiveState;
use crate::types::{AxisId, DomainId};

/// Everything a strategy may look at when picking an item.
#[derive(Debug)]
pub struct SelectionContext<'a, 'c> {
    pub spec: &'a SurveySpec,
    pub state: &'a AdaptiveState,
    pub config: &'c SelectorConfig,
    /// Unanswered items eligible for this session, in spec order.
    pub candidates: Vec<&'a Item>,
    session_axes: Vec<&'a Axis>,
}

impl<'a, 'c> SelectionContext<'a, 'c> {
    /// Build the candidate pool for `state`.
    ///
    /// Items must be unanswered and touch at least one axis in a selected
    /// domain. Selecting every domain lifts the domain restriction.
    pub fn new(
        spec: &'a SurveySpec,
        state: &'a AdaptiveState,
        config: &'c SelectorConfig,
    ) -> Self {
        let all_selected = spec
            .domains()
            .iter()
            .all(|d| state.is_domain_selected(&d.id));

        let session_axes: Vec<&Axis> = spec
            .axes()
            .iter()
            .filter(|a| all_selected || state.is_domain_selected(&a.domain_id))
            .collect();
        let session_axis_ids: HashSet<&AxisId> = session_axes.iter().map(|a| &a.id).collect();

        let candidates = spec
            .items()
            .iter()
            .filter(|item| !state.is_answered(&item.id))
            .filter(|item| {
                all_selected || item.axes.iter().any(|k| session_axis_ids.contains(&k.axis_id))
            })
            .collect();

        Self {
            spec,
            state,
            config,
            candidates,
            session_axes,
        }
    }

    /// Axes belonging to the session's selected domains.
    pub fn session_axes(&self) -> &[&'a Axis] {
        &self.session_axes
    }

    /// Answers recorded for an axis; unscored axes have zero.
    pub fn answers_for(&self, axis_id: &AxisId) -> u32 {
        self.state.axis_score(axis_id).map_or(0, |s| s.n_answered)
    }

    /// Confidence for an axis; unscored axes have zero.
    pub fn confidence_for(&self, axis_id: &AxisId) -> f64 {
        self.state.axis_score(axis_id).map_or(0.0, |s| s.confidence)
    }

    /// Whether an axis still needs answers or confidence.
    pub fn is_uncertain(&self, axis_id: &AxisId) -> bool {
        self.answers_for(axis_id) < self.config.min_answers_per_axis
            || self.confidence_for(axis_id) < self.config.confidence_threshold
    }
}

/// One phase of the selection heuristic.
pub trait SelectionStrategy: Send + Sync {
    /// Short name used in logs and [`Selection`] results.
    fn name(&self) -> &'static str;

    /// Pick a candidate, or `None` to defer to the next strategy.
    fn select<'a>(&self, ctx: &SelectionContext<'a, '_>) -> Option<&'a Item>;
}

/// Spread early questions across selected domains.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainCoverageStrategy;

impl SelectionStrategy for DomainCoverageStrategy {
    fn name(&self) -> &'static str {
        "domain_coverage"
    }

    fn select<'a>(&self, ctx: &SelectionContext<'a, '_>) -> Option<&'a Item> {
        let state = ctx.state;
        if state.total_questions >= ctx.config.coverage_phase_questions
            || state.selected_domains.is_empty()
        {
            return None;
        }

        let total: u32 = state
            .selected_domains
            .iter()
            .map(|d| state.coverage(d))
            .sum();
        let mean = f64::from(total) / state.selected_domains.len() as f64;
        let low: HashSet<&DomainId> = state
            .selected_domains
            .iter()
            .filter(|d| f64::from(state.coverage(d)) < mean + ctx.config.coverage_slack)
            .collect();

        let pool = ctx.candidates.iter().copied().filter(|item| {
            ctx.spec
                .item_domains(item)
                .into_iter()
                .any(|d| low.contains(d))
        });
        first_max_by_key(pool, Item::axis_count)
    }
}

/// Target axes the scorer is least sure about.
#[derive(Debug, Clone, Copy, Default)]
pub struct UncertainAxisStrategy;

impl SelectionStrategy for UncertainAxisStrategy {
    fn name(&self) -> &'static str {
        "uncertain_axis"
    }

    fn select<'a>(&self, ctx: &SelectionContext<'a, '_>) -> Option<&'a Item> {
        if ctx.state.total_questions >= ctx.config.uncertainty_phase_questions {
            return None;
        }

        let uncertain: HashSet<&AxisId> = ctx
            .session_axes()
            .iter()
            .map(|a| &a.id)
            .filter(|id| ctx.is_uncertain(id))
            .collect();
        if uncertain.is_empty() {
            return None;
        }

        let matches = |item: &Item| {
            item.axes
                .iter()
                .filter(|k| uncertain.contains(&k.axis_id))
                .count()
        };
        let pool = ctx.candidates.iter().copied().filter(|item| matches(*item) > 0);
        first_max_by_key(pool, &matches)
    }
}

/// Fallback that always picks the most informative remaining item.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxInformationStrategy;

impl MaxInformationStrategy {
    /// `2 * axes touched`, plus 3 per under-answered axis or 2 per low-confidence axis.
    pub fn information_score(ctx: &SelectionContext<'_, '_>, item: &Item) -> u32 {
        let bonus: u32 = item
            .axes
            .iter()
            .map(|k| {
                if ctx.answers_for(&k.axis_id) < ctx.config.min_answers_per_axis {
                    3
                } else if ctx.confidence_for(&k.axis_id) < ctx.config.confidence_threshold {
                    2
                } else {
                    0
                }
            })
            .sum();
        2 * item.axis_count() as u32 + bonus
    }
}

impl SelectionStrategy for MaxInformationStrategy {
    fn name(&self) -> &'static str {
        "max_information"
    }

    fn select<'a>(&self, ctx: &SelectionContext<'a, '_>) -> Option<&'a Item> {
        first_max_by_key(ctx.candidates.iter().copied(), |item| {
            Self::information_score(ctx, item)
        })
    }
}

/// A chosen item and the strategy that produced it.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub item: &'a Item,
    pub strategy: &'static str,
}

/// Ordered chain of selection strategies.
pub struct AdaptiveSelector {
    config: SelectorConfig,
    strategies: Vec<Box<dyn SelectionStrategy>>,
}

impl AdaptiveSelector {
    /// Selector with the standard coverage → uncertainty → information chain.
    pub fn new(config: SelectorConfig) -> Self {
        Self::with_strategies(
            config,
            vec![
                Box::new(DomainCoverageStrategy),
                Box::new(UncertainAxisStrategy),
                Box::new(MaxInformationStrategy),
            ],
        )
    }

    /// Selector with a custom strategy chain, tried in order.
    pub fn with_strategies(
        config: SelectorConfig,
        strategies: Vec<Box<dyn SelectionStrategy>>,
    ) -> Self {
        Self { config, strategies }
    }

    /// Names of the configured strategies, in evaluation order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Pick the next item to ask, or `None` if nothing eligible remains.
    pub fn select_next<'a>(
        &self,
        spec: &'a SurveySpec,
        state: &'a AdaptiveState,
    ) -> Option<Selection<'a>> {
        let ctx = SelectionContext::new(spec, state, &self.config);
        if ctx.candidates.is_empty() {
            tracing::debug!(
                answered = state.total_questions,
                "No eligible items remain"
            );
            return None;
        }

        self.strategies.iter().find_map(|strategy| {
            let item = strategy.select(&ctx)?;
            tracing::debug!(
                item_id = %item.id,
                strategy = strategy.name(),
                answered = state.total_questions,
                "Selected next item"
            );
            Some(Selection {
                item,
                strategy: strategy.name(),
            })
        })
    }
}

impl Default for AdaptiveSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl std::fmt::Debug for AdaptiveSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptiveSelector")
            .field("config", &self.config)
            .field("strategies", &self.strategy_names())
            .finish()
    }
}

/// First item with the maximum key; earlier items win ties.
fn first_max_by_key<'a, K, F>(items: impl Iterator<Item = &'a Item>, key: F) -> Option<&'a Item>
where
    K: PartialOrd,
    F: Fn(&Item) -> K,
{
    let mut best: Option<(&'a Item, K)> = None;
    for item in items {
        let k = key(item);
        match &best {
            Some((_, best_key)) if k <= *best_key => {}
            _ => best = Some((item, k)),
        }
    }
    best.map(|(item, _)| item)
}
