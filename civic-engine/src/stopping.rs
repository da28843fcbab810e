//! Stopping rule and progress estimation.
//!
//! Question bounds scale with the number of selected domains:
//! `min = max(min_floor, round(n * min_per_domain))` and
//! `max = max(max_floor, round(n * max_per_domain))`. Below `min` a session
//! never stops; at `max` it always stops; in between it stops once every
//! scored axis is both answered often enough and confident enough.

use serde::{Deserialize, Serialize};

use crate::config::StoppingConfig;
use crate::session::CompletionReason;
use crate::state::AdaptiveState;

/// Inclusive question-count bounds for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBounds {
    pub min: u32,
    pub max: u32,
}

/// Outcome of evaluating the stopping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDecision {
    Continue,
    Stop(CompletionReason),
}

impl StopDecision {
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop(_))
    }
}

/// Estimated position in the session, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: u32,
    pub estimated_total: u32,
    /// Rounded percentage, capped at 100.
    pub percent: u8,
}

impl Progress {
    fn new(answered: u32, estimated_total: u32) -> Self {
        let percent = if estimated_total == 0 {
            0
        } else {
            (f64::from(answered) * 100.0 / f64::from(estimated_total))
                .round()
                .min(100.0) as u8
        };
        Self {
            answered,
            estimated_total,
            percent,
        }
    }

    /// Progress of a finished session.
    pub fn complete(answered: u32) -> Self {
        Self {
            answered,
            estimated_total: answered,
            percent: 100,
        }
    }
}

/// Decides when a session has asked enough.
#[derive(Debug, Clone, Default)]
pub struct StoppingRule {
    config: StoppingConfig,
}

impl StoppingRule {
    pub fn new(config: StoppingConfig) -> Self {
        Self { config }
    }

    /// Bounds for a session covering `num_domains` domains.
    pub fn bounds(&self, num_domains: usize) -> QuestionBounds {
        let n = num_domains as f64;
        let min = (n * self.config.min_questions_per_domain).round() as u32;
        let max = (n * self.config.max_questions_per_domain).round() as u32;
        QuestionBounds {
            min: min.max(self.config.min_questions_floor),
            max: max.max(self.config.max_questions_floor),
        }
    }

    pub fn evaluate(&self, state: &AdaptiveState) -> StopDecision {
        let bounds = self.bounds(state.selected_domains.len());
        let total = state.total_questions;

        if total < bounds.min {
            return StopDecision::Continue;
        }
        if total >= bounds.max {
            return StopDecision::Stop(CompletionReason::MaxQuestions);
        }

        let confident = !state.axis_scores.is_empty()
            && state.axis_scores.values().all(|s| {
                s.n_answered >= self.config.min_answers_per_axis
                    && s.confidence >= self.config.target_confidence
            });
        if confident {
            StopDecision::Stop(CompletionReason::Confident)
        } else {
            StopDecision::Continue
        }
    }

    pub fn should_stop(&self, state: &AdaptiveState) -> bool {
        self.evaluate(state).is_stop()
    }

    /// Estimate how many questions the session will take in total.
    pub fn estimate_progress(&self, state: &AdaptiveState) -> Progress {
        let num_domains = state.selected_domains.len();
        let bounds = self.bounds(num_domains);
        let current = state.total_questions;

        let estimated = if current < bounds.min {
            bounds.min.max(current + 2 * num_domains as u32)
        } else {
            let target = self.config.target_confidence.max(f64::EPSILON);
            let remaining_fraction =
                ((target - state.mean_confidence()) / target).clamp(0.0, 1.0);
            let remaining =
                (remaining_fraction * f64::from(bounds.max.saturating_sub(current))).ceil() as u32;
            (current + remaining).min(bounds.max).max(current)
        };

        Progress::new(current, estimated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AxisScore, DomainId};

    fn state_with(num_domains: usize, total: u32, scores: &[(f64, u32)]) -> AdaptiveState {
        let domains = (0..num_domains)
            .map(|i| DomainId::new(format!("d{i}")))
            .collect();
        let mut state = AdaptiveState::new(domains);
        state.total_questions = total;
        state.set_scores(scores.iter().enumerate().map(|(i, &(confidence, n))| {
            AxisScore {
                axis_id: format!("a{i}").into(),
                value: 0.0,
                confidence,
                n_answered: n,
            }
        }));
        state
    }

    #[test]
    fn bounds_follow_domain_count() {
        let rule = StoppingRule::default();
        assert_eq!(rule.bounds(1), QuestionBounds { min: 8, max: 15 });
        assert_eq!(rule.bounds(2), QuestionBounds { min: 8, max: 15 });
        assert_eq!(rule.bounds(3), QuestionBounds { min: 9, max: 18 });
        assert_eq!(rule.bounds(5), QuestionBounds { min: 15, max: 30 });
    }

    #[test]
    fn never_stops_below_minimum() {
        let rule = StoppingRule::default();
        let state = state_with(2, 7, &[(0.99, 7)]);
        assert_eq!(rule.evaluate(&state), StopDecision::Continue);
    }

    #[test]
    fn stops_when_confident_between_bounds() {
        let rule = StoppingRule::default();
        let state = state_with(2, 8, &[(0.8, 4), (0.75, 4)]);
        assert_eq!(
            rule.evaluate(&state),
            StopDecision::Stop(CompletionReason::Confident)
        );
    }

    #[test]
    fn one_weak_axis_keeps_going() {
        let rule = StoppingRule::default();
        assert!(!rule.should_stop(&state_with(2, 10, &[(0.8, 4), (0.6, 4)])));
        assert!(!rule.should_stop(&state_with(2, 10, &[(0.8, 4), (0.9, 1)])));
    }

    #[test]
    fn empty_scores_never_stop_early() {
        let rule = StoppingRule::default();
        assert!(!rule.should_stop(&state_with(2, 12, &[])));
    }

    #[test]
    fn always_stops_at_maximum() {
        let rule = StoppingRule::default();
        let state = state_with(5, 30, &[(0.1, 1)]);
        assert_eq!(
            rule.evaluate(&state),
            StopDecision::Stop(CompletionReason::MaxQuestions)
        );
    }

    #[test]
    fn five_domains_window() {
        let rule = StoppingRule::default();
        for total in 0..15 {
            assert!(!rule.should_stop(&state_with(5, total, &[(1.0, 10)])));
        }
        assert!(rule.should_stop(&state_with(5, 15, &[(1.0, 10)])));
        assert!(rule.should_stop(&state_with(5, 30, &[])));
    }

    #[test]
    fn progress_below_minimum_uses_domain_estimate() {
        let rule = StoppingRule::default();
        // 2 domains: max(8, 3 + 4) = 8
        let progress = rule.estimate_progress(&state_with(2, 3, &[]));
        assert_eq!(progress.estimated_total, 8);
        assert_eq!(progress.answered, 3);
        assert_eq!(progress.percent, 38);
        // 2 domains at 6 answers: max(8, 6 + 4) = 10
        assert_eq!(
            rule.estimate_progress(&state_with(2, 6, &[])).estimated_total,
            10
        );
    }

    #[test]
    fn progress_above_minimum_extrapolates_from_confidence() {
        let rule = StoppingRule::default();
        // mean confidence 0.35 is half the target: half of the remaining 7 questions
        let progress = rule.estimate_progress(&state_with(2, 8, &[(0.35, 3)]));
        assert_eq!(progress.estimated_total, 12);

        // confident axes leave nothing remaining
        let done = rule.estimate_progress(&state_with(2, 9, &[(0.9, 3)]));
        assert_eq!(done.estimated_total, 9);
        assert_eq!(done.percent, 100);

        // never past the maximum
        let capped = rule.estimate_progress(&state_with(2, 14, &[]));
        assert_eq!(capped.estimated_total, 15);
    }

    #[test]
    fn completed_progress_is_full() {
        let progress = Progress::complete(11);
        assert_eq!(progress.estimated_total, 11);
        assert_eq!(progress.percent, 100);
    }
}
