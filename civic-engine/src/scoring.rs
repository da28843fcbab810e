//! Axis scoring from a swipe history.
//!
//! Scores are never updated incrementally: every call derives them from the
//! complete ordered history, so a score is always a pure function of the
//! answers recorded so far.
//!
//! ## Per-axis computation
//!
//! For every answer touching an axis with key `k` and response magnitude `m`:
//!
//! | Quantity | Contribution |
//! |----------|--------------|
//! | weighted sum | `m * k` |
//! | weight total | `|k|` |
//! | signal | `m * sign(k)` |
//! | evidence | 1, or `unsure_evidence` for `unsure` |
//!
//! The value is `weighted sum / weight total` projected into the axis range.
//! Confidence is `evidence / (evidence + half_point)` scaled down by the
//! population variance of the signals. Variance ignores order, so any
//! permutation of the history produces identical scores.

use std::collections::HashMap;

use crate::config::ScoringConfig;
use crate::spec::SurveySpec;
use crate::types::{AxisId, AxisScore, SwipeEvent};

#[derive(Debug, Default)]
struct AxisAccumulator {
    weighted_sum: f64,
    weight_total: f64,
    evidence: f64,
    signals: Vec<f64>,
}

impl AxisAccumulator {
    fn variance(&self) -> f64 {
        if self.signals.is_empty() {
            return 0.0;
        }
        let n = self.signals.len() as f64;
        let mean = self.signals.iter().sum::<f64>() / n;
        self.signals.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n
    }
}

/// Converts swipe histories into per-axis scores.
#[derive(Debug, Clone, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score every axis touched by at least one answer.
    ///
    /// Output follows spec axis order. Axes without answers are absent, not
    /// neutral. Swipes referencing unknown items are skipped.
    pub fn score_axes(&self, spec: &SurveySpec, swipes: &[SwipeEvent]) -> Vec<AxisScore> {
        let mut accumulators: HashMap<&AxisId, AxisAccumulator> = HashMap::new();

        for swipe in swipes {
            let Some(item) = spec.item(&swipe.item_id) else {
                tracing::warn!(item_id = %swipe.item_id, "Skipping swipe for unknown item");
                continue;
            };

            let magnitude = swipe.response.magnitude();
            let evidence = if swipe.response.is_unsure() {
                self.config.unsure_evidence
            } else {
                1.0
            };

            for key in &item.axes {
                let acc = accumulators.entry(&key.axis_id).or_default();
                acc.weighted_sum += magnitude * key.key;
                acc.weight_total += key.key.abs();
                acc.evidence += evidence;
                acc.signals.push(magnitude * key.key.signum());
            }
        }

        spec.axes()
            .iter()
            .filter_map(|axis| {
                let acc = accumulators.get(&axis.id)?;
                let normalized = if acc.weight_total > 0.0 {
                    acc.weighted_sum / acc.weight_total
                } else {
                    0.0
                };
                Some(AxisScore {
                    axis_id: axis.id.clone(),
                    value: axis.range.project(normalized),
                    confidence: self.confidence(acc),
                    n_answered: acc.signals.len() as u32,
                })
            })
            .collect()
    }

    fn confidence(&self, acc: &AxisAccumulator) -> f64 {
        let half = self.config.confidence_half_point.max(f64::EPSILON);
        let count_factor = acc.evidence / (acc.evidence + half);
        let consistency = 1.0 - self.config.variance_penalty * acc.variance();
        (count_factor * consistency).clamp(0.0, 1.0)
    }
}
