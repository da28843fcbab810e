//! Engine configuration types.
//!
//! Provides thresholds for question selection, confidence scoring, and the
//! stopping rule. Every section deserializes with defaults, so a partial TOML
//! table only overrides what it names.

use serde::{Deserialize, Serialize};

/// Main configuration for the assessment engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Adaptive question selection thresholds.
    pub selector: SelectorConfig,
    /// Axis score and confidence computation.
    pub scoring: ScoringConfig,
    /// When to end a session.
    pub stopping: StoppingConfig,
}

/// Thresholds for the three selection phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Domain-coverage phase runs while fewer than this many questions are answered.
    pub coverage_phase_questions: u32,
    /// Uncertain-axis phase runs while fewer than this many questions are answered.
    pub uncertainty_phase_questions: u32,
    /// Domains with coverage below `mean + coverage_slack` count as under-covered.
    pub coverage_slack: f64,
    /// Axes below this confidence count as uncertain.
    pub confidence_threshold: f64,
    /// Axes with fewer answers than this count as uncertain.
    pub min_answers_per_axis: u32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            coverage_phase_questions: 10,
            uncertainty_phase_questions: 20,
            coverage_slack: 1.0,
            confidence_threshold: 0.7,
            min_answers_per_axis: 3,
        }
    }
}

/// Parameters of the confidence curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Evidence at which the count factor reaches one half.
    pub confidence_half_point: f64,
    /// Evidence contributed by an `unsure` answer (decisive answers contribute 1).
    pub unsure_evidence: f64,
    /// How strongly answer disagreement (variance) lowers confidence.
    pub variance_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            confidence_half_point: 2.0,
            unsure_evidence: 0.5,
            variance_penalty: 0.5,
        }
    }
}

/// Question bounds and confidence target for ending a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoppingConfig {
    /// Every scored axis must reach this confidence to stop early.
    pub target_confidence: f64,
    /// Every scored axis must have at least this many answers to stop early.
    pub min_answers_per_axis: u32,
    /// Lower bound on the minimum question count.
    pub min_questions_floor: u32,
    /// Minimum questions contributed per selected domain.
    pub min_questions_per_domain: f64,
    /// Lower bound on the maximum question count.
    pub max_questions_floor: u32,
    /// Maximum questions contributed per selected domain.
    pub max_questions_per_domain: f64,
}

impl Default for StoppingConfig {
    fn default() -> Self {
        Self {
            target_confidence: 0.7,
            min_answers_per_axis: 2,
            min_questions_floor: 8,
            min_questions_per_domain: 3.0,
            max_questions_floor: 15,
            max_questions_per_domain: 6.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_default_values() {
        let config = EngineConfig::default();

        assert_eq!(config.selector.coverage_phase_questions, 10);
        assert_eq!(config.selector.uncertainty_phase_questions, 20);
        assert_eq!(config.selector.coverage_slack, 1.0);
        assert_eq!(config.selector.confidence_threshold, 0.7);
        assert_eq!(config.selector.min_answers_per_axis, 3);
        assert_eq!(config.scoring.confidence_half_point, 2.0);
        assert_eq!(config.scoring.unsure_evidence, 0.5);
        assert_eq!(config.scoring.variance_penalty, 0.5);
        assert_eq!(config.stopping.target_confidence, 0.7);
        assert_eq!(config.stopping.min_answers_per_axis, 2);
        assert_eq!(config.stopping.min_questions_floor, 8);
        assert_eq!(config.stopping.max_questions_floor, 15);
    }

    #[test]
    fn engine_config_serialization_roundtrip() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string(&config).expect("serialize to toml");
        let parsed: EngineConfig = toml::from_str(&toml_str).expect("parse from toml");
        assert_eq!(config, parsed);
    }

    #[test]
    fn engine_config_partial_deserialize() {
        let toml_str = r#"
            [stopping]
            target_confidence = 0.8
            [selector]
            coverage_phase_questions = 4
        "#;

        let config: EngineConfig = toml::from_str(toml_str).expect("parse partial config");

        // Explicitly set values
        assert_eq!(config.stopping.target_confidence, 0.8);
        assert_eq!(config.selector.coverage_phase_questions, 4);

        // Default values for unspecified fields
        assert_eq!(config.stopping.min_questions_floor, 8);
        assert_eq!(config.selector.uncertainty_phase_questions, 20);
        assert_eq!(config.scoring, ScoringConfig::default());
    }
}
