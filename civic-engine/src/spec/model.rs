//! Reference data types: domains, axes and items.
//!
//! All of these are immutable once loaded into a [`SurveySpec`](super::SurveySpec).

use serde::{Deserialize, Serialize};

use crate::types::{AxisId, DomainId, ItemId};

/// A thematic grouping of related axes (e.g. economy, health).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub id: DomainId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Output range an axis score is projected into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub const SYMMETRIC: AxisRange = AxisRange {
        min: -1.0,
        max: 1.0,
    };

    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map a normalized value in [-1, 1] linearly onto this range.
    #[must_use]
    pub fn project(&self, normalized: f64) -> f64 {
        let t = (normalized.clamp(-1.0, 1.0) + 1.0) / 2.0;
        self.min + t * (self.max - self.min)
    }

    /// Midpoint of the range.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

impl Default for AxisRange {
    fn default() -> Self {
        Self::SYMMETRIC
    }
}

impl From<[f64; 2]> for AxisRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<AxisRange> for [f64; 2] {
    fn from(range: AxisRange) -> Self {
        [range.min, range.max]
    }
}

/// A single left/right policy spectrum with two labeled poles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub id: AxisId,
    pub domain_id: DomainId,
    pub name: String,
    /// Label of the pole reached by consistently negative keyed answers.
    pub pole_low: String,
    /// Label of the pole reached by consistently positive keyed answers.
    pub pole_high: String,
    #[serde(default)]
    pub range: AxisRange,
}

/// How one item pushes one axis. Positive keys move agreement toward `pole_high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisKey {
    pub axis_id: AxisId,
    pub key: f64,
}

/// Level of government an item is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GovernmentLevel {
    #[default]
    Federal,
    State,
    Local,
}

impl GovernmentLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "federal",
            Self::State => "state",
            Self::Local => "local",
        }
    }
}

impl std::fmt::Display for GovernmentLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single forced-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub axes: Vec<AxisKey>,
    #[serde(default)]
    pub level: GovernmentLevel,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    /// Number of distinct axes this item touches.
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Whether the item carries a key for `axis_id`.
    #[must_use]
    pub fn touches_axis(&self, axis_id: &AxisId) -> bool {
        self.axes.iter().any(|k| &k.axis_id == axis_id)
    }
}
