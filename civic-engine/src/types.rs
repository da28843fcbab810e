//! Identifier wrappers and per-answer value types shared across the engine.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// String wrapper for assessment session identifiers.
    SessionId
);
string_id!(
    /// String wrapper for user identifiers.
    UserId
);
string_id!(
    /// String wrapper for domain identifiers (e.g. `econ`).
    DomainId
);
string_id!(
    /// String wrapper for axis identifiers.
    AxisId
);
string_id!(
    /// String wrapper for item identifiers.
    ItemId
);

impl SessionId {
    /// Generate a fresh random session ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// A forced-choice answer to one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Response {
    StrongDisagree,
    Disagree,
    Agree,
    StrongAgree,
    Unsure,
}

impl Response {
    /// All response values, from most negative to neutral.
    pub const ALL: [Response; 5] = [
        Self::StrongDisagree,
        Self::Disagree,
        Self::Agree,
        Self::StrongAgree,
        Self::Unsure,
    ];

    /// Signed magnitude on the [-1, 1] response scale.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        match self {
            Self::StrongDisagree => -1.0,
            Self::Disagree => -0.5,
            Self::Agree => 0.5,
            Self::StrongAgree => 1.0,
            Self::Unsure => 0.0,
        }
    }

    #[must_use]
    pub fn is_unsure(self) -> bool {
        matches!(self, Self::Unsure)
    }

    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongDisagree => "strong_disagree",
            Self::Disagree => "disagree",
            Self::Agree => "agree",
            Self::StrongAgree => "strong_agree",
            Self::Unsure => "unsure",
        }
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Response {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| EngineError::InvalidResponse(s.to_string()))
    }
}

/// One recorded response to one item. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwipeEvent {
    pub item_id: ItemId,
    pub response: Response,
    pub timestamp: DateTime<Utc>,
}

impl SwipeEvent {
    /// Record a response to an item at the current time.
    #[must_use]
    pub fn now(item_id: ItemId, response: Response) -> Self {
        Self {
            item_id,
            response,
            timestamp: Utc::now(),
        }
    }
}

/// Derived position on one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisScore {
    pub axis_id: AxisId,
    /// Position within the axis's declared range.
    pub value: f64,
    /// Reliability of `value`, in [0, 1].
    pub confidence: f64,
    pub n_answered: u32,
}
