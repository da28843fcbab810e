//! civic-engine - Adaptive civic-values assessment
//!
//! This crate runs short adaptive surveys. A session picks the next statement
//! to show from the answers so far, re-scores every axis after each swipe, and
//! ends once the scores are confident enough or the question budget runs out.
//! Storage of sessions and user profiles sits behind async traits so callers
//! can swap in persistent backends.

pub mod config;
pub mod error;
pub mod manager;
pub mod profile;
pub mod scoring;
pub mod selection;
pub mod session;
pub mod spec;
pub mod state;
pub mod stopping;
pub mod store;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use config::{EngineConfig, ScoringConfig, SelectorConfig, StoppingConfig};
pub use error::{EngineError, Result};
pub use manager::{
    AnswerOutcome, AssessmentManager, CompletedAssessment, SessionSnapshot, StartedAssessment,
};
pub use profile::{InMemoryProfileSink, ProfileRecord, ProfileSink};
pub use scoring::Scorer;
pub use selection::{
    AdaptiveSelector, DomainCoverageStrategy, MaxInformationStrategy, Selection,
    SelectionContext, SelectionStrategy, UncertainAxisStrategy,
};
pub use session::{AssessmentSession, CompletionReason, SessionStatus};
pub use spec::{
    Axis, AxisKey, AxisRange, Domain, GovernmentLevel, Item, SpecRepository,
    StaticSpecRepository, SurveySpec,
};
pub use state::AdaptiveState;
pub use stopping::{Progress, QuestionBounds, StopDecision, StoppingRule};
pub use store::{InMemorySessionStore, SessionStore};
pub use types::*;
