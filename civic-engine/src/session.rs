//! Assessment session record and lifecycle state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AdaptiveState;
use crate::types::{DomainId, ItemId, SessionId, SwipeEvent, UserId};

/// Lifecycle status. Moves from `InProgress` to `Completed` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
}

impl SessionStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// Every scored axis reached the confidence target.
    Confident,
    /// The question budget for the selected domains was used up.
    MaxQuestions,
    /// No eligible items were left to ask. Scores may be below target.
    Exhausted,
    /// The caller ended the session explicitly.
    Manual,
}

impl CompletionReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confident => "confident",
            Self::MaxQuestions => "max_questions",
            Self::Exhausted => "exhausted",
            Self::Manual => "manual",
        }
    }
}

impl std::fmt::Display for CompletionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user's run through the survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSession {
    pub id: SessionId,
    pub user_id: Option<UserId>,
    pub status: SessionStatus,
    /// Set exactly when `status` is `Completed`.
    pub completion_reason: Option<CompletionReason>,
    pub state: AdaptiveState,
    /// Append-only answer log.
    pub swipes: Vec<SwipeEvent>,
    /// Item awaiting an answer; never one already answered.
    pub current_item_id: Option<ItemId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Store revision, bumped on every successful update.
    pub version: u64,
}

impl AssessmentSession {
    /// New in-progress session over the given domains.
    #[must_use]
    pub fn new(id: SessionId, user_id: Option<UserId>, selected_domains: Vec<DomainId>) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id,
            status: SessionStatus::InProgress,
            completion_reason: None,
            state: AdaptiveState::new(selected_domains),
            swipes: Vec::new(),
            current_item_id: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    #[must_use]
    pub fn selected_domains(&self) -> &[DomainId] {
        &self.state.selected_domains
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Mark the session completed. Has no effect on an already completed session.
    pub fn complete(&mut self, reason: CompletionReason) {
        if self.is_completed() {
            return;
        }
        self.status = SessionStatus::Completed;
        self.completion_reason = Some(reason);
        self.current_item_id = None;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_in_progress() {
        let session = AssessmentSession::new(
            SessionId::new("s1"),
            Some(UserId::new("u1")),
            vec!["econ".into()],
        );
        assert!(session.is_in_progress());
        assert!(session.completion_reason.is_none());
        assert_eq!(session.selected_domains(), &[DomainId::from("econ")]);
        assert_eq!(session.version, 0);
        assert_eq!(session.created_at, session.updated_at);
    }

    #[test]
    fn completion_is_irreversible() {
        let mut session = AssessmentSession::new(SessionId::new("s1"), None, vec![]);
        session.current_item_id = Some("econ-01".into());

        session.complete(CompletionReason::Exhausted);
        assert!(session.is_completed());
        assert!(session.current_item_id.is_none());
        assert_eq!(session.completion_reason, Some(CompletionReason::Exhausted));

        session.complete(CompletionReason::Manual);
        assert_eq!(session.completion_reason, Some(CompletionReason::Exhausted));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&CompletionReason::MaxQuestions).unwrap(),
            "\"max_questions\""
        );
    }
}
