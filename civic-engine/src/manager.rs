//! AssessmentManager: session lifecycle orchestration
//!
//! The manager is the only writer of session state. It reads sessions from a
//! [`SessionStore`], applies one operation, and writes them back with a
//! versioned update. Scores are always re-derived from the swipe log.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::profile::ProfileSink;
use crate::scoring::Scorer;
use crate::selection::AdaptiveSelector;
use crate::session::{AssessmentSession, CompletionReason};
use crate::spec::{Item, SpecRepository, SurveySpec};
use crate::stopping::{Progress, StopDecision, StoppingRule};
use crate::store::SessionStore;
use crate::types::{AxisScore, DomainId, ItemId, Response, SessionId, SwipeEvent, UserId};

/// Result of starting an assessment.
#[derive(Debug, Clone)]
pub struct StartedAssessment {
    pub session: AssessmentSession,
    /// `None` when the domain selection has no eligible items.
    pub first_question: Option<Item>,
    pub progress: Progress,
}

/// Result of recording one answer.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub session: AssessmentSession,
    pub next_question: Option<Item>,
    pub scores: Vec<AxisScore>,
    pub progress: Progress,
    pub is_complete: bool,
}

/// Result of completing an assessment.
#[derive(Debug, Clone)]
pub struct CompletedAssessment {
    pub session: AssessmentSession,
    pub final_scores: Vec<AxisScore>,
    pub profile_saved: bool,
}

/// Read-only view of a session with derived data.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session: AssessmentSession,
    pub current_question: Option<Item>,
    pub scores: Vec<AxisScore>,
    pub progress: Progress,
}

/// Orchestrates selector, scorer and stopping rule across session lifetimes.
pub struct AssessmentManager {
    spec: Arc<dyn SpecRepository>,
    store: Arc<dyn SessionStore>,
    selector: AdaptiveSelector,
    scorer: Scorer,
    stopping: StoppingRule,
    profile_sink: Option<Arc<dyn ProfileSink>>,
}

impl AssessmentManager {
    /// Create a manager with the standard selection chain.
    pub fn new(
        spec: Arc<dyn SpecRepository>,
        store: Arc<dyn SessionStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            spec,
            store,
            selector: AdaptiveSelector::new(config.selector),
            scorer: Scorer::new(config.scoring),
            stopping: StoppingRule::new(config.stopping),
            profile_sink: None,
        }
    }

    /// Replace the selector (for custom strategy chains).
    #[must_use]
    pub fn with_selector(mut self, selector: AdaptiveSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Attach a profile sink used by `complete_assessment`.
    #[must_use]
    pub fn with_profile_sink(mut self, sink: Arc<dyn ProfileSink>) -> Self {
        self.profile_sink = Some(sink);
        self
    }

    pub fn spec(&self) -> &SurveySpec {
        self.spec.spec()
    }

    pub fn stopping_rule(&self) -> &StoppingRule {
        &self.stopping
    }

    /// Keep known domain IDs in request order, falling back to every domain.
    pub fn resolve_domains(&self, requested: Option<&[DomainId]>) -> Vec<DomainId> {
        let spec = self.spec();
        let mut selected: Vec<DomainId> = Vec::new();
        for id in requested.unwrap_or_default() {
            if spec.domain(id).is_none() {
                tracing::debug!(domain = %id, "Dropping unknown domain");
                continue;
            }
            if !selected.contains(id) {
                selected.push(id.clone());
            }
        }
        if selected.is_empty() {
            spec.domain_ids()
        } else {
            selected
        }
    }

    fn new_session(
        &self,
        selected_domains: Option<&[DomainId]>,
        user_id: Option<UserId>,
    ) -> AssessmentSession {
        let domains = self.resolve_domains(selected_domains);
        AssessmentSession::new(SessionId::generate(), user_id, domains)
    }

    async fn load(&self, id: &SessionId) -> Result<AssessmentSession> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| EngineError::SessionNotFound(id.clone()))
    }

    /// Create and store a session without selecting a first item.
    pub async fn create_session(
        &self,
        selected_domains: Option<&[DomainId]>,
        user_id: Option<UserId>,
    ) -> Result<AssessmentSession> {
        let session = self.new_session(selected_domains, user_id);
        self.store.insert(session.clone()).await?;
        tracing::info!(
            session_id = %session.id,
            domains = session.selected_domains().len(),
            "Created assessment session"
        );
        Ok(session)
    }

    pub async fn get_session(&self, id: &SessionId) -> Result<Option<AssessmentSession>> {
        self.store.get(id).await
    }

    /// Remove a session. Returns whether it existed.
    pub async fn delete_session(&self, id: &SessionId) -> Result<bool> {
        let removed = self.store.remove(id).await?;
        if removed {
            tracing::info!(session_id = %id, "Deleted assessment session");
        }
        Ok(removed)
    }

    pub async fn session_count(&self) -> Result<usize> {
        self.store.len().await
    }

    /// Create a session and pick its first question.
    pub async fn start_assessment(
        &self,
        selected_domains: Option<&[DomainId]>,
        user_id: Option<UserId>,
    ) -> Result<StartedAssessment> {
        let mut session = self.new_session(selected_domains, user_id);
        let first_question = self
            .selector
            .select_next(self.spec(), &session.state)
            .map(|s| s.item.clone());

        match &first_question {
            Some(item) => session.current_item_id = Some(item.id.clone()),
            None => tracing::warn!(
                session_id = %session.id,
                "No questions available for domain selection"
            ),
        }

        self.store.insert(session.clone()).await?;
        tracing::info!(
            session_id = %session.id,
            domains = session.selected_domains().len(),
            "Started assessment"
        );

        let progress = self.progress(&session);
        Ok(StartedAssessment {
            session,
            first_question,
            progress,
        })
    }

    /// Record an answer and advance the session.
    ///
    /// Fails without touching stored state when the session is missing or
    /// completed, or the item is unknown, already answered, or outside the
    /// selected domains.
    pub async fn submit_answer(
        &self,
        session_id: &SessionId,
        item_id: &ItemId,
        response: Response,
    ) -> Result<AnswerOutcome> {
        let mut session = self.load(session_id).await?;
        if !session.is_in_progress() {
            return Err(EngineError::NotInProgress {
                id: session.id,
                status: session.status,
            });
        }

        let spec = self.spec();
        let item = spec
            .item(item_id)
            .ok_or_else(|| EngineError::ItemNotFound(item_id.clone()))?;
        if session.state.is_answered(item_id) {
            return Err(EngineError::ItemAlreadyAnswered {
                session_id: session.id,
                item_id: item_id.clone(),
            });
        }
        if !session.state.covers_item(item, spec) {
            return Err(EngineError::ItemOutsideSelection {
                session_id: session.id,
                item_id: item_id.clone(),
            });
        }
        if session.current_item_id.as_ref() != Some(item_id) {
            tracing::debug!(
                session_id = %session.id,
                item_id = %item_id,
                "Answer is for an item other than the current question"
            );
        }

        session.swipes.push(SwipeEvent::now(item_id.clone(), response));
        session.state.record_answer(item, spec);
        let scores = self.scorer.score_axes(spec, &session.swipes);
        session.state.set_scores(scores.iter().cloned());

        let next_question = match self.stopping.evaluate(&session.state) {
            StopDecision::Stop(reason) => {
                session.complete(reason);
                None
            }
            StopDecision::Continue => {
                let next = self
                    .selector
                    .select_next(spec, &session.state)
                    .map(|s| s.item.clone());
                match next {
                    Some(item) => {
                        session.current_item_id = Some(item.id.clone());
                        session.touch();
                        Some(item)
                    }
                    None => {
                        session.complete(CompletionReason::Exhausted);
                        None
                    }
                }
            }
        };

        let session = self.store.update(session).await?;
        if let Some(reason) = session.completion_reason {
            tracing::info!(
                session_id = %session.id,
                questions = session.state.total_questions,
                reason = %reason,
                "Assessment completed"
            );
        }

        let progress = self.progress(&session);
        let is_complete = session.is_completed();
        Ok(AnswerOutcome {
            session,
            next_question,
            scores,
            progress,
            is_complete,
        })
    }

    /// Force-complete a session and return scores derived from its full history.
    ///
    /// An already completed session is returned as is. When `save_to_profile`
    /// is set and the session has a user, scores go to the profile sink.
    pub async fn complete_assessment(
        &self,
        session_id: &SessionId,
        save_to_profile: bool,
    ) -> Result<CompletedAssessment> {
        let mut session = self.load(session_id).await?;
        let final_scores = self.scorer.score_axes(self.spec(), &session.swipes);

        if session.is_in_progress() {
            session.state.set_scores(final_scores.iter().cloned());
            session.complete(CompletionReason::Manual);
            session = self.store.update(session).await?;
            tracing::info!(
                session_id = %session.id,
                questions = session.state.total_questions,
                "Assessment completed manually"
            );
        }

        let profile_saved = save_to_profile && self.save_profile(&session, &final_scores).await;

        Ok(CompletedAssessment {
            session,
            final_scores,
            profile_saved,
        })
    }

    async fn save_profile(&self, session: &AssessmentSession, scores: &[AxisScore]) -> bool {
        let Some(user_id) = &session.user_id else {
            tracing::debug!(session_id = %session.id, "No user on session, skipping profile save");
            return false;
        };
        let Some(sink) = &self.profile_sink else {
            tracing::debug!(session_id = %session.id, "No profile sink configured");
            return false;
        };

        match sink.save(user_id, session, scores).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(session_id = %session.id, error = %e, "Failed to save profile");
                false
            }
        }
    }

    /// The item currently awaiting an answer.
    pub async fn current_question(&self, session_id: &SessionId) -> Result<Option<Item>> {
        let session = self.load(session_id).await?;
        Ok(self.question_for(&session))
    }

    /// Scores re-derived from the session's swipe log.
    pub async fn session_scores(&self, session_id: &SessionId) -> Result<Vec<AxisScore>> {
        let session = self.load(session_id).await?;
        Ok(self.scorer.score_axes(self.spec(), &session.swipes))
    }

    /// Session plus current question, derived scores and progress.
    pub async fn snapshot(&self, session_id: &SessionId) -> Result<Option<SessionSnapshot>> {
        let Some(session) = self.store.get(session_id).await? else {
            return Ok(None);
        };
        let current_question = self.question_for(&session);
        let scores = self.scorer.score_axes(self.spec(), &session.swipes);
        let progress = self.progress(&session);
        Ok(Some(SessionSnapshot {
            session,
            current_question,
            scores,
            progress,
        }))
    }

    /// Progress for a session; completed sessions report 100%.
    pub fn progress(&self, session: &AssessmentSession) -> Progress {
        if session.is_completed() {
            Progress::complete(session.state.total_questions)
        } else {
            self.stopping.estimate_progress(&session.state)
        }
    }

    fn question_for(&self, session: &AssessmentSession) -> Option<Item> {
        session
            .current_item_id
            .as_ref()
            .and_then(|id| self.spec.item_by_id(id))
            .cloned()
    }
}

impl std::fmt::Debug for AssessmentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssessmentManager")
            .field("selector", &self.selector)
            .field("scorer", &self.scorer)
            .field("stopping", &self.stopping)
            .field("profile_sink", &self.profile_sink.is_some())
            .finish()
    }
}
