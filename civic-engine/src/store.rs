//! Session storage abstraction.
//!
//! The session manager never holds sessions itself; it reads and writes them
//! through a [`SessionStore`]. Updates are compare-and-swap on
//! [`AssessmentSession::version`], so two writers racing on one session
//! cannot both commit.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{EngineError, Result};
use crate::session::AssessmentSession;
use crate::types::SessionId;

/// Trait for assessment session storage.
///
/// Implementations must support:
/// - Insert of new sessions (rejecting duplicate IDs)
/// - Versioned updates that fail when the stored version moved on
/// - Removal by ID
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a session by ID.
    async fn get(&self, id: &SessionId) -> Result<Option<AssessmentSession>>;

    /// Store a new session.
    async fn insert(&self, session: AssessmentSession) -> Result<()>;

    /// Replace a stored session if its version still matches.
    ///
    /// `session.version` must equal the stored version. On success the stored
    /// copy gets `version + 1` and is returned.
    async fn update(&self, session: AssessmentSession) -> Result<AssessmentSession>;

    /// Remove a session. Returns whether it existed.
    async fn remove(&self, id: &SessionId) -> Result<bool>;

    /// Number of stored sessions.
    async fn len(&self) -> Result<usize>;
}

/// Process-lifetime store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, AssessmentSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<AssessmentSession>> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn insert(&self, session: AssessmentSession) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(EngineError::DuplicateSession(session.id));
        }
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn update(&self, mut session: AssessmentSession) -> Result<AssessmentSession> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&session.id)
            .ok_or_else(|| EngineError::SessionNotFound(session.id.clone()))?;

        if stored.version != session.version {
            return Err(EngineError::VersionConflict {
                id: session.id,
                expected: session.version,
                actual: stored.version,
            });
        }

        session.version += 1;
        *stored = session.clone();
        Ok(session)
    }

    async fn remove(&self, id: &SessionId) -> Result<bool> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.sessions.read().await.len())
    }
}
