//! Hand-off of final scores to a user profile.
//!
//! Persisting results belongs to whoever owns user profiles; the engine only
//! calls a [`ProfileSink`] when a completed session asks to be saved.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::Result;
use crate::session::AssessmentSession;
use crate::types::{AxisScore, SessionId, UserId};

/// Final scores saved for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: UserId,
    pub session_id: SessionId,
    pub scores: Vec<AxisScore>,
    pub saved_at: DateTime<Utc>,
}

/// Destination for completed assessment results.
#[async_trait]
pub trait ProfileSink: Send + Sync {
    /// Save final scores for the session's user.
    async fn save(
        &self,
        user_id: &UserId,
        session: &AssessmentSession,
        scores: &[AxisScore],
    ) -> Result<()>;
}

/// Keeps the latest record per user in memory.
#[derive(Debug, Default)]
pub struct InMemoryProfileSink {
    profiles: RwLock<HashMap<UserId, ProfileRecord>>,
}

impl InMemoryProfileSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest saved record for a user.
    pub async fn profile(&self, user_id: &UserId) -> Option<ProfileRecord> {
        self.profiles.read().await.get(user_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProfileSink for InMemoryProfileSink {
    async fn save(
        &self,
        user_id: &UserId,
        session: &AssessmentSession,
        scores: &[AxisScore],
    ) -> Result<()> {
        let record = ProfileRecord {
            user_id: user_id.clone(),
            session_id: session.id.clone(),
            scores: scores.to_vec(),
            saved_at: Utc::now(),
        };
        self.profiles.write().await.insert(user_id.clone(), record);
        Ok(())
    }
}
