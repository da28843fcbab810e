//! Shared application state for the civic server

use std::sync::Arc;

use chrono::{DateTime, Utc};
use civic_engine::{
    AssessmentManager, EngineConfig, InMemoryProfileSink, InMemorySessionStore, SessionStore,
    SpecRepository, StaticSpecRepository, SurveySpec,
};

use crate::ServerError;

/// Shared application state accessible by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Assessment session manager
    pub manager: Arc<AssessmentManager>,
    /// Saved profiles from completed assessments
    pub profiles: Arc<InMemoryProfileSink>,
    /// When the server started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create state over a spec with in-memory sessions and profiles
    pub fn new(spec: SurveySpec, config: EngineConfig) -> Self {
        let spec: Arc<dyn SpecRepository> = Arc::new(StaticSpecRepository::new(spec));
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let profiles = Arc::new(InMemoryProfileSink::new());
        let manager = AssessmentManager::new(spec, store, config).with_profile_sink(profiles.clone());

        Self::with_components(Arc::new(manager), profiles)
    }

    /// Create state over the bundled survey with default engine settings
    pub fn bundled() -> Result<Self, ServerError> {
        Ok(Self::new(SurveySpec::bundled()?, EngineConfig::default()))
    }

    /// Create AppState with custom components (for testing)
    pub fn with_components(
        manager: Arc<AssessmentManager>,
        profiles: Arc<InMemoryProfileSink>,
    ) -> Self {
        Self {
            manager,
            profiles,
            started_at: Utc::now(),
        }
    }

    /// Returns how long the server has been running
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
