//! Error types for civic-engine

use thiserror::Error;

use crate::session::SessionStatus;
use crate::types::{ItemId, SessionId};

/// Error type for assessment engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// No session with this ID exists in the store
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    /// Session exists but no longer accepts answers
    #[error("Session {id} is not in progress (status: {status})")]
    NotInProgress { id: SessionId, status: SessionStatus },

    /// Item ID is not part of the survey spec
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Item was already answered in this session
    #[error("Item {item_id} was already answered in session {session_id}")]
    ItemAlreadyAnswered {
        session_id: SessionId,
        item_id: ItemId,
    },

    /// Item touches none of the session's selected domains
    #[error("Item {item_id} is outside the domains selected for session {session_id}")]
    ItemOutsideSelection {
        session_id: SessionId,
        item_id: ItemId,
    },

    /// Stored session changed since it was read
    #[error("Version conflict on session {id}: expected {expected}, found {actual}")]
    VersionConflict {
        id: SessionId,
        expected: u64,
        actual: u64,
    },

    /// A session with this ID is already stored
    #[error("Session already exists: {0}")]
    DuplicateSession(SessionId),

    /// Survey spec failed validation
    #[error("Invalid survey spec: {0}")]
    InvalidSpec(String),

    /// Response value outside the closed enumeration
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
