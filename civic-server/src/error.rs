//! Server error types

use civic_engine::EngineError;
use thiserror::Error;

/// Errors that can occur in the civic server
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified address
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Engine setup failed (for example an invalid survey spec)
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The accept loop stopped with an IO error
    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}
