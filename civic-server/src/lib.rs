//! civic-server - HTTP API for the civic-values assessment engine
//!
//! This crate exposes the assessment lifecycle (start, answer, complete,
//! inspect, delete) and the survey catalogue as a JSON API over axum.

mod error;
pub mod http;
mod state;

use std::sync::Arc;

use tokio::net::TcpListener;

pub use error::ServerError;
pub use http::create_router;
pub use state::AppState;

/// The civic assessment server
pub struct CivicServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl CivicServer {
    /// Create a server with the given state
    pub fn with_state(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the shared application state
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Bind the configured address and serve until the process exits
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.run_with_listener(listener).await
    }

    /// Serve on a listener the caller already bound (port 0 in tests)
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), ServerError> {
        if let Ok(local) = listener.local_addr() {
            tracing::info!(%local, "civic server listening");
        }
        axum::serve(listener, create_router(self.state))
            .await
            .map_err(ServerError::Serve)
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7433,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfig with the specified host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Returns the socket address string (e.g., "127.0.0.1:7433")
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
