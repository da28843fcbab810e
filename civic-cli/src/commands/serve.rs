//! Civic serve command for running the HTTP API
//!
//! Settings come from the layered config file; flags override them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use civic_server::{AppState, CivicServer, ServerConfig};
use tracing::info;

use crate::config::{CivicConfig, ConfigLoader};

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Survey spec file (defaults to the bundled survey)
    #[arg(long)]
    pub spec: Option<PathBuf>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of loaded config
    fn apply(&self, mut config: CivicConfig) -> CivicConfig {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(spec) = &self.spec {
            config.spec.path = Some(spec.clone());
        }
        config
    }
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let config = args.apply(ConfigLoader::load()?);
    let spec = super::load_spec(config.spec.path.as_deref())?;

    info!(
        domains = spec.domains().len(),
        items = spec.items().len(),
        "Loaded survey spec"
    );
    info!("Starting civic server on {}:{}", config.server.host, config.server.port);

    let state = Arc::new(AppState::new(spec, config.engine));
    let server = CivicServer::with_state(
        ServerConfig::new(config.server.host, config.server.port),
        state,
    );
    server.run().await.map_err(Into::into)
}
