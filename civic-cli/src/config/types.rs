use civic_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawCivicConfig {
    #[serde(default)]
    pub server: RawServerConfig,

    #[serde(default)]
    pub spec: SpecConfig,

    /// Engine tuning tables, merged key by key across layers
    #[serde(default)]
    pub engine: Option<toml::Table>,
}

/// Server config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawServerConfig {
    /// Host for the civic server
    pub host: Option<String>,

    /// Port for the civic server
    pub port: Option<u16>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CivicConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub spec: SpecConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host for the civic server
    pub host: String,

    /// Port for the civic server
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpecConfig {
    /// Survey spec file; the bundled survey is used when unset
    pub path: Option<PathBuf>,
}

/// Default host for the civic server
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port for the civic server
pub const DEFAULT_PORT: u16 = 7433;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = CivicConfig::default();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.spec.path.is_none());
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = CivicConfig {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            spec: SpecConfig {
                path: Some(PathBuf::from("/tmp/survey.toml")),
            },
            ..Default::default()
        };
        config.engine.stopping.target_confidence = 0.8;

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: CivicConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.spec.path, Some(PathBuf::from("/tmp/survey.toml")));
        assert_eq!(parsed.engine.stopping.target_confidence, 0.8);
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[server]
port = 9000

[engine.selector]
coverage_phase_questions = 6
"#;
        let raw: RawCivicConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(raw.server.port, Some(9000));
        assert!(raw.server.host.is_none());
        assert!(raw.spec.path.is_none());
        let engine = raw.engine.unwrap();
        assert_eq!(
            engine["selector"]["coverage_phase_questions"].as_integer(),
            Some(6)
        );
        assert!(!engine.contains_key("stopping"));
    }
}
