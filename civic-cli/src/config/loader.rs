use super::types::{
    CivicConfig, DEFAULT_HOST, DEFAULT_PORT, RawCivicConfig, RawServerConfig, ServerConfig,
    SpecConfig,
};
use anyhow::{Context, Result};
use civic_engine::EngineConfig;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<CivicConfig> {
        Self::load_layers(Self::user_config_path().as_deref(), &Self::project_config_path())
    }

    /// Merge the given layers in order; missing files are skipped
    pub fn load_layers(user_path: Option<&Path>, project_path: &Path) -> Result<CivicConfig> {
        let mut raw = RawCivicConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user_path
            && let Some(user_config) = Self::read_raw(user_path)?
        {
            raw = Self::merge_raw(raw, user_config);
        }

        // Layer 2: Project config
        if let Some(project_config) = Self::read_raw(project_path)? {
            raw = Self::merge_raw(raw, project_config);
        }

        Self::finalize(raw)
    }

    fn read_raw(path: &Path) -> Result<Option<RawCivicConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let raw = toml::from_str(&contents)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded config layer");
        Ok(Some(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "civic").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with CIVIC_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("CIVIC_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".civic/config.toml")
        }
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawCivicConfig, overlay: RawCivicConfig) -> RawCivicConfig {
        RawCivicConfig {
            server: RawServerConfig {
                host: overlay.server.host.or(base.server.host),
                port: overlay.server.port.or(base.server.port),
            },
            spec: SpecConfig {
                path: overlay.spec.path.or(base.spec.path),
            },
            engine: match (base.engine, overlay.engine) {
                (Some(base), Some(overlay)) => Some(Self::merge_tables(base, overlay)),
                (base, overlay) => overlay.or(base),
            },
        }
    }

    /// Recursively merge TOML tables; overlay keys win, nested tables merge
    fn merge_tables(mut base: toml::Table, overlay: toml::Table) -> toml::Table {
        for (key, value) in overlay {
            let merged = match (base.remove(&key), value) {
                (Some(toml::Value::Table(inner)), toml::Value::Table(overlay_inner)) => {
                    toml::Value::Table(Self::merge_tables(inner, overlay_inner))
                }
                (_, value) => value,
            };
            base.insert(key, merged);
        }
        base
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawCivicConfig) -> Result<CivicConfig> {
        let engine = match raw.engine {
            Some(table) => toml::Value::Table(table)
                .try_into::<EngineConfig>()
                .context("Invalid [engine] config")?,
            None => EngineConfig::default(),
        };

        Ok(CivicConfig {
            server: ServerConfig {
                host: raw.server.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port: raw.server.port.unwrap_or(DEFAULT_PORT),
            },
            spec: raw.spec,
            engine,
        })
    }
}
