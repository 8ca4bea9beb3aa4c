//! Layered runtime configuration loader
//!
//! Precedence (low to high):
//! 1. Built-in defaults
//! 2. User runtime file (`<config dir>/bine/runtime.yaml`)
//! 3. Environment variables (`BINE_*` prefix)
//! 4. CLI flags (applied by the caller)

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use camino::{Utf8Path, Utf8PathBuf};
use std::env;
use std::fs;
use tracing::debug;

/// Name of the optional runtime file inside the config directory
pub const RUNTIME_CONFIG_FILE: &str = "runtime.yaml";

/// Loads `RuntimeConfig` from its layers
pub struct RuntimeConfigLoader {
    config_dir: Option<Utf8PathBuf>,
}

impl RuntimeConfigLoader {
    /// Loader rooted at the user's configuration directory
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .and_then(|p| Utf8PathBuf::from_path_buf(p).ok())
            .map(|p| p.join("bine"));
        Self { config_dir }
    }

    /// Loader with a custom config directory
    pub fn with_dir(config_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config_dir: Some(config_dir.into()),
        }
    }

    /// Load the runtime configuration with all layers applied
    pub fn load(&self) -> Result<RuntimeConfig> {
        let mut config = RuntimeConfig::default();

        if let Some(dir) = &self.config_dir {
            let path = dir.join(RUNTIME_CONFIG_FILE);
            if path.exists() {
                debug!(path = %path, "loading runtime configuration");
                config = Self::load_yaml_file(&path)?;
            }
        }

        Self::apply_env_overrides(config)
    }

    fn load_yaml_file(path: &Utf8Path) -> Result<RuntimeConfig> {
        let content = fs::read_to_string(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::config_invalid(path.as_str(), e.to_string()))
    }

    fn apply_env_overrides(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
        if let Ok(val) = env::var("BINE_HTTP_TIMEOUT_SECS") {
            config.network.http_timeout_secs = val.parse().map_err(|_| {
                Error::config_invalid("BINE_HTTP_TIMEOUT_SECS", "must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("BINE_RETRY_MAX_ATTEMPTS") {
            config.retry.max_attempts = val.parse().map_err(|_| {
                Error::config_invalid("BINE_RETRY_MAX_ATTEMPTS", "must be a valid number")
            })?;
        }

        if let Ok(val) = env::var("BINE_GITHUB_API_URL") {
            config.network.github_api_url = val;
        }

        if let Ok(val) = env::var("BINE_GO_INDEX_URL") {
            config.network.go_index_url = val;
        }

        Ok(config)
    }
}

impl Default for RuntimeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
