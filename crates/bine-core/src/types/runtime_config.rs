//! Runtime configuration types for operational parameters
//!
//! These types control network access, retries and the cache location. They
//! are layered by `RuntimeConfigLoader`; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Network and HTTP configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Retry policy for HTTP requests
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Base directory for the binary cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Token for the GitHub API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
}

/// Network and HTTP configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// HTTP timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// User agent string for HTTP requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// GitHub REST API base URL
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Package index base URL used for latest-version lookups
    #[serde(default = "default_go_index_url")]
    pub go_index_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
            github_api_url: default_github_api_url(),
            go_index_url: default_go_index_url(),
        }
    }
}

fn default_http_timeout() -> u64 {
    300
}
fn default_user_agent() -> String {
    format!("bine/{}", env!("CARGO_PKG_VERSION"))
}
fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}
fn default_go_index_url() -> String {
    "https://pkg.go.dev".to_string()
}

/// Retry policy for an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Retry strategy
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Backoff multiplier for exponential strategies
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: RetryStrategy::default(),
            backoff_multiplier: default_backoff_multiplier(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_initial_delay() -> u64 {
    500
}
fn default_max_delay() -> u64 {
    10000
}

/// Retry strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RetryStrategy {
    /// Retry immediately
    None,

    /// Fixed delay between retries
    FixedDelay,

    /// Exponential backoff (default)
    #[default]
    ExponentialBackoff,

    /// Linear backoff
    LinearBackoff,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.network.http_timeout_secs, 300);
        assert!(config.network.user_agent.starts_with("bine/"));
        assert_eq!(config.network.github_api_url, "https://api.github.com");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.strategy, RetryStrategy::ExponentialBackoff);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "network:\n  http-timeout-secs: 30\nretry:\n  strategy: fixed-delay\n";
        let config: RuntimeConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.network.http_timeout_secs, 30);
        assert_eq!(config.network.go_index_url, "https://pkg.go.dev");
        assert_eq!(config.retry.strategy, RetryStrategy::FixedDelay);
        assert_eq!(config.retry.max_attempts, 3);
    }
}
