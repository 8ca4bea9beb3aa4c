//! Common test infrastructure for bine-providers tests

#![allow(dead_code)]

pub mod mock_server;

use bine_core::types::RetryStrategy;
use bine_core::{BinSpec, RuntimeConfig};
use bine_providers::ProviderContext;
use wiremock::MockServer;

/// Runtime configuration with every endpoint pointed at the mock server
pub fn config_for(server: &MockServer) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.network.github_api_url = server.uri();
    config.network.go_index_url = server.uri();
    config.network.http_timeout_secs = 5;
    config.retry.strategy = RetryStrategy::None;
    config
}

pub fn context_for(server: &MockServer) -> ProviderContext {
    ProviderContext::from_config(&config_for(server)).expect("provider context")
}

pub fn github_spec(name: &str, repo_url: &str, version: &str) -> BinSpec {
    let mut spec = BinSpec {
        name: name.to_string(),
        version: version.to_string(),
        url: Some(repo_url.to_string()),
        ..Default::default()
    };
    spec.bind_provider().expect("github provider");
    spec
}

pub fn go_spec(name: &str, package: &str, version: &str) -> BinSpec {
    let mut spec = BinSpec {
        name: name.to_string(),
        version: version.to_string(),
        go_package: Some(package.to_string()),
        ..Default::default()
    };
    spec.bind_provider().expect("registry provider");
    spec
}
