//! Manifest fixtures and `Bine` construction

use bine_core::types::RetryStrategy;
use bine_core::{PlatformIdentity, RuntimeConfig, MANIFEST_FILE};
use bine_install::{Bine, BineOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

use super::runner::FakeRunner;

/// A project directory and a separate cache directory
pub struct Workspace {
    pub project: TempDir,
    pub cache: TempDir,
}

impl Workspace {
    pub fn new(manifest: &str) -> Self {
        let project = TempDir::new().expect("project dir");
        std::fs::write(project.path().join(MANIFEST_FILE), manifest).expect("write manifest");
        Self {
            project,
            cache: TempDir::new().expect("cache dir"),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project.path().join(MANIFEST_FILE)
    }

    pub fn manifest(&self) -> String {
        std::fs::read_to_string(self.manifest_path()).expect("read manifest")
    }

    pub fn cache_path(&self) -> &Path {
        self.cache.path()
    }
}

pub fn linux_amd64() -> PlatformIdentity {
    PlatformIdentity::new("linux", "amd64", "Linux", "x86_64", "x86_64-unknown-linux-gnu")
}

pub fn config_for(server: &MockServer) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.network.github_api_url = server.uri();
    config.network.go_index_url = server.uri();
    config.network.http_timeout_secs = 5;
    config.retry.strategy = RetryStrategy::None;
    config
}

pub async fn bine(workspace: &Workspace, server: &MockServer, runner: Arc<FakeRunner>) -> Bine {
    Bine::new(BineOptions {
        working_dir: Some(workspace.project.path().to_path_buf()),
        cache_dir: Some(workspace.cache.path().to_path_buf()),
        runtime_config: Some(config_for(server)),
        platform: Some(linux_amd64()),
        command_runner: Some(runner),
        ..Default::default()
    })
    .await
    .expect("create bine")
}

/// Manifest with a single GitHub-style entry served by `server`
pub fn perpignan_manifest(server: &MockServer, version: &str, checksum: Option<&str>) -> String {
    let checksum = checksum
        .map(|c| format!(",\n      \"checksum\": \"{}\"", c))
        .unwrap_or_default();
    format!(
        r#"{{
  // Tools for this project.
  "project": "demo",
  "bins": [
    {{
      "name": "perpignan",
      "url": "{}/github.com/sevein/perpignan",
      "version": "{}",
      "asset_pattern": "{{name}}_{{version}}_{{goos}}_{{goarch}}"{}
    }},
  ],
}}
"#,
        server.uri(),
        version,
        checksum
    )
}

/// Download route of the perpignan asset for `version`
pub fn perpignan_route(version: &str) -> String {
    format!(
        "/github.com/sevein/perpignan/releases/download/v{v}/perpignan_{v}_linux_amd64",
        v = version
    )
}
