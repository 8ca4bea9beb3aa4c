//! GitHub Releases provider

use async_trait::async_trait;
use bine_core::{BinSpec, Result};

use crate::releases::{owner_repo, ReleaseClient};
use crate::traits::Provider;

/// Assets attached to GitHub releases of the repository named by `url`
pub struct GitHubProvider {
    releases: ReleaseClient,
}

impl GitHubProvider {
    pub fn new(releases: ReleaseClient) -> Self {
        Self { releases }
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn download_url(&self, spec: &BinSpec) -> Result<String> {
        Ok(format!(
            "{}/releases/download/{}/{}",
            spec.url().trim_end_matches('/'),
            spec.tag(),
            spec.asset
        ))
    }

    async fn latest_version(&self, spec: &BinSpec) -> Result<String> {
        let (owner, repo) = owner_repo(spec.url())?;
        self.releases
            .latest_version(&spec.name, &owner, &repo, spec.tag_pattern.as_deref())
            .await
    }
}
