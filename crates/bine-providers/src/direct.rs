//! Direct static host provider
//!
//! The host serves assets directly under the entry's `url` and has no release
//! API of its own. It mirrors the releases of a fixed GitHub project, which is
//! where the latest version is looked up.

use async_trait::async_trait;
use bine_core::{BinSpec, Error, Result};

use crate::releases::ReleaseClient;
use crate::traits::Provider;

/// Upstream project mirrored by `release.ariga.io`
pub const ATLAS_UPSTREAM: (&str, &str) = ("ariga", "atlas");

pub struct DirectHostProvider {
    releases: ReleaseClient,
    upstream: (String, String),
}

impl DirectHostProvider {
    pub fn new(releases: ReleaseClient) -> Self {
        Self::with_upstream(releases, ATLAS_UPSTREAM.0, ATLAS_UPSTREAM.1)
    }

    pub fn with_upstream(releases: ReleaseClient, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            releases,
            upstream: (owner.into(), repo.into()),
        }
    }
}

#[async_trait]
impl Provider for DirectHostProvider {
    fn name(&self) -> &'static str {
        "direct-host"
    }

    fn download_url(&self, spec: &BinSpec) -> Result<String> {
        let mut url = url::Url::parse(spec.url())
            .map_err(|e| Error::config_invalid(spec.url(), format!("invalid URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::config_invalid(spec.url(), "URL cannot have a path"))?
            .pop_if_empty()
            .push(&spec.asset);

        Ok(url.to_string())
    }

    async fn latest_version(&self, spec: &BinSpec) -> Result<String> {
        let (owner, repo) = &self.upstream;
        self.releases
            .latest_version(&spec.name, owner, repo, spec.tag_pattern.as_deref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpClient;
    use bine_core::RuntimeConfig;

    fn provider() -> DirectHostProvider {
        let http = HttpClient::new(&RuntimeConfig::default()).unwrap();
        DirectHostProvider::new(ReleaseClient::new(http, "http://127.0.0.1:9", None))
    }

    fn spec(url: &str) -> BinSpec {
        BinSpec {
            name: "atlas".into(),
            version: "0.34.0".into(),
            url: Some(url.into()),
            asset: "atlas-linux-amd64-v0.34.0".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_download_url_joins_asset() {
        let p = provider();
        assert_eq!(
            p.download_url(&spec("https://release.ariga.io/atlas")).unwrap(),
            "https://release.ariga.io/atlas/atlas-linux-amd64-v0.34.0"
        );
        assert_eq!(
            p.download_url(&spec("https://release.ariga.io/atlas/")).unwrap(),
            "https://release.ariga.io/atlas/atlas-linux-amd64-v0.34.0"
        );
    }

    #[test]
    fn test_download_url_rejects_invalid_url() {
        assert!(matches!(
            provider().download_url(&spec("release.ariga.io/atlas")),
            Err(Error::ConfigInvalid { .. })
        ));
    }
}
