//! Go package registry provider
//!
//! Entries with a `go_package` are installed through `go install`, so the
//! download URL is only informational. The latest version is scraped from the
//! versions tab of the package index.

use async_trait::async_trait;
use bine_core::{version, BinSpec, Error, Result};
use regex::Regex;
use reqwest::header::HeaderMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::http::{require_ok, HttpClient};
use crate::traits::Provider;

static VERSION_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a class="js-versionLink"[^>]*>([^<]+)</a>"#).expect("valid version link regex")
});

pub struct PackageRegistryProvider {
    http: HttpClient,
    index_url: String,
}

impl PackageRegistryProvider {
    pub fn new(http: HttpClient, index_url: impl Into<String>) -> Self {
        Self {
            http,
            index_url: index_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn package_page(&self, spec: &BinSpec) -> String {
        format!("{}/{}", self.index_url, spec.go_package.as_deref().unwrap_or_default())
    }
}

#[async_trait]
impl Provider for PackageRegistryProvider {
    fn name(&self) -> &'static str {
        "package-registry"
    }

    fn download_url(&self, spec: &BinSpec) -> Result<String> {
        Ok(self.package_page(spec))
    }

    async fn latest_version(&self, spec: &BinSpec) -> Result<String> {
        let url = format!("{}?tab=versions", self.package_page(spec));
        let response = require_ok(&url, self.http.get(&url, HeaderMap::new()).await?)?;
        let body = response.text().await.map_err(|e| Error::network(&url, e))?;

        let latest = first_version_link(&body)
            .ok_or_else(|| Error::no_matching_release(&spec.name, "no version link found in package index page"))?;

        debug!(name = %spec.name, version = latest, "latest package version");
        Ok(version::unprefixed(latest).to_string())
    }
}

/// Text of the first version link on a package index page
pub fn first_version_link(html: &str) -> Option<&str> {
    VERSION_LINK
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_version_link() {
        let html = r#"
            <div class="Version-tag">
              <a class="js-versionLink" href="/goa.design/goa/v3@v3.16.2/cmd/goa">v3.16.2</a>
            </div>
            <a class="js-versionLink" href="/goa.design/goa/v3@v3.16.1/cmd/goa">v3.16.1</a>
        "#;
        assert_eq!(first_version_link(html), Some("v3.16.2"));
        assert_eq!(first_version_link("<html>nothing here</html>"), None);
    }
}
