//! GitHub release listing and latest-version selection

use bine_core::version::{self, TagMatcher};
use bine_core::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::debug;

use crate::http::{require_ok, HttpClient};

/// Releases requested per page; only the first page is consulted
pub const RELEASES_PER_PAGE: usize = 100;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Release information
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "v1.0.1")
    pub tag_name: String,

    /// Whether this is a prerelease
    #[serde(default)]
    pub prerelease: bool,

    /// Whether this is a draft
    #[serde(default)]
    pub draft: bool,
}

/// Client for the GitHub releases API
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    http: HttpClient,
    api_url: String,
    token: Option<String>,
}

impl ReleaseClient {
    pub fn new(http: HttpClient, api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// List releases of `owner/repo`, newest first as returned by the API
    pub async fn list_releases(&self, owner: &str, repo: &str) -> Result<Vec<Release>> {
        let url = format!(
            "{}/repos/{}/{}/releases?per_page={}",
            self.api_url, owner, repo, RELEASES_PER_PAGE
        );

        debug!(url = %url, "fetching releases");

        let response = require_ok(&url, self.http.get(&url, self.headers()?).await?)?;
        let releases: Vec<Release> = response
            .json()
            .await
            .map_err(|e| Error::network(&url, e))?;

        debug!(owner, repo, count = releases.len(), "releases fetched");
        Ok(releases)
    }

    /// Latest stable version of `owner/repo` matching `tag_pattern`
    pub async fn latest_version(
        &self,
        name: &str,
        owner: &str,
        repo: &str,
        tag_pattern: Option<&str>,
    ) -> Result<String> {
        let releases = self.list_releases(owner, repo).await?;
        latest_matching(&releases, tag_pattern, name)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::config_invalid("github-token", "token is not a valid header value"))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

/// Owner and repository from the first two path segments of a repository URL
pub fn owner_repo(repo_url: &str) -> Result<(String, String)> {
    let parsed = url::Url::parse(repo_url)
        .map_err(|e| Error::config_invalid(repo_url, format!("parse URL: {}", e)))?;

    let mut segments = parsed
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty());

    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) => Ok((owner.to_string(), repo.to_string())),
        _ => Err(Error::config_invalid(repo_url, "could not extract owner/repo")),
    }
}

/// Highest semver version among stable releases whose tag follows the pattern.
///
/// Drafts and prereleases are skipped, as are tags that do not match the
/// pattern or whose extracted version is not semver. The result carries no
/// leading `v`.
pub fn latest_matching(releases: &[Release], tag_pattern: Option<&str>, name: &str) -> Result<String> {
    let matcher = TagMatcher::new(tag_pattern).map_err(|e| {
        Error::config_invalid(name, format!("invalid tag pattern {:?}: {}", tag_pattern, e))
    })?;

    releases
        .iter()
        .filter(|r| !r.draft && !r.prerelease)
        .filter_map(|r| matcher.extract(&r.tag_name))
        .filter_map(version::parse)
        .max()
        .map(|v| v.to_string())
        .ok_or_else(|| Error::no_matching_release(name, "no valid semver tags found in releases"))
}
