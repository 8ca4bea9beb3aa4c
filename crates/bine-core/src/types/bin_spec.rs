//! Manifest entry types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::version;

/// Placeholder name → {raw value → substituted value}
pub type Modifiers = HashMap<String, HashMap<String, String>>;

/// Host substring that selects the direct-host provider
pub const DIRECT_HOST_MARKER: &str = "release.ariga.io";

/// Host substring that selects the GitHub provider
pub const GITHUB_HOST_MARKER: &str = "github.com";

/// One manifest entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BinSpec {
    /// Unique key, also the executable name in the cache
    pub name: String,

    /// Declared version; not necessarily semver
    #[serde(default)]
    pub version: String,

    /// Source location for archive-based installs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Asset name template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_pattern: Option<String>,

    /// Release tag template, `v{version}` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_pattern: Option<String>,

    /// Import path for toolchain installs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_package: Option<String>,

    /// Pinned SHA-256 hex digest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,

    /// Per-placeholder value remapping
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub modifiers: Modifiers,

    /// Expanded asset name for the current host
    #[serde(skip)]
    pub asset: String,

    /// Provider bound at load time
    #[serde(skip)]
    pub provider: Option<ProviderKind>,
}

impl BinSpec {
    /// Whether installation goes through the language toolchain
    pub fn is_toolchain(&self) -> bool {
        self.go_package.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Canonical semver form of the declared version
    pub fn canonical_version(&self) -> Option<String> {
        if self.version.is_empty() {
            return None;
        }
        version::canonical(&self.version)
    }

    /// Canonical version when valid, otherwise the declared text
    pub fn usable_version(&self) -> String {
        version::usable(&self.version)
    }

    /// Declared version without a leading `v`
    pub fn unprefixed_version(&self) -> &str {
        version::unprefixed(&self.version)
    }

    /// Upstream release tag for the declared version
    pub fn tag(&self) -> String {
        version::format_tag(self.tag_pattern.as_deref(), &self.version)
    }

    /// Source URL or the empty string
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// Bind the provider kind once, based on the entry's shape
    pub fn bind_provider(&mut self) -> Result<ProviderKind> {
        if let Some(kind) = self.provider {
            return Ok(kind);
        }
        let kind = ProviderKind::for_spec(self)?;
        self.provider = Some(kind);
        Ok(kind)
    }
}

/// Distribution channel of a manifest entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// GitHub Releases
    GitHub,
    /// Language package registry (`go install`)
    PackageRegistry,
    /// Static host mirroring a known upstream project
    DirectHost,
}

impl ProviderKind {
    /// Select the provider for an entry.
    ///
    /// A toolchain package wins over any URL; otherwise the URL host decides.
    pub fn for_spec(spec: &BinSpec) -> Result<Self> {
        let url = spec.url();
        if spec.is_toolchain() {
            Ok(Self::PackageRegistry)
        } else if url.contains(GITHUB_HOST_MARKER) {
            Ok(Self::GitHub)
        } else if url.contains(DIRECT_HOST_MARKER) {
            Ok(Self::DirectHost)
        } else {
            Err(Error::unsupported_provider(&spec.name, url))
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => write!(f, "github"),
            Self::PackageRegistry => write!(f, "package-registry"),
            Self::DirectHost => write!(f, "direct-host"),
        }
    }
}
