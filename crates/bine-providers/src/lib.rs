//! Release providers for bine
//!
//! Each manifest entry is bound to one distribution channel when the manifest
//! is loaded:
//!
//! - GitHub Releases (`url` on github.com)
//! - Go package registry (`go_package` set)
//! - Direct static host (`url` on release.ariga.io)

pub mod direct;
pub mod github;
pub mod http;
pub mod registry;
pub mod releases;
pub mod traits;

pub use http::{require_ok, HttpClient};
pub use releases::{Release, ReleaseClient};
pub use traits::Provider;

use bine_core::{BinSpec, ProviderKind, Result, RuntimeConfig};

/// Shared clients and endpoints every provider is built from
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub http: HttpClient,
    pub github_api_url: String,
    pub go_index_url: String,
    pub github_token: Option<String>,
}

impl ProviderContext {
    pub fn from_config(config: &RuntimeConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
            github_api_url: config.network.github_api_url.clone(),
            go_index_url: config.network.go_index_url.clone(),
            github_token: config.github_token.clone(),
        })
    }

    fn release_client(&self) -> ReleaseClient {
        ReleaseClient::new(
            self.http.clone(),
            self.github_api_url.clone(),
            self.github_token.clone(),
        )
    }
}

/// Create a provider instance for a kind
pub fn create_provider(kind: ProviderKind, ctx: &ProviderContext) -> Box<dyn Provider> {
    match kind {
        ProviderKind::GitHub => Box::new(github::GitHubProvider::new(ctx.release_client())),
        ProviderKind::PackageRegistry => Box::new(registry::PackageRegistryProvider::new(
            ctx.http.clone(),
            ctx.go_index_url.clone(),
        )),
        ProviderKind::DirectHost => Box::new(direct::DirectHostProvider::new(ctx.release_client())),
    }
}

/// One provider per kind, looked up through an entry's bound kind
pub struct ProviderSet {
    github: Box<dyn Provider>,
    registry: Box<dyn Provider>,
    direct: Box<dyn Provider>,
}

impl ProviderSet {
    pub fn new(ctx: &ProviderContext) -> Self {
        Self {
            github: create_provider(ProviderKind::GitHub, ctx),
            registry: create_provider(ProviderKind::PackageRegistry, ctx),
            direct: create_provider(ProviderKind::DirectHost, ctx),
        }
    }

    pub fn get(&self, kind: ProviderKind) -> &dyn Provider {
        match kind {
            ProviderKind::GitHub => self.github.as_ref(),
            ProviderKind::PackageRegistry => self.registry.as_ref(),
            ProviderKind::DirectHost => self.direct.as_ref(),
        }
    }

    /// Provider bound to the entry, binding it from the entry's shape if needed
    pub fn for_spec(&self, spec: &BinSpec) -> Result<&dyn Provider> {
        let kind = match spec.provider {
            Some(kind) => kind,
            None => ProviderKind::for_spec(spec)?,
        };
        Ok(self.get(kind))
    }
}
