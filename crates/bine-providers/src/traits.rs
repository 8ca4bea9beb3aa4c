//! Provider trait definitions

use async_trait::async_trait;
use bine_core::{BinSpec, Result};

/// Distribution channel of a manifest entry
///
/// A provider maps an entry's declared version to a download location and
/// discovers the newest version published upstream.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &'static str;

    /// Download URL of the entry's asset for its declared version
    fn download_url(&self, spec: &BinSpec) -> Result<String>;

    /// Latest stable version published upstream, without a leading `v`
    async fn latest_version(&self, spec: &BinSpec) -> Result<String>;
}
