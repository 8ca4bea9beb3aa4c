//! CLI command implementations

pub mod config;
pub mod env;
pub mod get;
pub mod list;
pub mod path;
pub mod run;
pub mod sync;
pub mod upgrade;
pub mod version;

use anyhow::{Context, Result};
use bine_install::{Bine, BineOptions};
use tracing::debug;

use crate::cli::GlobalOptions;

/// Open the project found from the current directory
pub(crate) async fn open(global: &GlobalOptions) -> Result<Bine> {
    let bine = Bine::new(BineOptions {
        cache_dir: global.cache_dir.clone(),
        github_token: global.github_token.clone(),
        ..Default::default()
    })
    .await
    .context("Failed to load the project")?;

    debug!(
        project = bine.project(),
        manifest = %bine.manifest_path().display(),
        "project loaded"
    );
    Ok(bine)
}
