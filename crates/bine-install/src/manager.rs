//! The `Bine` facade: manifest, platform, providers and cache in one place

use bine_core::config::RuntimeConfigLoader;
use bine_core::platform::PlatformIdentity;
use bine_core::{
    version, AssetNamer, BinSpec, CommandRunner, Error, ManifestStore, Result, RuntimeConfig,
    SystemCommandRunner,
};
use bine_providers::{HttpClient, ProviderContext, ProviderSet};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::cache::CacheLayout;
use crate::engine::InstallEngine;
use crate::signals::SignalForwarder;

/// Construction options; unset fields fall back to the environment
#[derive(Default)]
pub struct BineOptions {
    /// Directory the manifest search starts from, the current directory by default
    pub working_dir: Option<PathBuf>,
    /// Base cache directory, overriding the runtime configuration
    pub cache_dir: Option<PathBuf>,
    /// GitHub API token, overriding the runtime configuration
    pub github_token: Option<String>,
    /// Runtime configuration; loaded from disk and environment when unset
    pub runtime_config: Option<RuntimeConfig>,
    /// Host identity; probed when unset
    pub platform: Option<PlatformIdentity>,
    /// Runner for helper processes
    pub command_runner: Option<Arc<dyn CommandRunner>>,
}

/// One row of `list` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub name: String,
    /// Canonical version when semver, otherwise as declared
    pub version: String,
    /// Latest upstream version, `v`-prefixed when semver
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub latest: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub outdated_check_error: String,
}

pub struct Bine {
    store: ManifestStore,
    namer: AssetNamer,
    engine: InstallEngine,
}

impl Bine {
    pub async fn new(options: BineOptions) -> Result<Self> {
        let mut config = match options.runtime_config {
            Some(config) => config,
            None => RuntimeConfigLoader::new().load()?,
        };
        if options.cache_dir.is_some() {
            config.cache_dir = options.cache_dir;
        }
        if options.github_token.is_some() {
            config.github_token = options.github_token;
        }

        let start = match options.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let mut store = ManifestStore::load(&start)?;

        let runner = options
            .command_runner
            .unwrap_or_else(|| Arc::new(SystemCommandRunner));
        let platform = match options.platform {
            Some(platform) => platform,
            None => PlatformIdentity::detect(runner.as_ref()).await?,
        };

        let namer = AssetNamer::new(platform);
        store.resolve_assets(&namer);

        let base = match &config.cache_dir {
            Some(dir) => dir.clone(),
            None => CacheLayout::default_base()?,
        };
        let layout = CacheLayout::new(&base, store.project(), namer.platform());
        debug!(path = %layout.root().display(), "cache directory identified");

        let ctx = ProviderContext::from_config(&config)?;
        let http: HttpClient = ctx.http.clone();
        let engine = InstallEngine::new(layout, http, ProviderSet::new(&ctx), runner);

        Ok(Self { store, namer, engine })
    }

    pub fn project(&self) -> &str {
        self.store.project()
    }

    pub fn manifest_path(&self) -> &Path {
        self.store.path()
    }

    pub fn bins(&self) -> &[BinSpec] {
        self.store.bins()
    }

    pub fn platform(&self) -> &PlatformIdentity {
        self.namer.platform()
    }

    /// Platform-scoped cache root
    pub fn cache_dir(&self) -> &Path {
        self.engine.layout().root()
    }

    /// Directory holding installed executables
    pub fn bin_dir(&self) -> PathBuf {
        self.engine.layout().bin_dir()
    }

    /// Ensure `name` is installed and return its path
    pub async fn get(&self, name: &str) -> Result<PathBuf> {
        let spec = self.store.get(name)?;
        self.engine.install(spec).await
    }

    /// Install and run `name` with inherited stdio, returning its exit code.
    ///
    /// Signals received while the child runs are relayed to it, and bine only
    /// returns once the child has exited.
    pub async fn run(&self, name: &str, args: &[String]) -> Result<i32> {
        let path = self.get(name).await?;
        debug!(name, path = %path.display(), "running");

        let mut child = Command::new(&path)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::command_failed(path.display().to_string(), e.to_string()))?;

        let Some(pid) = child.id() else {
            return Ok(exit_code(child.wait().await?));
        };
        let mut forwarder = SignalForwarder::install(pid)?;

        loop {
            tokio::select! {
                status = child.wait() => return Ok(exit_code(status?)),
                relayed = forwarder.relay() => {
                    if let Err(e) = relayed {
                        warn!(name, error = %e, "could not forward signal");
                    }
                }
            }
        }
    }

    /// Install every entry in manifest order, stopping at the first failure
    pub async fn sync(&self) -> Result<()> {
        for spec in self.store.bins() {
            if let Err(e) = self.engine.install(spec).await {
                error!(name = %spec.name, error = %e, "install failed");
                return Err(e);
            }
        }
        Ok(())
    }

    /// List entries in manifest order.
    ///
    /// With `outdated_only`, entries are checked upstream concurrently and only
    /// outdated ones are returned; an entry whose check fails is returned with
    /// the error rather than failing the whole listing.
    pub async fn list(&self, installed_only: bool, outdated_only: bool) -> Result<Vec<ListItem>> {
        let rows = join_all(
            self.store
                .bins()
                .iter()
                .map(|spec| self.list_item(spec, installed_only, outdated_only)),
        )
        .await;

        rows.into_iter()
            .filter_map(Result::transpose)
            .collect()
    }

    async fn list_item(&self, spec: &BinSpec, installed_only: bool, outdated_only: bool) -> Result<Option<ListItem>> {
        if installed_only && !self.engine.is_installed(spec)? {
            return Ok(None);
        }

        let mut item = ListItem {
            name: spec.name.clone(),
            version: spec.usable_version(),
            latest: String::new(),
            outdated_check_error: String::new(),
        };

        if outdated_only {
            match self.check_outdated(spec).await {
                Ok((true, latest)) => item.latest = prefixed(&latest),
                Ok((false, _)) => return Ok(None),
                Err(e) => {
                    debug!(name = %spec.name, error = %e, "outdated check failed");
                    item.outdated_check_error = e.to_string();
                }
            }
        }

        Ok(Some(item))
    }

    /// Compare the declared version with the latest upstream one
    async fn check_outdated(&self, spec: &BinSpec) -> Result<(bool, String)> {
        if spec.version.is_empty() {
            return Err(Error::version_incomparable(&spec.name, ""));
        }

        let provider = self.engine.providers().for_spec(spec)?;
        let latest = provider.latest_version(spec).await?;

        match version::compare(&spec.version, &latest) {
            Some(ordering) => Ok((ordering.is_lt(), latest)),
            None if version::canonical(&spec.version).is_none() => {
                Err(Error::version_incomparable(&spec.name, &spec.version))
            }
            None => Err(Error::version_incomparable(&spec.name, latest)),
        }
    }

    /// Move outdated entries to their latest versions.
    ///
    /// If any entry's check fails, the manifest is left alone and the items
    /// (including the failures) are returned. Otherwise the manifest is
    /// patched and every entry synced. `dry_run` stops after the check.
    pub async fn upgrade(&mut self, dry_run: bool) -> Result<Vec<ListItem>> {
        let items = self.list(false, true).await?;

        if items.iter().any(|i| !i.outdated_check_error.is_empty()) {
            info!("outdated check failed for some entries, manifest not updated");
            return Ok(items);
        }
        if dry_run {
            return Ok(items);
        }

        let changes: BTreeMap<String, String> = items
            .iter()
            .filter(|i| !i.latest.is_empty())
            .map(|i| (i.name.clone(), version::unprefixed(&i.latest).to_string()))
            .collect();

        self.store.apply_versions(&changes, &self.namer)?;
        self.sync().await?;
        Ok(items)
    }
}

fn prefixed(latest: &str) -> String {
    if version::canonical(latest).is_some() {
        format!("v{}", version::unprefixed(latest))
    } else {
        latest.to_string()
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
