//! Install engine
//!
//! Per entry: check the cache, otherwise install (toolchain or download and
//! extract), hash the executable and record a version marker. The marker is
//! only written after the final executable has been hashed, so an interrupted
//! install is never reported as installed.

use bine_core::{BinSpec, CommandRunner, Error, Result};
use bine_providers::{HttpClient, ProviderSet};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::cache::CacheLayout;
use crate::download::download_to_temp;
use crate::extract::extract_binary;
use crate::lock::InstallLock;
use crate::marker::{sha256_file, VersionMarker};
use crate::toolchain::go_install;

pub struct InstallEngine {
    layout: CacheLayout,
    http: HttpClient,
    providers: ProviderSet,
    runner: Arc<dyn CommandRunner>,
}

impl InstallEngine {
    pub fn new(
        layout: CacheLayout,
        http: HttpClient,
        providers: ProviderSet,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            layout,
            http,
            providers,
            runner,
        }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Whether the entry is installed at its declared version.
    ///
    /// True only when the executable exists, its marker parses, the marker's
    /// digest equals a fresh hash of the executable, and any pinned checksum
    /// agrees. Every other state means "not installed".
    pub fn is_installed(&self, spec: &BinSpec) -> Result<bool> {
        let bin_path = self.layout.binary_path(spec);
        match fs::metadata(&bin_path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                debug!(path = %bin_path.display(), "cache path is not a file");
                return Ok(false);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        let Some(marker) = VersionMarker::read(&self.layout.marker_path(spec)) else {
            return Ok(false);
        };

        let sum = sha256_file(&bin_path)?;
        if !marker.matches(&sum) {
            debug!(name = %spec.name, "executable does not match its version marker");
            return Ok(false);
        }

        if let Some(pinned) = pinned_checksum(spec) {
            if !pinned.eq_ignore_ascii_case(&sum) {
                debug!(name = %spec.name, "installed executable does not match the pinned checksum");
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Ensure the entry is installed and return the executable path
    pub async fn install(&self, spec: &BinSpec) -> Result<PathBuf> {
        let bin_path = self.layout.binary_path(spec);

        if self.is_installed(spec)? {
            debug!(name = %spec.name, version = %spec.version, "already installed");
            return Ok(bin_path);
        }

        let _lock = InstallLock::acquire(&self.layout.locks_dir(), &spec.name).await?;

        // Another process may have finished the same install while we waited.
        if self.is_installed(spec)? {
            debug!(name = %spec.name, "installed by a concurrent process");
            return Ok(bin_path);
        }

        let bin_dir = self.layout.bin_dir();
        fs::create_dir_all(&bin_dir)?;

        let sum = if spec.is_toolchain() {
            go_install(self.runner.as_ref(), spec, &bin_dir).await?;
            if !bin_path.is_file() {
                return Err(Error::command_failed(
                    format!("go install {}", spec.go_package.as_deref().unwrap_or_default()),
                    format!("no executable named {:?} was produced in {}", spec.name, bin_dir.display()),
                ));
            }
            let sum = sha256_file(&bin_path)?;
            if let Err(e) = verify_pinned(spec, &sum) {
                fs::remove_file(&bin_path)?;
                return Err(e);
            }
            sum
        } else {
            self.download_and_extract(spec, bin_dir, bin_path.clone()).await?
        };

        VersionMarker::sha256(&sum).write(&self.layout.marker_path(spec))?;

        info!(name = %spec.name, version = %spec.version, path = %bin_path.display(), "installed");
        Ok(bin_path)
    }

    /// Download, extract into a staged file next to the executable, and move it
    /// into place only once its digest agrees with any pinned checksum
    async fn download_and_extract(&self, spec: &BinSpec, bin_dir: PathBuf, bin_path: PathBuf) -> Result<String> {
        let provider = self.providers.for_spec(spec)?;
        let url = provider.download_url(spec)?;
        info!(name = %spec.name, url = %url, provider = provider.name(), "downloading");

        let download = download_to_temp(&self.http, &url).await?;

        let name = spec.name.clone();
        let (staged, sum) = tokio::task::spawn_blocking(move || -> Result<(NamedTempFile, String)> {
            let staged = tempfile::Builder::new()
                .prefix(&format!(".{}-", name))
                .tempfile_in(&bin_dir)?;
            extract_binary(download.path(), &name, staged.path(), &url)?;
            let sum = sha256_file(staged.path())?;
            Ok((staged, sum))
        })
        .await
        .map_err(io::Error::other)??;

        // The staged file is removed on drop, leaving any previous executable untouched.
        verify_pinned(spec, &sum)?;

        staged.persist(&bin_path).map_err(|e| e.error)?;
        Ok(sum)
    }
}

fn verify_pinned(spec: &BinSpec, sum: &str) -> Result<()> {
    match pinned_checksum(spec) {
        Some(pinned) if !pinned.eq_ignore_ascii_case(sum) => {
            Err(Error::checksum_mismatch(&spec.name, pinned, sum))
        }
        _ => Ok(()),
    }
}

fn pinned_checksum(spec: &BinSpec) -> Option<&str> {
    spec.checksum.as_deref().filter(|c| !c.is_empty())
}
