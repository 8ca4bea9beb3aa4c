//! Platform-scoped cache layout
//!
//! ```text
//! <base>/<project>/<goos>/<goarch>/
//!     bin/<name>                 installed executable
//!     versions/<name>/<version>  version marker
//!     locks/<name>.lock          install lock
//! ```

use bine_core::{BinSpec, Error, PlatformIdentity, Result};
use std::path::{Path, PathBuf};

/// Name of the cache directory under the user cache dir
pub const CACHE_DIR_NAME: &str = "bine";

/// Marker key used when an entry declares no version
const UNVERSIONED: &str = "latest";

#[derive(Debug, Clone)]
pub struct CacheLayout {
    root: PathBuf,
}

impl CacheLayout {
    pub fn new(base: &Path, project: &str, platform: &PlatformIdentity) -> Self {
        Self {
            root: base.join(project).join(&platform.goos).join(&platform.goarch),
        }
    }

    /// Default base directory, `<user cache dir>/bine`
    pub fn default_base() -> Result<PathBuf> {
        dirs::cache_dir()
            .map(|dir| dir.join(CACHE_DIR_NAME))
            .ok_or_else(|| Error::config_invalid("cache-dir", "cannot determine the user cache directory"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn locks_dir(&self) -> PathBuf {
        self.root.join("locks")
    }

    pub fn binary_path(&self, spec: &BinSpec) -> PathBuf {
        self.bin_dir().join(&spec.name)
    }

    pub fn marker_path(&self, spec: &BinSpec) -> PathBuf {
        let version = if spec.version.is_empty() {
            UNVERSIONED
        } else {
            spec.version.as_str()
        };
        self.versions_dir().join(&spec.name).join(version)
    }
}
