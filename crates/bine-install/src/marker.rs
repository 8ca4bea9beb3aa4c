//! Version markers: proof that an executable was installed at a version
//!
//! A marker lives at `versions/<name>/<version>` and records the SHA-256 of
//! the executable it was written for:
//!
//! ```json
//! {"checksum": {"algorithm": "SHA-256", "value": "<hex>"}}
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Algorithm name recorded in markers
pub const CHECKSUM_ALGORITHM: &str = "SHA-256";

const HASH_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerChecksum {
    pub algorithm: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMarker {
    pub checksum: MarkerChecksum,
}

impl VersionMarker {
    pub fn sha256(value: impl Into<String>) -> Self {
        Self {
            checksum: MarkerChecksum {
                algorithm: CHECKSUM_ALGORITHM.to_string(),
                value: value.into(),
            },
        }
    }

    /// Whether the marker records `sum` as a SHA-256 digest
    pub fn matches(&self, sum: &str) -> bool {
        self.checksum.algorithm == CHECKSUM_ALGORITHM && self.checksum.value.eq_ignore_ascii_case(sum)
    }

    /// Read a marker; missing, empty and unparsable files all yield `None`
    pub fn read(path: &Path) -> Option<Self> {
        let blob = match fs::read(path) {
            Ok(blob) => blob,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!(path = %path.display(), error = %e, "version marker unreadable");
                }
                return None;
            }
        };

        if blob.is_empty() {
            debug!(path = %path.display(), "empty version marker");
            return None;
        }

        match serde_json::from_slice(&blob) {
            Ok(marker) => Some(marker),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "corrupt version marker");
                None
            }
        }
    }

    /// Write the marker atomically (temp file in the same directory, then rename)
    pub fn write(&self, path: &Path) -> io::Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "marker path has no parent"))?;
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        let json = serde_json::to_vec_pretty(self).map_err(io::Error::other)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// SHA-256 of a file as lowercase hex
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
