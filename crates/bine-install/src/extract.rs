//! Locating the executable inside a downloaded asset
//!
//! The asset format is sniffed from its leading bytes. Compressed layers
//! (gzip, xz, zstd) are decoded to a scratch file and sniffed again; the
//! innermost payload is a zip archive, a tar archive or the bare executable.

use bine_core::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Component, Path};
use tempfile::NamedTempFile;
use tracing::debug;
use xz2::read::XzDecoder;

/// Directory names whose contents are never considered
const SKIPPED_DIRS: &[&str] = &[".git"];

/// Compression layers decoded before giving up and treating the rest as bare
const MAX_LAYERS: usize = 4;

const TAR_MAGIC_OFFSET: usize = 257;

/// Detected asset format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Gzip,
    Xz,
    Zstd,
    Zip,
    Tar,
    /// Not a recognised archive; the file is the executable
    Bare,
}

impl Format {
    /// Identify a format from the first bytes of a file
    pub fn sniff(header: &[u8]) -> Self {
        if header.starts_with(&[0x1f, 0x8b]) {
            Format::Gzip
        } else if header.starts_with(&[0xfd, b'7', b'z', b'X', b'Z', 0x00]) {
            Format::Xz
        } else if header.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
            Format::Zstd
        } else if header.starts_with(b"PK\x03\x04") || header.starts_with(b"PK\x05\x06") {
            Format::Zip
        } else if header.len() >= TAR_MAGIC_OFFSET + 5
            && &header[TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + 5] == b"ustar"
        {
            Format::Tar
        } else {
            Format::Bare
        }
    }

    fn of_file(file: &mut File) -> io::Result<Self> {
        let mut header = [0u8; 512];
        let mut filled = 0;
        while filled < header.len() {
            let n = file.read(&mut header[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        file.seek(SeekFrom::Start(0))?;
        Ok(Self::sniff(&header[..filled]))
    }
}

/// Copy the executable `name` found in `asset` to `dest` and mark it `0755`.
///
/// `label` names the asset in errors (usually its download URL).
pub fn extract_binary(asset: &Path, name: &str, dest: &Path, label: &str) -> Result<()> {
    let mut layers: Vec<NamedTempFile> = Vec::new();
    let mut current = File::open(asset)?;

    for _ in 0..=MAX_LAYERS {
        let format = Format::of_file(&mut current)?;
        debug!(?format, name, "sniffed asset layer");

        match format {
            Format::Gzip => layers.push(decode(GzDecoder::new(BufReader::new(current)))?),
            Format::Xz => layers.push(decode(XzDecoder::new(BufReader::new(current)))?),
            Format::Zstd => layers.push(decode(zstd::stream::read::Decoder::new(current)?)?),
            Format::Zip => return extract_from_zip(current, name, dest, label),
            Format::Tar => return extract_from_tar(current, name, dest, label),
            Format::Bare => return write_executable(&mut current, dest),
        }

        current = match layers.last() {
            Some(layer) => layer.reopen()?,
            None => return Err(Error::binary_not_found_in_archive(name, label)),
        };
    }

    write_executable(&mut current, dest)
}

fn decode<R: Read>(mut reader: R) -> Result<NamedTempFile> {
    let mut scratch = NamedTempFile::new()?;
    io::copy(&mut reader, scratch.as_file_mut())?;
    Ok(scratch)
}

fn skipped(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(part) => part.to_str().is_some_and(|p| SKIPPED_DIRS.contains(&p)),
        _ => false,
    })
}

fn base_name_is(path: &Path, name: &str) -> bool {
    path.file_name().and_then(|f| f.to_str()) == Some(name)
}

fn is_executable(mode: u32) -> bool {
    mode & 0o111 != 0
}

/// Name match wins; otherwise the first executable entry
#[derive(Default)]
struct Selection {
    by_name: Option<usize>,
    by_mode: Option<usize>,
}

impl Selection {
    fn offer(&mut self, index: usize, path: &Path, mode: Option<u32>, name: &str) -> bool {
        if base_name_is(path, name) {
            self.by_name = Some(index);
            return true;
        }
        if self.by_mode.is_none() && mode.is_some_and(is_executable) {
            self.by_mode = Some(index);
        }
        false
    }

    fn chosen(&self) -> Option<usize> {
        self.by_name.or(self.by_mode)
    }
}

fn extract_from_zip(file: File, name: &str, dest: &Path, label: &str) -> Result<()> {
    let mut archive = zip::ZipArchive::new(BufReader::new(file)).map_err(io::Error::other)?;

    let mut selection = Selection::default();
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(io::Error::other)?;
        if entry.is_dir() {
            continue;
        }
        let Some(path) = entry.enclosed_name() else {
            debug!(entry = entry.name(), "skipping unsafe path in zip");
            continue;
        };
        if skipped(&path) {
            continue;
        }
        if selection.offer(index, &path, entry.unix_mode(), name) {
            break;
        }
    }

    let index = selection
        .chosen()
        .ok_or_else(|| Error::binary_not_found_in_archive(name, label))?;

    let mut entry = archive.by_index(index).map_err(io::Error::other)?;
    debug!(entry = entry.name(), name, "binary found in zip");
    write_executable(&mut entry, dest)
}

fn extract_from_tar(mut file: File, name: &str, dest: &Path, label: &str) -> Result<()> {
    let mut selection = Selection::default();
    {
        let mut archive = tar::Archive::new(BufReader::new(&mut file));
        for (index, entry) in archive.entries()?.enumerate() {
            let entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let path = entry.path()?;
            if skipped(&path) {
                continue;
            }
            if selection.offer(index, &path, entry.header().mode().ok(), name) {
                break;
            }
        }
    }

    let chosen = selection
        .chosen()
        .ok_or_else(|| Error::binary_not_found_in_archive(name, label))?;

    file.seek(SeekFrom::Start(0))?;
    let mut archive = tar::Archive::new(BufReader::new(file));
    for (index, entry) in archive.entries()?.enumerate() {
        let mut entry = entry?;
        if index == chosen {
            let path = entry.path()?.into_owned();
            debug!(entry = %path.display(), name, "binary found in tar");
            return write_executable(&mut entry, dest);
        }
    }

    Err(Error::binary_not_found_in_archive(name, label))
}

/// Create or truncate `dest` with the reader's bytes and make it executable
fn write_executable<R: Read>(reader: &mut R, dest: &Path) -> Result<()> {
    let mut out = File::create(dest)?;
    io::copy(reader, &mut out)?;
    out.sync_all()?;
    drop(out);
    set_executable(dest)?;
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
