//! Host platform identification
//!
//! Provides the three families of identifiers release assets are named after:
//! Go-style `goos`/`goarch`, `uname -s`/`uname -m`, and a Rust target triple.

use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

use crate::command::{display_command, CommandRunner};
use crate::error::{Error, Result};

/// Directories searched for a musl dynamic loader
const MUSL_LOADER_DIRS: &[&str] = &["/lib", "/usr/lib", "/lib64", "/usr/lib64"];

/// Identifiers of the host a binary is installed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformIdentity {
    /// Go-style OS, e.g. `linux`, `darwin`
    pub goos: String,
    /// Go-style architecture, e.g. `amd64`, `arm64`
    pub goarch: String,
    /// `uname -s`, e.g. `Linux`
    pub uname_os: String,
    /// `uname -m`, e.g. `x86_64`
    pub uname_arch: String,
    /// Target triple, e.g. `x86_64-unknown-linux-gnu`
    pub triple: String,
}

impl PlatformIdentity {
    /// Build an identity from explicit values
    pub fn new(
        goos: impl Into<String>,
        goarch: impl Into<String>,
        uname_os: impl Into<String>,
        uname_arch: impl Into<String>,
        triple: impl Into<String>,
    ) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            uname_os: uname_os.into(),
            uname_arch: uname_arch.into(),
            triple: triple.into(),
        }
    }

    /// Probe the running host.
    ///
    /// Fails if `uname` cannot be run; asset names cannot be computed without it.
    pub async fn detect(runner: &dyn CommandRunner) -> Result<Self> {
        Self::detect_for(runner, native_goos(), native_goarch()).await
    }

    /// Probe the host, using the given Go-style OS and architecture
    pub async fn detect_for(runner: &dyn CommandRunner, goos: &str, goarch: &str) -> Result<Self> {
        let uname_os = uname(runner, "-s").await?;
        let uname_arch = uname(runner, "-m").await?;
        let triple = detect_triple(runner, goos, goarch).await;

        let identity = Self::new(goos, goarch, uname_os, uname_arch, triple);
        debug!(?identity, "platform identified");
        Ok(identity)
    }
}

async fn uname(runner: &dyn CommandRunner, flag: &str) -> Result<String> {
    let output = runner.run("uname", &[flag], &[]).await?;
    if !output.success() {
        return Err(Error::command_failed(
            display_command("uname", &[flag]),
            output.status_text(),
        ));
    }
    Ok(output.stdout.trim().to_string())
}

/// Go-style name of the compile-time OS
pub fn native_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Go-style name of the compile-time architecture
pub fn native_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}

/// Host triple from `rustc -vV`, else derived from the OS/arch tables
pub async fn detect_triple(runner: &dyn CommandRunner, goos: &str, goarch: &str) -> String {
    if let Ok(output) = runner.run("rustc", &["-vV"], &[]).await {
        if output.success() {
            if let Some(triple) = parse_rustc_host(&output.stdout) {
                return triple;
            }
        }
    }

    let libc = if goos == "linux" {
        detect_libc(runner).await
    } else {
        Libc::Gnu
    };
    fallback_triple(goos, goarch, libc)
}

fn parse_rustc_host(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("host: "))
        .map(str::trim)
        .find(|triple| !triple.is_empty())
        .map(String::from)
}

/// C library flavour on Linux
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Libc {
    Gnu,
    Musl,
}

/// Detect musl via Alpine's release file, a musl loader, or `ldd --version`
pub async fn detect_libc(runner: &dyn CommandRunner) -> Libc {
    if Path::new("/etc/alpine-release").exists() {
        return Libc::Musl;
    }

    let has_loader = MUSL_LOADER_DIRS.iter().any(|dir| {
        WalkDir::new(dir)
            .max_depth(2)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .any(|entry| entry.file_name().to_string_lossy().starts_with("ld-musl"))
    });
    if has_loader {
        return Libc::Musl;
    }

    // musl's ldd prints its banner on stderr and exits non-zero.
    match runner.run("ldd", &["--version"], &[]).await {
        Ok(output) if output.stdout.contains("musl") || output.stderr.contains("musl") => Libc::Musl,
        _ => Libc::Gnu,
    }
}

/// Assemble `<arch>-<vendor>-<system>[-<abi>]` from Go-style identifiers
pub fn fallback_triple(goos: &str, goarch: &str, libc: Libc) -> String {
    let arch = match goarch {
        "amd64" | "x86_64" => "x86_64",
        "386" | "i386" | "i686" => "i686",
        "arm64" | "aarch64" => "aarch64",
        "armv7l" => "armv7",
        "ppc64" => "powerpc64",
        "ppc64le" => "powerpc64le",
        other => other,
    };

    let vendor = match goos {
        "darwin" => "apple",
        "windows" => "pc",
        "android" => "linux",
        _ => "unknown",
    };

    let abi = match (goos, libc) {
        ("windows", _) => Some("msvc"),
        ("linux", Libc::Musl) => Some("musl"),
        ("linux", Libc::Gnu) => Some("gnu"),
        _ => None,
    };

    let mut triple = format!("{}-{}-{}", arch, vendor, goos);
    if let Some(abi) = abi {
        triple.push('-');
        triple.push_str(abi);
    }
    triple
}
