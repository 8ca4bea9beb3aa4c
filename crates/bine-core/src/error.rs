//! Error types for bine-core

use thiserror::Error;

/// Result type alias using bine-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error taxonomy shared by every bine crate
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest file not found in the search directory or its ancestors
    #[error("configuration file {file} not found in {dir} or any parent directory")]
    ConfigNotFound { file: String, dir: String },

    /// Malformed manifest or runtime configuration
    #[error("invalid configuration {path}: {message}")]
    ConfigInvalid { path: String, message: String },

    /// Name not declared in the manifest
    #[error("binary {name:?} is not declared in the manifest")]
    UnknownBinary { name: String },

    /// Source URL matches no known provider
    #[error("unsupported binary provider for {name:?} ({url})")]
    UnsupportedProvider { name: String, url: String },

    /// Transport-level failure, surfaced after retries
    #[error("request to {url} failed: {source}")]
    NetworkFailure {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Non-200 response from a release or package host
    #[error("{url} returned status {status}")]
    UpstreamStatusError { url: String, status: String },

    /// No usable release found upstream
    #[error("no matching release for {name:?}: {reason}")]
    NoMatchingRelease { name: String, reason: String },

    /// Archive walked without finding the executable
    #[error("binary {name:?} not found in archive {archive}")]
    BinaryNotFoundInArchive { name: String, archive: String },

    /// Pinned checksum differs from the installed executable
    #[error("checksum mismatch for {name:?}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// Toolchain installer exited non-zero
    #[error("`{command}` failed: {status}\nstderr: {stderr}")]
    ToolchainInstallFailed {
        command: String,
        status: String,
        stderr: String,
    },

    /// Version text that cannot be canonicalized when a comparison is needed
    #[error("invalid semver {version:?} for {name:?}")]
    VersionIncomparable { name: String, version: String },

    /// A helper process could not be started or reported failure
    #[error("command `{command}` failed: {message}")]
    CommandFailed { command: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error (runtime configuration)
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(file: impl Into<String>, dir: impl Into<String>) -> Self {
        Self::ConfigNotFound {
            file: file.into(),
            dir: dir.into(),
        }
    }

    /// Create an invalid config error
    pub fn config_invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unknown_binary(name: impl Into<String>) -> Self {
        Self::UnknownBinary { name: name.into() }
    }

    pub fn unsupported_provider(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::UnsupportedProvider {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Wrap a transport error, keeping it as the source
    pub fn network(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::NetworkFailure {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn upstream_status(url: impl Into<String>, status: impl ToString) -> Self {
        Self::UpstreamStatusError {
            url: url.into(),
            status: status.to_string(),
        }
    }

    pub fn no_matching_release(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::NoMatchingRelease {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn binary_not_found_in_archive(name: impl Into<String>, archive: impl Into<String>) -> Self {
        Self::BinaryNotFoundInArchive {
            name: name.into(),
            archive: archive.into(),
        }
    }

    pub fn checksum_mismatch(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ChecksumMismatch {
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a toolchain failure, substituting a placeholder for empty stderr
    pub fn toolchain_install_failed(
        command: impl Into<String>,
        status: impl Into<String>,
        stderr: &str,
    ) -> Self {
        let stderr = stderr.trim_end();
        Self::ToolchainInstallFailed {
            command: command.into(),
            status: status.into(),
            stderr: if stderr.is_empty() {
                "(no stderr output)".to_string()
            } else {
                stderr.to_string()
            },
        }
    }

    pub fn version_incomparable(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self::VersionIncomparable {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn command_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}
