//! # bine-core
//!
//! Core library for bine providing:
//! - Manifest discovery, parsing (`.bine.json`) and format-preserving updates
//! - Host platform identification and asset name templating
//! - Version canonicalization and release tag patterns
//! - Runtime configuration and the retry engine used for HTTP

pub mod command;
pub mod config;
pub mod error;
pub mod manifest;
pub mod namer;
pub mod platform;
pub mod retry;
pub mod types;
pub mod version;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestStore, MANIFEST_FILE};
pub use namer::AssetNamer;
pub use platform::PlatformIdentity;
pub use types::{BinSpec, ProviderKind, RuntimeConfig};
