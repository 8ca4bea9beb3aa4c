//! # bine-install
//!
//! Installs manifest entries into the platform-scoped cache and exposes the
//! `Bine` facade used by the command-line interface:
//!
//! - Cache check against SHA-256 version markers
//! - Downloads with transport retries, archive extraction, toolchain installs
//! - Per-binary install locks shared across processes
//! - Get, Run, Sync, List and Upgrade over the whole manifest
//! - Signal relaying to binaries started with `run`

pub mod cache;
pub mod download;
pub mod engine;
pub mod extract;
pub mod lock;
pub mod manager;
pub mod marker;
pub mod signals;
pub mod toolchain;

pub use cache::CacheLayout;
pub use engine::InstallEngine;
pub use manager::{Bine, BineOptions, ListItem};
pub use marker::VersionMarker;
