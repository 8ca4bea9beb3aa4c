//! Common test infrastructure for bine-install tests
//!
//! # Modules
//!
//! - `archives`: tar.gz and zip builders
//! - `fixtures`: manifest writers and `Bine` construction
//! - `mock_server`: wiremock helpers for downloads and release listings
//! - `runner`: a scripted `CommandRunner`

#![allow(dead_code)]

pub mod archives;
pub mod fixtures;
pub mod mock_server;
pub mod runner;
