//! Type definitions for bine

mod bin_spec;
mod runtime_config;

pub use bin_spec::{BinSpec, Modifiers, ProviderKind, DIRECT_HOST_MARKER, GITHUB_HOST_MARKER};
pub use runtime_config::{NetworkConfig, RetryPolicy, RetryStrategy, RuntimeConfig};
