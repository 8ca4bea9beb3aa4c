//! Runtime configuration loading

mod loader;

pub use loader::{RuntimeConfigLoader, RUNTIME_CONFIG_FILE};
