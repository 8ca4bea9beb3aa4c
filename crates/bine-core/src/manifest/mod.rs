//! Manifest discovery, loading and write-back
//!
//! The manifest is a JSON-with-comments file named `.bine.json`, found by
//! searching the working directory and its ancestors.

mod patch;

pub use patch::{patch_version, patch_versions, PatchError};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::namer::AssetNamer;
use crate::types::BinSpec;

/// Manifest file name
pub const MANIFEST_FILE: &str = ".bine.json";

/// Parsed manifest document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Project name, the cache namespace
    pub project: String,

    #[serde(default)]
    pub bins: Vec<BinSpec>,
}

impl Manifest {
    /// Parse JSONC text; `origin` names the source in errors
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let value = jsonc_parser::parse_to_value(text, &jsonc_parser::ParseOptions::default())
            .map_err(|e| Error::config_invalid(origin, e.to_string()))?
            .ok_or_else(|| Error::config_invalid(origin, "empty document"))?;

        let manifest: Manifest = serde_json::from_value(convert_jsonc_to_serde_value(value))
            .map_err(|e| Error::config_invalid(origin, e.to_string()))?;

        manifest.validate(origin)?;
        Ok(manifest)
    }

    fn validate(&self, origin: &str) -> Result<()> {
        if self.project.is_empty() {
            return Err(Error::config_invalid(origin, "project name is empty"));
        }

        let mut seen = HashSet::new();
        for bin in &self.bins {
            if bin.name.is_empty() {
                return Err(Error::config_invalid(origin, "binary with an empty name"));
            }
            if !seen.insert(bin.name.as_str()) {
                return Err(Error::config_invalid(
                    origin,
                    format!("binary {:?} is declared more than once", bin.name),
                ));
            }
        }
        Ok(())
    }
}

fn convert_jsonc_to_serde_value(jsonc_value: jsonc_parser::JsonValue) -> Value {
    match jsonc_value {
        jsonc_parser::JsonValue::Null => Value::Null,
        jsonc_parser::JsonValue::Boolean(b) => Value::Bool(b),
        jsonc_parser::JsonValue::Number(n) => {
            if let Ok(i) = n.parse::<i64>() {
                Value::Number(i.into())
            } else if let Ok(f) = n.parse::<f64>() {
                serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)
            } else {
                Value::Null
            }
        }
        jsonc_parser::JsonValue::String(s) => Value::String(s.to_string()),
        jsonc_parser::JsonValue::Array(arr) => {
            Value::Array(arr.into_iter().map(convert_jsonc_to_serde_value).collect())
        }
        jsonc_parser::JsonValue::Object(obj) => {
            let mut map = serde_json::Map::new();
            for (key, value) in obj {
                map.insert(key, convert_jsonc_to_serde_value(value));
            }
            Value::Object(map)
        }
    }
}

/// Search `start` and its ancestors for the manifest file
pub fn discover(start: &Path) -> Result<PathBuf> {
    discover_in(start.ancestors(), start)
}

fn discover_in<'a>(dirs: impl Iterator<Item = &'a Path>, start: &Path) -> Result<PathBuf> {
    dirs.map(|dir| dir.join(MANIFEST_FILE))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| Error::config_not_found(MANIFEST_FILE, start.display().to_string()))
}

/// Owns the manifest entries and their on-disk file
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
    manifest: Manifest,
}

impl ManifestStore {
    /// Discover and load the manifest, binding a provider to every entry
    pub fn load(start: &Path) -> Result<Self> {
        let path = discover(start)?;
        Self::load_file(&path)
    }

    /// Load a specific manifest file
    pub fn load_file(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::config_invalid(&origin, format!("read file: {}", e)))?;

        let mut manifest = Manifest::parse(&text, &origin)?;
        for bin in manifest.bins.iter_mut() {
            bin.bind_provider()?;
        }

        debug!(path = %origin, project = %manifest.project, bins = manifest.bins.len(), "manifest loaded");
        Ok(Self {
            path: path.to_path_buf(),
            manifest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn project(&self) -> &str {
        &self.manifest.project
    }

    /// Entries in declaration order
    pub fn bins(&self) -> &[BinSpec] {
        &self.manifest.bins
    }

    /// Entry by name
    pub fn get(&self, name: &str) -> Result<&BinSpec> {
        self.manifest
            .bins
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| Error::unknown_binary(name))
    }

    /// Compute the derived asset name of every entry
    pub fn resolve_assets(&mut self, namer: &AssetNamer) {
        namer.apply(&mut self.manifest.bins);
    }

    /// Persist `{name → version}` changes.
    ///
    /// The file is patched in place; the in-memory entries get the new version,
    /// lose their pinned checksum and have their assets recomputed.
    pub fn apply_versions(&mut self, changes: &BTreeMap<String, String>, namer: &AssetNamer) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let origin = self.path.display().to_string();
        let text = fs::read_to_string(&self.path)?;
        let patched =
            patch_versions(&text, changes).map_err(|e| Error::config_invalid(&origin, e.to_string()))?;
        fs::write(&self.path, patched)?;

        for bin in self.manifest.bins.iter_mut() {
            if let Some(version) = changes.get(&bin.name) {
                info!(name = %bin.name, from = %bin.version, to = %version, "manifest entry upgraded");
                bin.version = version.clone();
                bin.checksum = None;
            }
        }
        self.resolve_assets(namer);
        Ok(())
    }
}
