//! Asset name templating
//!
//! Expands `asset_pattern` placeholders in a fixed order:
//! `{name} {version} {goos} {goarch} {os} {arch} {triple}`. Unknown
//! placeholders are left in place.

use crate::platform::PlatformIdentity;
use crate::types::BinSpec;

/// Computes asset names for the host described by a `PlatformIdentity`
#[derive(Debug, Clone)]
pub struct AssetNamer {
    platform: PlatformIdentity,
}

impl AssetNamer {
    pub fn new(platform: PlatformIdentity) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &PlatformIdentity {
        &self.platform
    }

    /// Expand the entry's asset pattern; toolchain entries get no asset
    pub fn expand(&self, spec: &BinSpec) -> String {
        if spec.is_toolchain() {
            return String::new();
        }

        let p = &self.platform;
        let values: [(&str, &str); 7] = [
            ("name", &spec.name),
            ("version", spec.unprefixed_version()),
            ("goos", &p.goos),
            ("goarch", &p.goarch),
            ("os", &p.uname_os),
            ("arch", &p.uname_arch),
            ("triple", &p.triple),
        ];

        let mut asset = spec.asset_pattern.clone().unwrap_or_default();
        for (placeholder, raw) in values {
            let value = modified(spec, placeholder, raw);
            asset = asset.replace(&format!("{{{}}}", placeholder), value);
        }
        asset
    }

    /// Recompute the derived `asset` of every entry
    pub fn apply(&self, specs: &mut [BinSpec]) {
        for spec in specs.iter_mut() {
            spec.asset = self.expand(spec);
        }
    }
}

/// Remapped value for a placeholder, or the raw value
fn modified<'a>(spec: &'a BinSpec, placeholder: &str, raw: &'a str) -> &'a str {
    spec.modifiers
        .get(placeholder)
        .and_then(|table| table.get(raw))
        .map(String::as_str)
        .unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn platform(goos: &str, goarch: &str) -> PlatformIdentity {
        let (os, arch) = match (goos, goarch) {
            ("darwin", "arm64") => ("Darwin", "arm64"),
            _ => ("Linux", "x86_64"),
        };
        PlatformIdentity::new(goos, goarch, os, arch, "x86_64-unknown-linux-gnu")
    }

    fn spec(name: &str, version: &str, pattern: &str) -> BinSpec {
        BinSpec {
            name: name.into(),
            version: version.into(),
            url: Some(format!("https://github.com/example/{}", name)),
            asset_pattern: Some(pattern.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_expand_all_placeholders() {
        let namer = AssetNamer::new(platform("linux", "amd64"));
        let s = spec("tool", "v1.2.3", "{name}-{version}-{goos}-{goarch}-{os}-{arch}-{triple}");
        assert_eq!(
            namer.expand(&s),
            "tool-1.2.3-linux-amd64-Linux-x86_64-x86_64-unknown-linux-gnu"
        );
    }

    #[test]
    fn test_modifiers() {
        let namer = AssetNamer::new(platform("darwin", "arm64"));
        let mut s = spec("grpcurl", "1.9.3", "{name}_{version}_{goos}_{goarch}.tar.gz");
        s.modifiers = HashMap::from([(
            "goos".to_string(),
            HashMap::from([("darwin".to_string(), "osx".to_string())]),
        )]);
        assert_eq!(namer.expand(&s), "grpcurl_1.9.3_osx_arm64.tar.gz");

        // A modifier for a value that does not occur is ignored.
        let linux = AssetNamer::new(platform("linux", "amd64"));
        assert_eq!(linux.expand(&s), "grpcurl_1.9.3_linux_amd64.tar.gz");
    }

    #[test]
    fn test_unknown_placeholder_untouched() {
        let namer = AssetNamer::new(platform("linux", "amd64"));
        let s = spec("tool", "1.0.0", "{name}-{libc}-{goarch}");
        assert_eq!(namer.expand(&s), "tool-{libc}-amd64");
    }

    #[test]
    fn test_toolchain_entries_skipped() {
        let namer = AssetNamer::new(platform("linux", "amd64"));
        let mut specs = vec![
            spec("perpignan", "1.0.0", "{name}_{version}_{goos}_{goarch}"),
            BinSpec {
                name: "goa".into(),
                version: "3.16.1".into(),
                go_package: Some("goa.design/goa/v3/cmd/goa".into()),
                asset_pattern: Some("{name}".into()),
                ..Default::default()
            },
        ];
        namer.apply(&mut specs);
        assert_eq!(specs[0].asset, "perpignan_1.0.0_linux_amd64");
        assert_eq!(specs[1].asset, "");
    }

    #[test]
    fn test_missing_pattern_yields_empty_asset() {
        let namer = AssetNamer::new(platform("linux", "amd64"));
        let mut s = spec("tool", "1.0.0", "");
        s.asset_pattern = None;
        assert_eq!(namer.expand(&s), "");
    }
}
