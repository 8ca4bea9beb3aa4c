//! Version canonicalization and release tag patterns
//!
//! Declared versions are free-form (`1.2.3`, `v1.2.3`, `jq-1.7`). Comparisons
//! only happen on the canonical semantic-version form `vMAJOR.MINOR.PATCH[-pre]`.
//! Anything that does not canonicalize is reported as not comparable.

use regex::Regex;
use std::cmp::Ordering;

/// Default release tag pattern
pub const DEFAULT_TAG_PATTERN: &str = "v{version}";

const VERSION_PLACEHOLDER: &str = "{version}";

/// Canonical form of a version string, or `None` when it is not semver.
///
/// A leading `v` is optional. The short forms `v1` and `v1.2` are padded with
/// zeros; build metadata is dropped.
///
/// ```
/// use bine_core::version::canonical;
///
/// assert_eq!(canonical("1.2.3").as_deref(), Some("v1.2.3"));
/// assert_eq!(canonical("v2").as_deref(), Some("v2.0.0"));
/// assert_eq!(canonical("1.0.0-rc.1+build.5").as_deref(), Some("v1.0.0-rc.1"));
/// assert_eq!(canonical("jq-1.7"), None);
/// ```
pub fn canonical(version: &str) -> Option<String> {
    parse(version).map(|v| format!("v{}", v))
}

/// Parse a version into a `semver::Version` with build metadata removed
pub fn parse(version: &str) -> Option<semver::Version> {
    let bare = unprefixed(version);
    if bare.is_empty() {
        return None;
    }

    let padded = match bare.split('.').count() {
        1 if is_numeric(bare) => format!("{}.0.0", bare),
        2 if bare.split('.').all(is_numeric) => format!("{}.0", bare),
        _ => bare.to_string(),
    };

    let mut parsed = semver::Version::parse(&padded).ok()?;
    parsed.build = semver::BuildMetadata::EMPTY;
    Some(parsed)
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Strip one leading `v`
pub fn unprefixed(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Canonical form when valid, otherwise the declared text
pub fn usable(version: &str) -> String {
    canonical(version).unwrap_or_else(|| version.to_string())
}

/// Compare two versions by semver precedence.
///
/// Returns `None` if either side fails to canonicalize.
pub fn compare(a: &str, b: &str) -> Option<Ordering> {
    Some(parse(a)?.cmp(&parse(b)?))
}

/// Expand a tag pattern with the unprefixed version
pub fn format_tag(pattern: Option<&str>, version: &str) -> String {
    let pattern = match pattern {
        Some(p) if !p.is_empty() => p,
        _ => DEFAULT_TAG_PATTERN,
    };
    pattern.replace(VERSION_PLACEHOLDER, unprefixed(version))
}

/// Reverse matcher for a release tag pattern.
///
/// The pattern is escaped literally, `{version}` becomes a capture group and
/// the whole expression is anchored, so `jq-{version}` matches `jq-1.8.0` and
/// yields `1.8.0`.
#[derive(Debug, Clone)]
pub struct TagMatcher {
    regex: Regex,
}

impl TagMatcher {
    /// Build a matcher; an empty pattern means the default `v{version}`
    pub fn new(pattern: Option<&str>) -> Result<Self, regex::Error> {
        let pattern = match pattern {
            Some(p) if !p.is_empty() => p,
            _ => DEFAULT_TAG_PATTERN,
        };
        let escaped = regex::escape(pattern).replace(&regex::escape(VERSION_PLACEHOLDER), "(.+)");
        let regex = Regex::new(&format!("^{}$", escaped))?;
        Ok(Self { regex })
    }

    /// Version embedded in `tag`, if the tag follows the pattern
    pub fn extract<'t>(&self, tag: &'t str) -> Option<&'t str> {
        self.regex
            .captures(tag)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}
