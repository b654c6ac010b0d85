//! Tag parsing into semantic versions
//!
//! Image tags come in two shapes: fully qualified (`1.25.3`, `1.25.3-alpine`)
//! and partial (`1.25`, `16`, `v3.19-alpine`). Both parse into a [`TagVersion`]
//! that remembers whether the numeric core had all three components.

use std::cmp::Ordering;

use semver::{Prerelease, Version};

use crate::version::error::VersionParseError;

/// How strictly a tag must follow `MAJOR.MINOR.PATCH`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Exactly three numeric components in SemVer 2.0 grammar, no prefix
    Strict,
    /// One to three numeric components, optional `v` prefix, missing components are zero
    Lenient,
}

/// A semantic version parsed from an image tag
#[derive(Debug, Clone)]
pub struct TagVersion {
    version: Version,
    strict: bool,
    original: String,
}

impl TagVersion {
    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    /// Pre-release qualifier without the leading `-` (empty for releases)
    pub fn prerelease(&self) -> &str {
        self.version.pre.as_str()
    }

    /// True when the numeric core spelled out all three components
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// The tag text this version was parsed from
    pub fn original(&self) -> &str {
        &self.original
    }

    /// True when the tag text has at least three dot-separated parts.
    ///
    /// Counts every dot, qualifier included, so `3.12-alpine3.19` and
    /// `1.2-rc.1` count as fully specified.
    pub fn has_full_form(&self) -> bool {
        self.original.splitn(3, '.').count() == 3
    }

    fn precedence_key(&self) -> (u64, u64, u64, &Prerelease) {
        (
            self.version.major,
            self.version.minor,
            self.version.patch,
            &self.version.pre,
        )
    }
}

// Build metadata is ignored, as SemVer precedence requires.
impl PartialEq for TagVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TagVersion {}

impl PartialOrd for TagVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TagVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // semver::Prerelease orders the empty qualifier above any pre-release
        self.precedence_key().cmp(&other.precedence_key())
    }
}

impl std::fmt::Display for TagVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Parse an image tag as a semantic version under the given mode.
///
/// Examples:
/// - `parse_tag("1.2.3", Strict)` -> 1.2.3 (strict)
/// - `parse_tag("v1.2.3", Strict)` -> error
/// - `parse_tag("1.2", Strict)` -> error
/// - `parse_tag("1.2", Lenient)` -> 1.2.0 (not strict)
/// - `parse_tag("v3.19-alpine", Lenient)` -> 3.19.0-alpine (not strict)
pub fn parse_tag(tag: &str, mode: ParseMode) -> Result<TagVersion, VersionParseError> {
    if tag.is_empty() {
        return Err(VersionParseError::Empty);
    }

    match mode {
        ParseMode::Strict => {
            if !version_prefix(tag).is_empty() {
                return Err(VersionParseError::Invalid {
                    tag: tag.to_string(),
                    reason: "prefix is not allowed in strict mode".to_string(),
                });
            }
            let version = Version::parse(tag).map_err(|e| {
                if numeric_core(tag).split('.').count() != 3 {
                    VersionParseError::NotStrict(tag.to_string())
                } else {
                    VersionParseError::Invalid {
                        tag: tag.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;
            Ok(TagVersion {
                version,
                strict: true,
                original: tag.to_string(),
            })
        }
        ParseMode::Lenient => parse_lenient(tag),
    }
}

fn parse_lenient(tag: &str) -> Result<TagVersion, VersionParseError> {
    let stripped = strip_v_prefix(tag);

    let core = numeric_core(stripped);
    let suffix = &stripped[core.len()..];

    let components = core
        .split('.')
        .map(|part| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            part.parse::<u64>().ok()
        })
        .collect::<Option<Vec<u64>>>()
        .ok_or_else(|| VersionParseError::NonNumeric(tag.to_string()))?;

    let (major, minor, patch) = match components.as_slice() {
        [major] => (*major, 0, 0),
        [major, minor] => (*major, *minor, 0),
        [major, minor, patch] => (*major, *minor, *patch),
        _ => return Err(VersionParseError::NonNumeric(tag.to_string())),
    };

    let normalized = format!("{}.{}.{}{}", major, minor, patch, suffix);
    let version = Version::parse(&normalized).map_err(|e| VersionParseError::Invalid {
        tag: tag.to_string(),
        reason: e.to_string(),
    })?;

    Ok(TagVersion {
        version,
        strict: components.len() == 3,
        original: tag.to_string(),
    })
}

fn strip_v_prefix(tag: &str) -> &str {
    tag.strip_prefix('v')
        .or_else(|| tag.strip_prefix('V'))
        .unwrap_or(tag)
}

/// The `v`/`V` prefix of a tag, empty when there is none
pub fn version_prefix(tag: &str) -> &str {
    &tag[..tag.len() - strip_v_prefix(tag).len()]
}

/// The part of a version string before any `-pre` or `+build` suffix
fn numeric_core(tag: &str) -> &str {
    let end = tag.find(['-', '+']).unwrap_or(tag.len());
    &tag[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.3", 1, 2, 3, "")]
    #[case("10.0.0", 10, 0, 0, "")]
    #[case("1.0.0-beta", 1, 0, 0, "beta")]
    #[case("1.25.3-alpine", 1, 25, 3, "alpine")]
    #[case("2.0.0-rc.1+build.5", 2, 0, 0, "rc.1")]
    fn parse_tag_strict_accepts_full_versions(
        #[case] tag: &str,
        #[case] major: u64,
        #[case] minor: u64,
        #[case] patch: u64,
        #[case] pre: &str,
    ) {
        let v = parse_tag(tag, ParseMode::Strict).unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (major, minor, patch));
        assert_eq!(v.prerelease(), pre);
        assert!(v.is_strict());
    }

    #[rstest]
    #[case("1.2", VersionParseError::NotStrict("1.2".to_string()))]
    #[case("1", VersionParseError::NotStrict("1".to_string()))]
    #[case("1.2.3.4", VersionParseError::NotStrict("1.2.3.4".to_string()))]
    #[case("", VersionParseError::Empty)]
    fn parse_tag_strict_rejects_partial_versions(
        #[case] tag: &str,
        #[case] expected: VersionParseError,
    ) {
        assert_eq!(parse_tag(tag, ParseMode::Strict).unwrap_err(), expected);
    }

    #[rstest]
    #[case("v1.2.3")]
    #[case("V1.2.3")]
    fn parse_tag_strict_rejects_prefixed_versions(#[case] tag: &str) {
        assert!(matches!(
            parse_tag(tag, ParseMode::Strict),
            Err(VersionParseError::Invalid { .. })
        ));
    }

    #[rstest]
    #[case("1.2.3", true)]
    #[case("v2.10.3", true)]
    #[case("3.12-alpine3.19", true)]
    #[case("1.2-rc.1", true)]
    #[case("1.2", false)]
    #[case("16", false)]
    #[case("3.19-alpine", false)]
    fn has_full_form_counts_dots_in_tag_text(#[case] tag: &str, #[case] expected: bool) {
        let v = parse_tag(tag, ParseMode::Lenient).unwrap();
        assert_eq!(v.has_full_form(), expected);
        assert_eq!(v.original(), tag);
    }

    #[rstest]
    #[case("v1.2.3", "v")]
    #[case("V1.2", "V")]
    #[case("1.2.3", "")]
    fn version_prefix_returns_leading_v(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(version_prefix(tag), expected);
    }

    #[test]
    fn parse_tag_strict_rejects_leading_zeros() {
        assert!(matches!(
            parse_tag("01.2.3", ParseMode::Strict),
            Err(VersionParseError::Invalid { .. })
        ));
    }

    #[rstest]
    #[case("1.2", 1, 2, 0, "", false)]
    #[case("16", 16, 0, 0, "", false)]
    #[case("1.2.3", 1, 2, 3, "", true)]
    #[case("v1.2.3", 1, 2, 3, "", true)]
    #[case("3.19-alpine", 3, 19, 0, "alpine", false)]
    #[case("V2.1", 2, 1, 0, "", false)]
    #[case("1.02", 1, 2, 0, "", false)]
    fn parse_tag_lenient_accepts_partial_versions(
        #[case] tag: &str,
        #[case] major: u64,
        #[case] minor: u64,
        #[case] patch: u64,
        #[case] pre: &str,
        #[case] strict: bool,
    ) {
        let v = parse_tag(tag, ParseMode::Lenient).unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (major, minor, patch));
        assert_eq!(v.prerelease(), pre);
        assert_eq!(v.is_strict(), strict);
    }

    #[rstest]
    #[case("")]
    #[case("latest")]
    #[case("alpine")]
    #[case("1.x")]
    #[case("1..2")]
    #[case("1.2.3.4")]
    #[case("1.2-")]
    #[case("sha256")]
    fn parse_tag_lenient_rejects_malformed_tags(#[case] tag: &str) {
        assert!(parse_tag(tag, ParseMode::Lenient).is_err());
    }

    #[rstest]
    #[case("1.0.0-beta", "1.0.0", Ordering::Less)]
    #[case("1.0.0-alpha", "1.0.0-beta", Ordering::Less)]
    #[case("10.0.0", "9.0.0", Ordering::Greater)]
    #[case("1.2", "1.2.0", Ordering::Equal)]
    #[case("1.2.0+build1", "1.2.0+build2", Ordering::Equal)]
    fn tag_versions_order_by_precedence(
        #[case] left: &str,
        #[case] right: &str,
        #[case] expected: Ordering,
    ) {
        let left = parse_tag(left, ParseMode::Lenient).unwrap();
        let right = parse_tag(right, ParseMode::Lenient).unwrap();
        assert_eq!(left.cmp(&right), expected);
    }
}
