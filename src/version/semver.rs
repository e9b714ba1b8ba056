//! Semver-family versions: generic semver, npm and Go modules
//!
//! All three dialects (plus the `unknown` fallback family) share one
//! grammar: `major["."minor]["."patch]["-"prerelease]["+"build]`. Missing
//! minor and patch default to 0, and a legacy 4th numeric segment is
//! accepted but dropped before the value is built, so `1.2.3.4` and
//! `1.2.3.5` are the same version.
//!
//! Normalization delegates to the `semver` crate; ordering goes through
//! `Version::cmp_precedence`, which never looks at build metadata. The Go
//! dialect additionally strips the conventional `v` prefix, and its
//! pseudo-versions (`0.0.0-20210101000000-abcdef123456`) ride through as
//! ordinary prerelease identifiers. npm adds no leniency beyond generic
//! semver.

use std::cmp::Ordering;
use std::fmt;

use crate::error::ParseError;
use crate::types::PackageFamily;

/// A parsed semver-family version, tagged with its dialect
#[derive(Debug, Clone)]
pub struct SemverVersion {
    family: PackageFamily,
    version: semver::Version,
}

impl SemverVersion {
    /// Parse a version string under one of the semver dialects.
    pub fn parse(family: PackageFamily, raw: &str) -> Result<Self, ParseError> {
        debug_assert!(family.is_semver_dialect());
        let err = |reason: String| ParseError::version(family, raw, reason);

        let text = if family == PackageFamily::Go {
            raw.strip_prefix(['v', 'V']).unwrap_or(raw)
        } else {
            raw
        };

        let (text, build) = match text.split_once('+') {
            Some((text, build)) => (text, Some(build)),
            None => (text, None),
        };
        let (core, prerelease) = match text.split_once('-') {
            Some((core, prerelease)) => (core, Some(prerelease)),
            None => (text, None),
        };

        let segments: Vec<&str> = core.split('.').collect();
        if segments.len() > 4 {
            return Err(err("expected at most four numeric segments".into()));
        }
        let numbers = segments
            .iter()
            .map(|s| s.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| err("version core must be dot-separated integers".into()))?;

        // a 4th segment was validated above but does not survive into the value
        let major = numbers[0];
        let minor = numbers.get(1).copied().unwrap_or(0);
        let patch = numbers.get(2).copied().unwrap_or(0);

        let mut normalized = format!("{}.{}.{}", major, minor, patch);
        if let Some(prerelease) = prerelease {
            normalized.push('-');
            normalized.push_str(prerelease);
        }
        if let Some(build) = build {
            normalized.push('+');
            normalized.push_str(build);
        }

        let version = semver::Version::parse(&normalized).map_err(|e| err(e.to_string()))?;
        Ok(SemverVersion { family, version })
    }

    /// Dialect this version was parsed under
    pub fn family(&self) -> PackageFamily {
        self.family
    }

    /// Build metadata, kept for display only
    pub fn build(&self) -> Option<&str> {
        if self.version.build.is_empty() {
            None
        } else {
            Some(self.version.build.as_str())
        }
    }
}

impl Ord for SemverVersion {
    /// Precedence order: build metadata never participates. Family guarding
    /// happens at the [`crate::version::Version`] boundary.
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp_precedence(&other.version)
    }
}

impl PartialOrd for SemverVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemverVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemverVersion {}

impl fmt::Display for SemverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.version.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(raw: &str) -> SemverVersion {
        SemverVersion::parse(PackageFamily::Semver, raw).unwrap()
    }

    #[rstest]
    #[case("1", "1.0.0")]
    #[case("1.2", "1.2.0")]
    #[case("1.2.3", "1.2.3")]
    #[case("1.2.3.4", "1.2.3")] // 4th segment dropped
    #[case("1.2.3-rc1", "1.2.3-rc1")]
    #[case("1.2.3-rc.1+build5", "1.2.3-rc.1+build5")]
    fn parse_normalizes_partial_versions(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(parse(raw).to_string(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("1.2.3.4.5")] // five segments
    #[case("1.x")]
    #[case("v1.2.3")] // the v prefix is a Go convention
    #[case("1.2.3-")] // empty prerelease
    #[case("1.2.3-rc..1")] // empty prerelease identifier
    #[case("^1.2.3")] // constraint operators are not versions
    fn parse_rejects_malformed_input(#[case] raw: &str) {
        assert!(SemverVersion::parse(PackageFamily::Semver, raw).is_err());
    }

    #[rstest]
    #[case("1.2.3-rc1", "1.2.3", Ordering::Less)]
    #[case("1.2.3-alpha", "1.2.3-beta", Ordering::Less)]
    #[case("1.2.3-alpha.1", "1.2.3-alpha.2", Ordering::Less)]
    #[case("1.2.3-2", "1.2.3-alpha", Ordering::Less)] // numeric below alphanumeric
    #[case("1.2.3-10", "1.2.3-9", Ordering::Greater)] // numeric identifiers numerically
    #[case("1.2", "1.2.0", Ordering::Equal)]
    #[case("1.2.3.4", "1.2.3.5", Ordering::Equal)] // dropped segment
    #[case("1.2.3-rc1+build1", "1.2.3-rc1+build2", Ordering::Equal)]
    #[case("1.2.3+build1", "1.2.3", Ordering::Equal)]
    #[case("2.0.0", "10.0.0", Ordering::Less)]
    fn precedence_ordering(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        let a = parse(a);
        let b = parse(b);
        assert_eq!(a.cmp(&b), expected);
        if expected == Ordering::Equal {
            assert_eq!(a, b);
        }
    }

    #[rstest]
    #[case("v1.2.3", "1.2.3")]
    #[case("V1.2.3", "1.2.3")]
    #[case("1.2.3", "1.2.3")]
    #[case("v2.0.0+incompatible", "2.0.0+incompatible")]
    fn go_dialect_strips_the_v_prefix(#[case] raw: &str, #[case] expected: &str) {
        let version = SemverVersion::parse(PackageFamily::Go, raw).unwrap();
        assert_eq!(version.to_string(), expected);
    }

    #[test]
    fn go_pseudo_versions_order_by_timestamp() {
        let older =
            SemverVersion::parse(PackageFamily::Go, "v0.0.0-20210101000000-abc123def456").unwrap();
        let newer =
            SemverVersion::parse(PackageFamily::Go, "v0.0.0-20210201000000-def456abc123").unwrap();
        assert_eq!(older.cmp(&newer), Ordering::Less);
    }

    #[test]
    fn incompatible_suffix_is_build_metadata() {
        let with = SemverVersion::parse(PackageFamily::Go, "v2.0.0+incompatible").unwrap();
        let without = SemverVersion::parse(PackageFamily::Go, "v2.0.0").unwrap();
        assert_eq!(with.cmp(&without), Ordering::Equal);
        assert_eq!(with.build(), Some("incompatible"));
        assert_eq!(without.build(), None);
    }
}
