//! Version value types and the parsing factory
//!
//! One value type per versioning grammar, glued together by the [`Version`]
//! sum type:
//!
//! - [`debian`]: dpkg ordering over the upstream component only
//! - [`pypi`]: PEP 440 shaped versions with a narrow pre-release vocabulary
//! - [`semver`]: generic semver plus the npm, Go and unknown dialects
//!
//! `Version` is deliberately not `PartialEq`/`PartialOrd`: the only way to
//! compare two versions is [`Version::compare`], which fails with a
//! [`ComparisonError`] when the families differ instead of guessing. The
//! same applies to any two dialects of the semver grammar: an npm `1.2.3`
//! and a Go `v1.2.3` are different families.

pub mod debian;
pub mod pypi;
pub mod semver;

pub use debian::DebianVersion;
pub use pypi::PypiVersion;
pub use semver::SemverVersion;

use std::cmp::Ordering;
use std::fmt;

use crate::error::{ComparisonError, ParseError};
use crate::types::PackageFamily;

/// A parsed package version, tagged with its family
#[derive(Debug, Clone)]
pub enum Version {
    Debian(DebianVersion),
    Pypi(PypiVersion),
    Semver(SemverVersion),
}

/// Parse `raw` under the version grammar of `family`.
///
/// This is the single entry point the threat-detection pipeline uses to turn
/// SBOM and advisory version strings into comparable values.
pub fn parse_version(family: PackageFamily, raw: &str) -> Result<Version, ParseError> {
    match family {
        PackageFamily::Debian => DebianVersion::parse(raw).map(Version::Debian),
        PackageFamily::Pypi => PypiVersion::parse(raw).map(Version::Pypi),
        PackageFamily::Semver | PackageFamily::Npm | PackageFamily::Go | PackageFamily::Unknown => {
            SemverVersion::parse(family, raw).map(Version::Semver)
        }
    }
}

impl Version {
    /// Family this version was parsed under
    pub fn family(&self) -> PackageFamily {
        match self {
            Version::Debian(_) => PackageFamily::Debian,
            Version::Pypi(_) => PackageFamily::Pypi,
            Version::Semver(version) => version.family(),
        }
    }

    /// Total order against another version of the same family.
    ///
    /// Comparing versions of different families is an error at this call,
    /// never a panic and never a silent answer.
    pub fn compare(&self, other: &Version) -> Result<Ordering, ComparisonError> {
        match (self, other) {
            (Version::Debian(a), Version::Debian(b)) => Ok(a.cmp(b)),
            (Version::Pypi(a), Version::Pypi(b)) => Ok(a.cmp(b)),
            (Version::Semver(a), Version::Semver(b)) if a.family() == b.family() => Ok(a.cmp(b)),
            _ => Err(ComparisonError {
                left: self.family(),
                right: other.family(),
            }),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Debian(version) => version.fmt(f),
            Version::Pypi(version) => version.fmt(f),
            Version::Semver(version) => version.fmt(f),
        }
    }
}
