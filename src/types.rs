//! Common types for the matching engine

use serde::{Deserialize, Serialize};

/// Versioning scheme of a tracked package
///
/// Every version string and every vulnerable range is interpreted under
/// exactly one family; values of different families never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageFamily {
    /// Debian packages (dpkg version ordering)
    Debian,
    /// PyPI packages (PEP 440)
    Pypi,
    /// Generic semantic versioning
    Semver,
    /// npm registry packages
    Npm,
    /// Go modules
    Go,
    /// No recognizable ecosystem; versions use the semver grammar
    Unknown,
}

impl PackageFamily {
    /// Returns the string representation of the family
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageFamily::Debian => "debian",
            PackageFamily::Pypi => "pypi",
            PackageFamily::Semver => "semver",
            PackageFamily::Npm => "npm",
            PackageFamily::Go => "go",
            PackageFamily::Unknown => "unknown",
        }
    }

    /// All families known to the engine
    pub const ALL: [PackageFamily; 6] = [
        PackageFamily::Debian,
        PackageFamily::Pypi,
        PackageFamily::Semver,
        PackageFamily::Npm,
        PackageFamily::Go,
        PackageFamily::Unknown,
    ];

    /// Families whose version strings follow the semver grammar
    pub(crate) fn is_semver_dialect(&self) -> bool {
        matches!(
            self,
            PackageFamily::Semver | PackageFamily::Npm | PackageFamily::Go | PackageFamily::Unknown
        )
    }
}

impl std::str::FromStr for PackageFamily {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debian" => Ok(PackageFamily::Debian),
            "pypi" => Ok(PackageFamily::Pypi),
            "semver" => Ok(PackageFamily::Semver),
            "npm" => Ok(PackageFamily::Npm),
            "go" => Ok(PackageFamily::Go),
            "unknown" => Ok(PackageFamily::Unknown),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for PackageFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
