//! Debian package versions
//!
//! Grammar: `[epoch":"]upstream-version["-"revision]`. The upstream component
//! must start with a digit and the revision splits at the last `-`, so
//! `1.2-3-4` is upstream `1.2-3` with revision `4`.
//!
//! Ordering follows the dpkg algorithm but covers the upstream component
//! only. Advisories reference upstream releases; the epoch and the packaging
//! revision are distribution artifacts and comparing them would mismatch
//! advisory data against installed packages. Both are still parsed and kept
//! for display.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::error::ParseError;
use crate::types::PackageFamily;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<epoch>\d+):)?(?P<upstream>[0-9][A-Za-z0-9.+:~-]*?)(?:-(?P<revision>[A-Za-z0-9+.~]+))?$")
        .unwrap()
});

/// A parsed Debian package version
#[derive(Debug, Clone)]
pub struct DebianVersion {
    epoch: Option<u32>,
    upstream: String,
    revision: Option<String>,
}

impl DebianVersion {
    /// Parse a Debian version string.
    ///
    /// A version containing `:` must start with a numeric epoch; an empty or
    /// non-numeric epoch is rejected rather than folded into the upstream
    /// component.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let err = |reason: &str| ParseError::version(PackageFamily::Debian, raw, reason);

        if let Some((epoch, _)) = raw.split_once(':') {
            if epoch.is_empty() {
                return Err(err("empty epoch before ':'"));
            }
            if !epoch.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err("epoch must be a non-negative integer"));
            }
        }

        let Some(caps) = VERSION_RE.captures(raw) else {
            return Err(err(
                "expected [epoch:]upstream[-revision] with upstream starting with a digit",
            ));
        };

        let epoch = caps
            .name("epoch")
            .map(|m| m.as_str().parse::<u32>())
            .transpose()
            .map_err(|_| err("epoch out of range"))?;

        let upstream = caps["upstream"].to_string();
        if upstream.ends_with('-') {
            // Grammar reading: the revision production needs at least one
            // character, so a trailing bare dash stays in upstream.
            warn!("debian version '{}' ends with a bare '-'", raw);
        }

        let revision = caps.name("revision").map(|m| m.as_str().to_string());

        Ok(DebianVersion {
            epoch,
            upstream,
            revision,
        })
    }

    /// Epoch, defaulting to 0 when absent. Display only, never compared.
    pub fn epoch(&self) -> u32 {
        self.epoch.unwrap_or(0)
    }

    /// Upstream component, the only part that participates in ordering
    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// Packaging revision, defaulting to "0" when absent. Display only.
    pub fn revision(&self) -> &str {
        self.revision.as_deref().unwrap_or("0")
    }
}

/// Weight of a character within a non-digit run: `~` sorts below the run
/// ending, letters sort below every other character.
fn char_weight(c: char) -> i32 {
    match c {
        '~' => -1,
        c if c.is_ascii_alphabetic() => c as i32,
        c => c as i32 + 256,
    }
}

/// Compare two non-digit runs. Exhausted runs weigh 0, which places `~`
/// before the empty run and letters after it.
fn cmp_non_digit(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(char_weight)
        .chain(std::iter::repeat(0))
        .zip(b.chars().map(char_weight).chain(std::iter::repeat(0)))
        .take(a.len().max(b.len()))
        .map(|(x, y)| x.cmp(&y))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Compare two digit runs numerically without a bignum type: leading zeros
/// are insignificant, a longer stripped run is larger, equal lengths compare
/// lexically.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn split_at_digit(s: &str) -> (&str, &str) {
    let pos = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(pos)
}

fn split_at_non_digit(s: &str) -> (&str, &str) {
    let pos = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(pos)
}

/// dpkg component comparison: alternating non-digit and digit runs until one
/// side wins. Differing component counts are legal (`1.2` sorts below
/// `1.2.0`).
fn cmp_component(mut a: &str, mut b: &str) -> Ordering {
    while !a.is_empty() || !b.is_empty() {
        let (a_run, a_rest) = split_at_digit(a);
        let (b_run, b_rest) = split_at_digit(b);
        match cmp_non_digit(a_run, b_run) {
            Ordering::Equal => {}
            ord => return ord,
        }

        let (a_num, a_rest) = split_at_non_digit(a_rest);
        let (b_num, b_rest) = split_at_non_digit(b_rest);
        match cmp_digits(a_num, b_num) {
            Ordering::Equal => {}
            ord => return ord,
        }

        a = a_rest;
        b = b_rest;
    }
    Ordering::Equal
}

impl Ord for DebianVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_component(&self.upstream, &other.upstream)
    }
}

impl PartialOrd for DebianVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DebianVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DebianVersion {}

impl fmt::Display for DebianVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(epoch) = self.epoch {
            write!(f, "{}:", epoch)?;
        }
        f.write_str(&self.upstream)?;
        if let Some(revision) = &self.revision {
            write!(f, "-{}", revision)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2", 0, "1.2", "0")]
    #[case("1:2.3", 1, "2.3", "0")]
    #[case("1.2-3", 0, "1.2", "3")]
    #[case("1.2-3-4", 0, "1.2-3", "4")]
    #[case("2.3.4~dfsg", 0, "2.3.4~dfsg", "0")]
    #[case("1:2:3", 1, "2:3", "0")]
    #[case("2.4.50-1ubuntu1", 0, "2.4.50", "1ubuntu1")]
    #[case("1.2-", 0, "1.2-", "0")]
    fn parse_splits_components(
        #[case] raw: &str,
        #[case] epoch: u32,
        #[case] upstream: &str,
        #[case] revision: &str,
    ) {
        let version = DebianVersion::parse(raw).unwrap();
        assert_eq!(version.epoch(), epoch);
        assert_eq!(version.upstream(), upstream);
        assert_eq!(version.revision(), revision);
    }

    #[rstest]
    #[case("")] // empty
    #[case("abc")] // upstream must start with a digit
    #[case(":1.2")] // empty epoch
    #[case("x:1.2")] // non-numeric epoch
    #[case("1.2_3")] // underscore outside the allowed charset
    #[case("1.2 3")] // whitespace
    fn parse_rejects_malformed_input(#[case] raw: &str) {
        assert!(DebianVersion::parse(raw).is_err());
    }

    #[rstest]
    #[case("1.2", "1.2.0", Ordering::Less)]
    #[case("1.2~0", "1.2", Ordering::Less)]
    #[case("1.2~rc1", "1.2", Ordering::Less)]
    #[case("1.2", "1.2a", Ordering::Less)]
    #[case("1.2a", "1.2+1", Ordering::Less)]
    #[case("1.9", "1.10", Ordering::Less)]
    #[case("2.3.4~dfsg", "2.3.4", Ordering::Less)]
    #[case("1.2", "1.2", Ordering::Equal)]
    #[case("0:1.2", "1.2", Ordering::Equal)] // epoch never compared
    #[case("3:1.2", "1.2", Ordering::Equal)]
    #[case("1.2-1", "1.2-2", Ordering::Equal)] // revision never compared
    #[case("1.2-3-4", "1.2-3-5", Ordering::Equal)]
    #[case("10.0", "9.0", Ordering::Greater)]
    #[case("00001.2", "1.2", Ordering::Equal)] // leading zeros insignificant
    fn upstream_only_ordering(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        let a = DebianVersion::parse(a).unwrap();
        let b = DebianVersion::parse(b).unwrap();
        assert_eq!(a.cmp(&b), expected);
        if expected == Ordering::Equal {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn very_long_digit_runs_compare_numerically() {
        let a = DebianVersion::parse("1.18446744073709551616").unwrap(); // u64::MAX + 1
        let b = DebianVersion::parse("1.18446744073709551615").unwrap();
        assert_eq!(a.cmp(&b), Ordering::Greater);
    }

    #[rstest]
    #[case("1:2.3-4")]
    #[case("1.2-3-4")]
    #[case("2.3.4~dfsg")]
    fn display_reconstructs_the_parsed_form(#[case] raw: &str) {
        let version = DebianVersion::parse(raw).unwrap();
        assert_eq!(version.to_string(), raw);
    }
}
