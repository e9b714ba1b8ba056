//! PyPI package versions
//!
//! PEP 440 shaped grammar `[epoch"!"]release[pre][post][dev][local]` with a
//! deliberately narrow pre-release vocabulary: `a`, `b`, `rc`, plus the
//! `pre` spelling found throughout advisory feeds (normalized to `rc`).
//! Other spellings such as `alpha` are rejected rather than normalized.
//!
//! Epoch and local segments are parsed and kept for display but excluded
//! from ordering: advisories reference the public upstream release, so
//! `1!1.2` and `1.2+deadbeef` both match an advisory that names `1.2`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::types::PackageFamily;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        (?:(?P<epoch>\d+)!)?
        (?P<release>\d+(?:\.\d+)*)
        (?:\.?(?P<pre_tag>a|b|rc|pre)(?P<pre_n>\d+))?
        (?:\.?post(?P<post>\d+))?
        (?:\.?dev(?P<dev>\d+))?
        (?:\+(?P<local>[A-Za-z0-9]+(?:[._-][A-Za-z0-9]+)*))?
        $",
    )
    .unwrap()
});

/// Pre-release cycle tag, ordered `a < b < rc`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreTag {
    Alpha,
    Beta,
    Rc,
}

impl PreTag {
    fn as_str(&self) -> &'static str {
        match self {
            PreTag::Alpha => "a",
            PreTag::Beta => "b",
            PreTag::Rc => "rc",
        }
    }
}

/// A parsed PyPI package version
#[derive(Debug, Clone)]
pub struct PypiVersion {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreTag, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
}

impl PypiVersion {
    /// Parse a PyPI version string.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let err = |reason: &str| ParseError::version(PackageFamily::Pypi, raw, reason);

        let Some(caps) = VERSION_RE.captures(raw) else {
            return Err(err(
                "expected [epoch!]release[{a|b|rc}N][.postN][.devN][+local]",
            ));
        };

        let epoch = match caps.name("epoch") {
            Some(m) => m.as_str().parse().map_err(|_| err("epoch out of range"))?,
            None => 0,
        };

        let release = caps["release"]
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| err("release component out of range"))?;

        let pre = match caps.name("pre_tag") {
            Some(tag) => {
                // the regex only admits a, b, rc and pre; pre is an rc spelling
                let tag = match tag.as_str() {
                    "a" => PreTag::Alpha,
                    "b" => PreTag::Beta,
                    _ => PreTag::Rc,
                };
                let n = caps["pre_n"]
                    .parse()
                    .map_err(|_| err("pre-release number out of range"))?;
                Some((tag, n))
            }
            None => None,
        };

        let post = caps
            .name("post")
            .map(|m| m.as_str().parse())
            .transpose()
            .map_err(|_| err("post number out of range"))?;

        let dev = caps
            .name("dev")
            .map(|m| m.as_str().parse())
            .transpose()
            .map_err(|_| err("dev number out of range"))?;

        let local = caps.name("local").map(|m| m.as_str().to_string());

        Ok(PypiVersion {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Epoch, 0 when absent. Display only, never compared.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Release number components
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// Local segment, kept for display only
    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    /// Ordering key for the pre/post/dev suffix combination, following the
    /// PEP 440 total order within one release number: a dev-only version
    /// sorts below every pre-release, a missing pre-release sorts above all
    /// of them, and dev sorts before the segment it modifies.
    fn suffix_key(&self) -> ((u8, u8, u64), (u8, u64), (u8, u64)) {
        let pre = match (self.pre, self.post, self.dev) {
            (Some((tag, n)), _, _) => (1, tag as u8, n),
            (None, None, Some(_)) => (0, 0, 0),
            (None, _, _) => (2, 0, 0),
        };
        let post = match self.post {
            Some(n) => (1, n),
            None => (0, 0),
        };
        let dev = match self.dev {
            Some(n) => (0, n),
            None => (1, 0),
        };
        (pre, post, dev)
    }
}

/// Compare release tuples with implicit zero padding, so `1.2` and `1.2.0`
/// are the same release.
fn cmp_release(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    Ordering::Equal
}

impl Ord for PypiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_release(&self.release, &other.release)
            .then_with(|| self.suffix_key().cmp(&other.suffix_key()))
    }
}

impl PartialOrd for PypiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PypiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PypiVersion {}

impl fmt::Display for PypiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let mut first = true;
        for part in &self.release {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{}", part)?;
            first = false;
        }
        if let Some((tag, n)) = self.pre {
            write!(f, "{}{}", tag.as_str(), n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{}", n)?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{}", n)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}
