//! Vulnerable version ranges
//!
//! A [`VulnerableRange`] is the affected-version predicate of one
//! vulnerability: an exact version, or a validated lower/upper bound pair
//! over one family. Construction rejects contradictory configurations up
//! front, so malformed advisory data surfaces before any matching instead
//! of producing a silently wrong match.
//!
//! Textual form: `=1.2.3`, or one or two of the `>= > <= <` operators
//! attached to a version, e.g. `">=2.0.0 <2.3.4"`.

use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

use crate::error::{AmbiguityError, ComparisonError, ParseError, RangeError};
use crate::types::PackageFamily;
use crate::version::{Version, parse_version};

/// Optional bound slots for [`VulnerableRange::new`]
///
/// At most `eq` alone, or one of `ge`/`gt` with one of `le`/`lt`; anything
/// else is rejected at construction. A value with no slot set is legal and
/// matches every version of the family; some advisories affect all
/// releases of a package.
#[derive(Debug, Clone, Default)]
pub struct RangeBounds {
    pub eq: Option<Version>,
    pub ge: Option<Version>,
    pub gt: Option<Version>,
    pub le: Option<Version>,
    pub lt: Option<Version>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LowerOp {
    Ge,
    Gt,
}

impl LowerOp {
    fn as_str(&self) -> &'static str {
        match self {
            LowerOp::Ge => ">=",
            LowerOp::Gt => ">",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpperOp {
    Le,
    Lt,
}

impl UpperOp {
    fn as_str(&self) -> &'static str {
        match self {
            UpperOp::Le => "<=",
            UpperOp::Lt => "<",
        }
    }
}

/// Validated internal form: a half-configured range cannot exist.
#[derive(Debug, Clone)]
enum RangeKind {
    Exact(Version),
    Bounds {
        lower: Option<(LowerOp, Version)>,
        upper: Option<(UpperOp, Version)>,
    },
}

/// Affected-version predicate of one vulnerability
///
/// Built once per affected-range declaration and reused across every match
/// test against it.
#[derive(Debug, Clone)]
pub struct VulnerableRange {
    family: PackageFamily,
    kind: RangeKind,
}

impl VulnerableRange {
    /// Validate `bounds` and build the range.
    pub fn new(family: PackageFamily, bounds: RangeBounds) -> Result<Self, AmbiguityError> {
        let RangeBounds { eq, ge, gt, le, lt } = bounds;

        if eq.is_some() {
            let slots = [
                ("ge", ge.is_some()),
                ("gt", gt.is_some()),
                ("le", le.is_some()),
                ("lt", lt.is_some()),
            ];
            if let Some((op, _)) = slots.into_iter().find(|(_, set)| *set) {
                return Err(AmbiguityError::ExactWithBound { op });
            }
        }
        if ge.is_some() && gt.is_some() {
            return Err(AmbiguityError::ConflictingBounds {
                first: "ge",
                second: "gt",
            });
        }
        if le.is_some() && lt.is_some() {
            return Err(AmbiguityError::ConflictingBounds {
                first: "le",
                second: "lt",
            });
        }

        for version in [&eq, &ge, &gt, &le, &lt].into_iter().flatten() {
            if version.family() != family {
                return Err(AmbiguityError::FamilyMismatch {
                    declared: family,
                    found: version.family(),
                });
            }
        }

        let kind = match eq {
            Some(version) => RangeKind::Exact(version),
            None => RangeKind::Bounds {
                lower: ge
                    .map(|v| (LowerOp::Ge, v))
                    .or(gt.map(|v| (LowerOp::Gt, v))),
                upper: le
                    .map(|v| (UpperOp::Le, v))
                    .or(lt.map(|v| (UpperOp::Lt, v))),
            },
        };

        Ok(VulnerableRange { family, kind })
    }

    /// Parse a textual range under `family`.
    ///
    /// Grammar: `"=" version | (("<" | "<=" | ">" | ">=") version){1,2}`,
    /// tokens separated by whitespace. The resulting bound set goes through
    /// the same validation as [`VulnerableRange::new`].
    pub fn from_string(family: PackageFamily, text: &str) -> Result<Self, RangeError> {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(ParseError::range(text, "empty range expression").into());
        }

        if let Some(rest) = trimmed.strip_prefix('=') {
            let rest = rest.trim();
            if rest.split_whitespace().count() > 1 {
                return Err(ParseError::range(text, "exact form takes a single version").into());
            }
            let version = parse_version(family, rest)?;
            return Ok(Self::new(
                family,
                RangeBounds {
                    eq: Some(version),
                    ..RangeBounds::default()
                },
            )?);
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.len() > 2 {
            return Err(
                ParseError::range(text, "expected at most two operator version tokens").into(),
            );
        }

        let mut bounds = RangeBounds::default();
        for token in tokens {
            // two-character operators first, or ">=1.0" would read as "> =1.0"
            let (name, slot, rest) = if let Some(rest) = token.strip_prefix(">=") {
                ("ge", &mut bounds.ge, rest)
            } else if let Some(rest) = token.strip_prefix("<=") {
                ("le", &mut bounds.le, rest)
            } else if let Some(rest) = token.strip_prefix('>') {
                ("gt", &mut bounds.gt, rest)
            } else if let Some(rest) = token.strip_prefix('<') {
                ("lt", &mut bounds.lt, rest)
            } else {
                return Err(
                    ParseError::range(text, "token must start with one of >=, >, <=, <").into(),
                );
            };
            if rest.is_empty() {
                return Err(ParseError::range(text, "operator with no version").into());
            }
            let version = parse_version(family, rest)?;
            if slot.replace(version).is_some() {
                return Err(AmbiguityError::ConflictingBounds {
                    first: name,
                    second: name,
                }
                .into());
            }
        }

        Ok(Self::new(family, bounds)?)
    }

    /// Family this range applies to
    pub fn family(&self) -> PackageFamily {
        self.family
    }

    /// True iff at least one candidate lies inside the range.
    ///
    /// A dependency declaration may list several observed versions of one
    /// package; the vulnerability is present when any of them falls in
    /// range. Every candidate must belong to the range's family: a
    /// mismatch is an error even when another candidate already matched,
    /// never a silent skip.
    pub fn detect_matched(&self, candidates: &[Version]) -> Result<bool, ComparisonError> {
        for candidate in candidates {
            if candidate.family() != self.family {
                return Err(ComparisonError {
                    left: self.family,
                    right: candidate.family(),
                });
            }
        }

        for candidate in candidates {
            let matched = self.contains(candidate)?;
            trace!("candidate {} vs range {}: {}", candidate, self, matched);
            if matched {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether one same-family candidate satisfies every configured bound.
    fn contains(&self, candidate: &Version) -> Result<bool, ComparisonError> {
        match &self.kind {
            RangeKind::Exact(version) => Ok(candidate.compare(version)? == Ordering::Equal),
            RangeKind::Bounds { lower, upper } => {
                if let Some((op, version)) = lower {
                    let ord = candidate.compare(version)?;
                    let inside = match op {
                        LowerOp::Ge => ord != Ordering::Less,
                        LowerOp::Gt => ord == Ordering::Greater,
                    };
                    if !inside {
                        return Ok(false);
                    }
                }
                if let Some((op, version)) = upper {
                    let ord = candidate.compare(version)?;
                    let inside = match op {
                        UpperOp::Le => ord != Ordering::Greater,
                        UpperOp::Lt => ord == Ordering::Less,
                    };
                    if !inside {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}

impl fmt::Display for VulnerableRange {
    /// Canonical textual form. Re-parses to an equivalent range, except for
    /// the unbounded range, which prints as `*` for logging only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RangeKind::Exact(version) => write!(f, "={}", version),
            RangeKind::Bounds {
                lower: None,
                upper: None,
            } => f.write_str("*"),
            RangeKind::Bounds { lower, upper } => {
                if let Some((op, version)) = lower {
                    write!(f, "{}{}", op.as_str(), version)?;
                    if upper.is_some() {
                        f.write_str(" ")?;
                    }
                }
                if let Some((op, version)) = upper {
                    write!(f, "{}{}", op.as_str(), version)?;
                }
                Ok(())
            }
        }
    }
}
