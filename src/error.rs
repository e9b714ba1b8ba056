//! Error types for version parsing, range construction and matching
//!
//! All errors are local and synchronous: they signal malformed input and are
//! never retryable. A caller rejects, logs or skips the offending record.

use thiserror::Error;

use crate::types::PackageFamily;

/// A raw string violated a version or range grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The raw string does not parse under the family's version grammar
    #[error("invalid {family} version {raw:?}: {reason}")]
    Version {
        family: PackageFamily,
        raw: String,
        reason: String,
    },

    /// The textual range expression does not follow the range grammar
    #[error("invalid range expression {raw:?}: {reason}")]
    Range { raw: String, reason: String },
}

impl ParseError {
    pub(crate) fn version(family: PackageFamily, raw: &str, reason: impl Into<String>) -> Self {
        ParseError::Version {
            family,
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn range(raw: &str, reason: impl Into<String>) -> Self {
        ParseError::Range {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

/// Two versions of different families were compared
///
/// Raised at the comparison call itself; the engine never assumes the caller
/// has kept families apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot compare {left} version with {right} version")]
pub struct ComparisonError {
    pub left: PackageFamily,
    pub right: PackageFamily,
}

/// A range configuration is self-contradictory
///
/// Raised when the range is built, so malformed advisory data is caught
/// before any matching runs against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmbiguityError {
    /// An exact bound was combined with a relational bound
    #[error("exact bound cannot be combined with {op}")]
    ExactWithBound { op: &'static str },

    /// Two bounds on the same side of the range
    #[error("bounds {first} and {second} cover the same side of the range")]
    ConflictingBounds {
        first: &'static str,
        second: &'static str,
    },

    /// A bound version belongs to a different family than the range
    #[error("range declared for {declared} but a bound version is {found}")]
    FamilyMismatch {
        declared: PackageFamily,
        found: PackageFamily,
    },
}

/// Errors from textual range construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Ambiguity(#[from] AmbiguityError),
}
