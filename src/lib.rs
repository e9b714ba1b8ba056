//! Version and vulnerable-range matching engine
//!
//! Decides whether an installed package version is affected by a
//! vulnerability's declared version range. Every dependency × vulnerability
//! pairing the platform evaluates goes through this crate, so parsing is
//! strict: malformed versions and contradictory ranges are rejected at
//! construction instead of surfacing later as a silently wrong match.
//!
//! # Architecture
//!
//! ```text
//! (family, version text) ──▶ parse_version ─────────────────▶ Version
//! (family, range text)   ──▶ VulnerableRange::from_string ──▶ VulnerableRange
//!
//! VulnerableRange::detect_matched(&[Version]) ──▶ bool
//! ```
//!
//! # Modules
//!
//! - [`types`]: the [`PackageFamily`] discriminator
//! - [`version`]: per-family version value types and the parsing factory
//! - [`range`]: the [`VulnerableRange`] predicate
//! - [`error`]: parse, ambiguity and comparison errors
//!
//! # Example
//!
//! ```
//! use vulnmatch::{PackageFamily, VulnerableRange, parse_version};
//!
//! let range = VulnerableRange::from_string(PackageFamily::Debian, ">=2.0.0 <2.3.4")?;
//! let installed = parse_version(PackageFamily::Debian, "2.3.4~dfsg")?;
//! assert!(range.detect_matched(&[installed])?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The engine is pure and synchronous: no I/O, no shared mutable state.
//! Once constructed, versions and ranges are immutable and safe to read
//! from any number of threads.

pub mod error;
pub mod range;
pub mod types;
pub mod version;

pub use error::{AmbiguityError, ComparisonError, ParseError, RangeError};
pub use range::{RangeBounds, VulnerableRange};
pub use types::PackageFamily;
pub use version::{Version, parse_version};
