//! Qt version numbers and selection expressions
//!
//! Remote directory names embed versions as compact digit blobs
//! (`qt5_5152` is 5.15.2). The decode rule takes the first character as
//! major, the last as patch and everything between as minor. The rule is
//! ambiguous for multi-digit majors/patches; the remote generates names
//! under the same assumption, so it must not be "fixed" here.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use semver::VersionReq;
use serde::{Serialize, Serializer};

use crate::error::{QtdlError, QtdlResult};

/// A Qt version triple with total ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QtVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl QtVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Decode a compact directory-name blob (`5152` -> 5.15.2).
    ///
    /// Blobs of length <= 1 default patch to 0. Returns `None` for
    /// non-digit input.
    pub fn from_compact(blob: &str) -> Option<Self> {
        if blob.is_empty() || !blob.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if blob.len() == 1 {
            return Some(Self::new(blob.parse().ok()?, 0, 0));
        }
        let major = blob[..1].parse().ok()?;
        let patch = blob[blob.len() - 1..].parse().ok()?;
        let mid = &blob[1..blob.len() - 1];
        let minor = if mid.is_empty() { 0 } else { mid.parse().ok()? };
        Some(Self::new(major, minor, patch))
    }

    /// Re-encode as a compact blob, the inverse of [`Self::from_compact`]
    /// for blobs of length >= 2 (a zero minor is omitted).
    pub fn to_compact(&self) -> String {
        if self.minor == 0 {
            format!("{}{}", self.major, self.patch)
        } else {
            format!("{}{}{}", self.major, self.minor, self.patch)
        }
    }

    fn to_semver(self) -> semver::Version {
        semver::Version::new(self.major, self.minor, self.patch)
    }
}

impl fmt::Display for QtVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for QtVersion {
    type Err = QtdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QtdlError::InvalidVersionSpec {
            expr: s.to_string(),
            reason: "expected major.minor.patch".to_string(),
        };
        let mut parts = s.split('.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let minor = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let patch = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(major, minor, patch))
    }
}

// Serialized as a string so versions can key JSON maps.
impl Serialize for QtVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A version selection expression
///
/// Accepted forms: the literal `latest`, an exact triple (`5.15.2`), a
/// partial prefix (`5`, `5.15`), or a comparator range (`>=5.9,<5.10`).
#[derive(Debug, Clone)]
pub enum VersionSpec {
    /// Match anything, prefer the maximum
    Latest,
    /// Exact triple match
    Exact(QtVersion),
    /// Major or major.minor prefix match
    Prefix { major: u64, minor: Option<u64> },
    /// Semver comparator range
    Range(VersionReq),
}

impl VersionSpec {
    /// Parse a selection expression.
    pub fn parse(expr: &str) -> QtdlResult<Self> {
        let expr = expr.trim();
        if expr.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        if expr.contains(['<', '>', '=', '^', '~', '*', ',']) {
            let req = VersionReq::parse(expr).map_err(|e| QtdlError::InvalidVersionSpec {
                expr: expr.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Self::Range(req));
        }

        let parts: Vec<u64> = expr
            .split('.')
            .map(|p| {
                p.parse().map_err(|_| QtdlError::InvalidVersionSpec {
                    expr: expr.to_string(),
                    reason: format!("'{p}' is not a number"),
                })
            })
            .collect::<QtdlResult<_>>()?;

        match parts.as_slice() {
            [major] => Ok(Self::Prefix {
                major: *major,
                minor: None,
            }),
            [major, minor] => Ok(Self::Prefix {
                major: *major,
                minor: Some(*minor),
            }),
            [major, minor, patch] => Ok(Self::Exact(QtVersion::new(*major, *minor, *patch))),
            _ => Err(QtdlError::InvalidVersionSpec {
                expr: expr.to_string(),
                reason: "too many components".to_string(),
            }),
        }
    }

    /// Whether a single version satisfies this expression.
    pub fn matches(&self, version: QtVersion) -> bool {
        match self {
            Self::Latest => true,
            Self::Exact(exact) => *exact == version,
            Self::Prefix { major, minor } => {
                version.major == *major && minor.map_or(true, |m| version.minor == m)
            }
            Self::Range(req) => req.matches(&version.to_semver()),
        }
    }

    /// Select the maximum version satisfying this expression.
    pub fn resolve(&self, available: &BTreeSet<QtVersion>) -> Option<QtVersion> {
        available.iter().rev().copied().find(|v| self.matches(*v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(specs: &[(u64, u64, u64)]) -> BTreeSet<QtVersion> {
        specs.iter().map(|&(a, b, c)| QtVersion::new(a, b, c)).collect()
    }

    fn sample() -> BTreeSet<QtVersion> {
        versions(&[(5, 12, 10), (5, 15, 0), (5, 15, 2), (5, 9, 9)])
    }

    #[test]
    fn compact_decode() {
        assert_eq!(QtVersion::from_compact("5152"), Some(QtVersion::new(5, 15, 2)));
        assert_eq!(QtVersion::from_compact("59"), Some(QtVersion::new(5, 0, 9)));
        assert_eq!(QtVersion::from_compact("6"), Some(QtVersion::new(6, 0, 0)));
        assert_eq!(QtVersion::from_compact(""), None);
        assert_eq!(QtVersion::from_compact("51a2"), None);
    }

    #[test]
    fn compact_round_trips_for_len_ge_2() {
        for blob in ["5152", "515", "510", "59", "5129", "512"] {
            let v = QtVersion::from_compact(blob).unwrap();
            assert_eq!(v.to_compact(), blob, "blob {blob} decoded to {v}");
        }
    }

    #[test]
    fn compact_len_1_defaults_patch() {
        let v = QtVersion::from_compact("6").unwrap();
        assert_eq!(v, QtVersion::new(6, 0, 0));
    }

    #[test]
    fn display_parse_round_trip() {
        let v: QtVersion = "5.15.2".parse().unwrap();
        assert_eq!(v, QtVersion::new(5, 15, 2));
        assert_eq!(v.to_string(), "5.15.2");
        assert!("5.15".parse::<QtVersion>().is_err());
        assert!("5.15.2.1".parse::<QtVersion>().is_err());
    }

    #[test]
    fn ordering() {
        assert!(QtVersion::new(5, 9, 9) < QtVersion::new(5, 12, 10));
        assert!(QtVersion::new(5, 15, 0) < QtVersion::new(5, 15, 2));
    }

    #[test]
    fn spec_prefix_selects_maximum() {
        let spec = VersionSpec::parse("5.15").unwrap();
        assert_eq!(spec.resolve(&sample()), Some(QtVersion::new(5, 15, 2)));
    }

    #[test]
    fn spec_latest_selects_maximum() {
        let spec = VersionSpec::parse("latest").unwrap();
        assert_eq!(spec.resolve(&sample()), Some(QtVersion::new(5, 15, 2)));
    }

    #[test]
    fn spec_range() {
        let spec = VersionSpec::parse(">=5.9,<5.10").unwrap();
        assert_eq!(spec.resolve(&sample()), Some(QtVersion::new(5, 9, 9)));
    }

    #[test]
    fn spec_exact_miss() {
        let spec = VersionSpec::parse("6.0.0").unwrap();
        assert_eq!(spec.resolve(&sample()), None);
    }

    #[test]
    fn spec_major_prefix() {
        let spec = VersionSpec::parse("5").unwrap();
        assert_eq!(spec.resolve(&sample()), Some(QtVersion::new(5, 15, 2)));
    }

    #[test]
    fn spec_invalid() {
        assert!(VersionSpec::parse("banana").is_err());
        assert!(VersionSpec::parse("5.x.2").is_err());
    }
}
