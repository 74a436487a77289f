//! Typed discovery result tree
//!
//! Nested ordered mappings OS -> target -> version -> toolchain set.
//! `None` marks a node the resolver never expanded, distinct from
//! `Some(empty)` which means expanded-but-empty.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::version::QtVersion;

/// One level of the discovery hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Os,
    Target,
    Version,
    Toolchain,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Os => "OS",
            Self::Target => "target",
            Self::Version => "version",
            Self::Toolchain => "toolchain",
        };
        f.write_str(name)
    }
}

/// Toolchain identifiers discovered for one version
pub type ToolchainSet = BTreeSet<String>;

/// Toolchains of a version, `None` until expanded
pub type VersionEntry = Option<ToolchainSet>;

/// Versions of a target, `None` until expanded
pub type TargetEntry = Option<BTreeMap<QtVersion, VersionEntry>>;

/// Targets of an OS, `None` until expanded
pub type OsEntry = Option<BTreeMap<String, TargetEntry>>;

/// Discovery result keyed by user-facing OS name
///
/// Serializes unexpanded nodes as `null`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DiscoveryTree {
    pub oses: BTreeMap<String, OsEntry>,
}
