//! Hierarchical discovery over the remote directory tree
//!
//! Walks OS -> target -> version -> toolchain, committing to the single
//! matching child at every named level (bounding fetches to the hierarchy
//! depth) and enumerating at `discover` levels. Without the expand-all
//! flag only the first unconstrained level is enumerated; with it, every
//! unconstrained level and all descendants are expanded recursively.
//!
//! Unknown user values surface only once the walk reaches their level:
//! validity cannot be determined without the walk, so membership is
//! checked against the fetched sibling listing and reported as
//! [`QtdlError::NotFound`] with the valid alternatives.

pub mod os;
mod toolchain;
mod tree;

pub use toolchain::extract_toolchains;
pub use tree::{DiscoveryTree, Level, OsEntry, TargetEntry, ToolchainSet, VersionEntry};

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::error::{QtdlError, QtdlResult};
use crate::remote::{join_url, DirectoryLister, Fetch};
use crate::version::{QtVersion, VersionSpec};

/// OS-level constraint: `auto` additionally detects the host platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsSelect {
    Auto,
    Discover,
    Named(String),
}

/// Constraint for the target, version and toolchain levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Select {
    Discover,
    Named(String),
}

impl Select {
    fn parse(raw: &str) -> Self {
        if raw == "discover" {
            Self::Discover
        } else {
            Self::Named(raw.to_string())
        }
    }
}

/// Immutable per-run constraints, one per hierarchy level
#[derive(Debug, Clone)]
pub struct Constraints {
    pub os: OsSelect,
    pub target: Select,
    pub version: Select,
    pub toolchain: Select,
}

impl Constraints {
    /// Build constraints from the raw CLI positionals.
    pub fn parse(os: &str, target: &str, version: &str, toolchain: &str) -> Self {
        let os = match os {
            "discover" => OsSelect::Discover,
            "auto" => OsSelect::Auto,
            named => OsSelect::Named(named.to_string()),
        };
        Self {
            os,
            target: Select::parse(target),
            version: Select::parse(version),
            toolchain: Select::parse(toolchain),
        }
    }

    /// First level left in discover mode, if any.
    pub fn first_discover(&self) -> Option<Level> {
        if self.os == OsSelect::Discover {
            Some(Level::Os)
        } else if self.target == Select::Discover {
            Some(Level::Target)
        } else if self.version == Select::Discover {
            Some(Level::Version)
        } else if self.toolchain == Select::Discover {
            Some(Level::Toolchain)
        } else {
            None
        }
    }
}

/// A fully resolved (OS, target, version, toolchain) tuple
#[derive(Debug, Clone)]
pub struct Selection {
    pub os_alias: String,
    pub os_remote: String,
    pub target: String,
    pub version: QtVersion,
    /// Raw remote directory name (`qt5_5152`), kept because the compact
    /// blob codec is ambiguous
    pub version_dir: String,
    pub toolchain: String,
}

/// Outcome of a discovery run
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Discovery stopped at an enumerated level
    Partial(Level),
    /// All four levels resolved to concrete values
    Resolved(Selection),
}

/// Result of a discovery run: the (possibly partial) tree plus outcome
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tree: DiscoveryTree,
    pub outcome: Outcome,
}

/// The hierarchical resolver
///
/// Owns the directory lister (and with it the per-URL listing cache, which
/// lives exactly as long as the resolver).
pub struct Resolver<F: Fetch> {
    lister: DirectoryLister<F>,
    base_url: String,
}

impl<F: Fetch> Resolver<F> {
    pub fn new(fetcher: F, base_url: impl Into<String>) -> Self {
        Self {
            lister: DirectoryLister::new(fetcher),
            base_url: base_url.into(),
        }
    }

    /// Fetch a text resource through the resolver's fetch seam.
    pub fn fetch_text(&self, url: &str) -> QtdlResult<String> {
        self.lister.fetch_text(url)
    }

    /// Run one discovery pass under the given constraints.
    pub fn discover(&mut self, constraints: &Constraints, expand_all: bool) -> QtdlResult<Resolution> {
        let os_dirs = self.lister.list(&self.base_url)?;
        let mut tree = DiscoveryTree::default();

        let (os_remote, os_input) = match &constraints.os {
            OsSelect::Discover => {
                for dir in &os_dirs {
                    let entry = if expand_all {
                        Some(self.targets_level(dir, constraints, true, false, &mut None)?)
                    } else {
                        None
                    };
                    tree.oses.insert(os::alias_name(dir).to_string(), entry);
                }
                return Ok(Resolution {
                    tree,
                    outcome: Outcome::Partial(Level::Os),
                });
            }
            OsSelect::Auto => {
                let alias = os::host_alias()?;
                debug!(os = alias, "detected host OS");
                (os::remote_name(alias).to_string(), alias.to_string())
            }
            OsSelect::Named(name) => (os::remote_name(name).to_string(), name.clone()),
        };

        if !os_dirs.iter().any(|d| *d == os_remote) {
            return Err(QtdlError::NotFound {
                level: Level::Os,
                value: os_input,
                alternatives: sorted(os_dirs.iter().map(|d| os::alias_name(d).to_string())),
            });
        }

        let mut resolved_version = None;
        let targets = self.targets_level(&os_remote, constraints, expand_all, true, &mut resolved_version)?;
        let os_alias = os::alias_name(&os_remote).to_string();
        tree.oses.insert(os_alias.clone(), Some(targets));

        match constraints.first_discover() {
            Some(level) => Ok(Resolution {
                tree,
                outcome: Outcome::Partial(level),
            }),
            None => {
                let (Select::Named(target), Select::Named(toolchain)) =
                    (&constraints.target, &constraints.toolchain)
                else {
                    return Err(QtdlError::Internal(
                        "fully-constrained run without named levels".to_string(),
                    ));
                };
                let (version, version_dir) = resolved_version.ok_or_else(|| {
                    QtdlError::Internal("version not resolved on named path".to_string())
                })?;
                let selection = Selection {
                    os_alias,
                    os_remote,
                    target: target.clone(),
                    version,
                    version_dir,
                    toolchain: toolchain.clone(),
                };
                info!(
                    os = %selection.os_alias,
                    target = %selection.target,
                    version = %selection.version,
                    toolchain = %selection.toolchain,
                    "resolved selection"
                );
                Ok(Resolution {
                    tree,
                    outcome: Outcome::Resolved(selection),
                })
            }
        }
    }

    /// Expand the target level under one OS directory.
    ///
    /// `single_path` is true only on the branch the user named all the way
    /// down to here; membership failures on enumerated sibling branches
    /// narrow silently instead of erroring.
    fn targets_level(
        &mut self,
        os_remote: &str,
        constraints: &Constraints,
        expand_all: bool,
        single_path: bool,
        resolved: &mut Option<(QtVersion, String)>,
    ) -> QtdlResult<BTreeMap<String, TargetEntry>> {
        let url = join_url(&self.base_url, os_remote);
        let targets = self.lister.list(&url)?;
        let mut map = BTreeMap::new();

        match &constraints.target {
            Select::Discover => {
                for target in &targets {
                    let entry = if expand_all {
                        Some(self.versions_level(os_remote, target, constraints, true, false, resolved)?)
                    } else {
                        None
                    };
                    map.insert(target.clone(), entry);
                }
            }
            Select::Named(target) => {
                if !targets.iter().any(|t| t == target) {
                    if single_path {
                        return Err(QtdlError::NotFound {
                            level: Level::Target,
                            value: target.clone(),
                            alternatives: sorted(targets.into_iter()),
                        });
                    }
                    return Ok(map);
                }
                let entry =
                    self.versions_level(os_remote, target, constraints, expand_all, single_path, resolved)?;
                map.insert(target.clone(), Some(entry));
            }
        }
        Ok(map)
    }

    /// Expand the version level under one (OS, target) pair.
    fn versions_level(
        &mut self,
        os_remote: &str,
        target: &str,
        constraints: &Constraints,
        expand_all: bool,
        single_path: bool,
        resolved: &mut Option<(QtVersion, String)>,
    ) -> QtdlResult<BTreeMap<QtVersion, VersionEntry>> {
        let url = join_url(&join_url(&self.base_url, os_remote), target);
        let entries = self.lister.list(&url)?;

        // Only qt5_<digits> directories carry versions; wasm variants and
        // tools directories are ignored.
        let mut version_dirs: BTreeMap<QtVersion, String> = BTreeMap::new();
        for entry in &entries {
            if let Some(version) = entry
                .strip_prefix("qt5_")
                .and_then(QtVersion::from_compact)
            {
                version_dirs.insert(version, entry.clone());
            }
        }

        let mut map = BTreeMap::new();
        match &constraints.version {
            Select::Discover => {
                for (version, dir) in &version_dirs {
                    let entry = if expand_all {
                        let set = self.toolchains_level(os_remote, target, dir, &entries)?;
                        Some(restrict_toolchains(set, &constraints.toolchain))
                    } else {
                        None
                    };
                    map.insert(*version, entry);
                }
            }
            Select::Named(expr) => {
                let spec = VersionSpec::parse(expr)?;
                let available: BTreeSet<QtVersion> = version_dirs.keys().copied().collect();
                let Some(version) = spec.resolve(&available) else {
                    if single_path {
                        return Err(QtdlError::NotFound {
                            level: Level::Version,
                            value: expr.clone(),
                            alternatives: available.iter().map(QtVersion::to_string).collect(),
                        });
                    }
                    return Ok(map);
                };
                let dir = version_dirs[&version].clone();
                let set = self.toolchains_level(os_remote, target, &dir, &entries)?;
                if let Select::Named(toolchain) = &constraints.toolchain {
                    if single_path && !set.contains(toolchain) {
                        return Err(QtdlError::NotFound {
                            level: Level::Toolchain,
                            value: toolchain.clone(),
                            alternatives: set.into_iter().collect(),
                        });
                    }
                }
                *resolved = Some((version, dir));
                map.insert(version, Some(restrict_toolchains(set, &constraints.toolchain)));
            }
        }
        Ok(map)
    }

    /// Derive the toolchain set of one version directory.
    ///
    /// Probes the parent listing before descending: a version directory
    /// absent from its parent yields an empty set without a fetch.
    fn toolchains_level(
        &mut self,
        os_remote: &str,
        target: &str,
        version_dir: &str,
        parent_entries: &[String],
    ) -> QtdlResult<ToolchainSet> {
        if !parent_entries.iter().any(|e| e == version_dir) {
            return Ok(ToolchainSet::new());
        }
        let url = join_url(
            &join_url(&join_url(&self.base_url, os_remote), target),
            version_dir,
        );
        let names = self.lister.list(&url)?;
        Ok(extract_toolchains(names.iter().map(String::as_str)))
    }
}

/// Under an enumerated branch a named toolchain narrows the set instead of
/// erroring; the full set is kept on discover.
fn restrict_toolchains(set: ToolchainSet, constraint: &Select) -> ToolchainSet {
    match constraint {
        Select::Discover => set,
        Select::Named(toolchain) => set.into_iter().filter(|t| t == toolchain).collect(),
    }
}

fn sorted(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut values: Vec<String> = values.collect();
    values.sort();
    values
}
