//! Text rendering of discovery results

use std::fmt::Write;

use crate::discovery::{DiscoveryTree, Level};

/// Render the keys of the level discovery stopped at as one line.
pub fn render_level(tree: &DiscoveryTree, level: Level) -> String {
    match level {
        Level::Os => format!(
            "Available operating systems: {}",
            join(tree.oses.keys().map(String::as_str))
        ),
        Level::Target => {
            let Some((os, Some(targets))) = tree.oses.iter().next() else {
                return String::new();
            };
            format!(
                "Available targets for {os}: {}",
                join(targets.keys().map(String::as_str))
            )
        }
        Level::Version => {
            let Some((os, Some(targets))) = tree.oses.iter().next() else {
                return String::new();
            };
            let Some((target, Some(versions))) = targets.iter().next() else {
                return String::new();
            };
            let rendered: Vec<String> = versions.keys().map(|v| v.to_string()).collect();
            format!(
                "Available versions for {os} {target}: {}",
                rendered.join(", ")
            )
        }
        Level::Toolchain => {
            let Some((os, Some(targets))) = tree.oses.iter().next() else {
                return String::new();
            };
            let Some((target, Some(versions))) = targets.iter().next() else {
                return String::new();
            };
            let Some((version, Some(toolchains))) = versions.iter().next() else {
                return String::new();
            };
            format!(
                "Toolchains for {os} {target} {version}: {}",
                join(toolchains.iter().map(String::as_str))
            )
        }
    }
}

/// Render the full tree as indented text, one version per line with its
/// toolchains.
pub fn render_tree(tree: &DiscoveryTree) -> String {
    let mut out = String::new();
    for (os, targets) in &tree.oses {
        let _ = writeln!(out, "{os}:");
        let Some(targets) = targets else {
            let _ = writeln!(out, "  (not expanded)");
            continue;
        };
        for (target, versions) in targets {
            let _ = writeln!(out, "  {target}:");
            let Some(versions) = versions else {
                let _ = writeln!(out, "    (not expanded)");
                continue;
            };
            for (version, toolchains) in versions {
                let line = match toolchains {
                    Some(set) if set.is_empty() => "(none)".to_string(),
                    Some(set) => join(set.iter().map(String::as_str)),
                    None => "(not expanded)".to_string(),
                };
                let _ = writeln!(out, "    {version}: {line}");
            }
        }
    }
    out
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::QtVersion;
    use std::collections::{BTreeMap, BTreeSet};

    fn sample_tree() -> DiscoveryTree {
        let mut toolchains = BTreeSet::new();
        toolchains.insert("clang".to_string());
        toolchains.insert("gcc".to_string());

        let mut versions = BTreeMap::new();
        versions.insert(QtVersion::new(5, 15, 2), Some(toolchains));
        versions.insert(QtVersion::new(5, 9, 9), None);

        let mut targets = BTreeMap::new();
        targets.insert("desktop".to_string(), Some(versions));
        targets.insert("android".to_string(), None);

        let mut tree = DiscoveryTree::default();
        tree.oses.insert("macos".to_string(), Some(targets));
        tree
    }

    #[test]
    fn renders_os_level() {
        let mut tree = DiscoveryTree::default();
        tree.oses.insert("linux".to_string(), None);
        tree.oses.insert("macos".to_string(), None);
        assert_eq!(
            render_level(&tree, Level::Os),
            "Available operating systems: linux, macos"
        );
    }

    #[test]
    fn renders_target_level() {
        let tree = sample_tree();
        assert_eq!(
            render_level(&tree, Level::Target),
            "Available targets for macos: android, desktop"
        );
    }

    #[test]
    fn renders_version_level() {
        let mut tree = sample_tree();
        // narrow to the expanded target, as a version-level result would be
        tree.oses
            .get_mut("macos")
            .unwrap()
            .as_mut()
            .unwrap()
            .remove("android");
        assert_eq!(
            render_level(&tree, Level::Version),
            "Available versions for macos desktop: 5.9.9, 5.15.2"
        );
    }

    #[test]
    fn renders_full_tree() {
        let text = render_tree(&sample_tree());
        assert!(text.starts_with("macos:\n"));
        assert!(text.contains("  android:\n    (not expanded)\n"));
        assert!(text.contains("    5.15.2: clang, gcc\n"));
        assert!(text.contains("    5.9.9: (not expanded)\n"));
    }
}
