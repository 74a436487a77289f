//! Updates.xml package metadata
//!
//! Every version directory carries an `Updates.xml` whose `PackageUpdate`
//! entries name the installable packages (`qt.qt5.5152.gcc_64`, module
//! variants `qt.qt5.5152.qtcharts.gcc_64`) and list their downloadable
//! archives.

use roxmltree::{Document, Node};

use crate::error::{QtdlError, QtdlResult};

/// One `PackageUpdate` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUpdate {
    pub name: String,
    /// Full build version string (`5.15.2-0-202011130602`), prefixed to
    /// archive file names on the server
    pub version: String,
    pub archives: Vec<String>,
}

impl PackageUpdate {
    /// Remote file name of one of this package's archives.
    pub fn archive_file(&self, archive: &str) -> String {
        format!("{}{}", self.version, archive)
    }
}

/// Parse an Updates.xml document into its package entries.
///
/// Entries missing a name or version are skipped; an unparseable document
/// is a parse error against `url`.
pub fn parse_updates(xml: &str, url: &str) -> QtdlResult<Vec<PackageUpdate>> {
    let doc =
        Document::parse(xml).map_err(|e| QtdlError::parse("Updates.xml", url, e.to_string()))?;

    let mut packages = Vec::new();
    for node in doc
        .descendants()
        .filter(|n| n.has_tag_name("PackageUpdate"))
    {
        let Some(name) = child_text(&node, "Name") else {
            continue;
        };
        let Some(version) = child_text(&node, "Version") else {
            continue;
        };
        let archives = child_text(&node, "DownloadableArchives")
            .map(|list| {
                list.split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        packages.push(PackageUpdate {
            name,
            version,
            archives,
        });
    }
    Ok(packages)
}

fn child_text(node: &Node, name: &str) -> Option<String> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Pick the packages to install: the base toolchain package plus one per
/// requested module. A missing entry is an error naming the package.
///
/// Discovery presents toolchains with the architecture suffix stripped
/// (`gcc`), while package names keep it (`qt.qt5.5152.gcc_64`); matching
/// accepts either form.
pub fn select_packages(
    packages: &[PackageUpdate],
    compact: &str,
    toolchain: &str,
    modules: &[String],
) -> QtdlResult<Vec<PackageUpdate>> {
    let mut selected = vec![find_package(packages, compact, None, toolchain)?];
    for module in modules {
        selected.push(find_package(packages, compact, Some(module), toolchain)?);
    }
    Ok(selected)
}

fn find_package(
    packages: &[PackageUpdate],
    compact: &str,
    module: Option<&str>,
    toolchain: &str,
) -> QtdlResult<PackageUpdate> {
    packages
        .iter()
        .find(|p| {
            let parts: Vec<&str> = p.name.split('.').collect();
            if parts.first() != Some(&"qt") {
                return false;
            }
            let Some(idx) = parts.iter().position(|s| *s == compact) else {
                return false;
            };
            match (module, &parts[idx + 1..]) {
                (None, [tc]) => matches_toolchain(tc, toolchain),
                (Some(m), [seg, tc]) => *seg == m && matches_toolchain(tc, toolchain),
                _ => false,
            }
        })
        .cloned()
        .ok_or_else(|| QtdlError::PackageNotFound {
            name: match module {
                None => format!("qt.qt5.{compact}.{toolchain}"),
                Some(m) => format!("qt.qt5.{compact}.{m}.{toolchain}"),
            },
        })
}

fn matches_toolchain(segment: &str, toolchain: &str) -> bool {
    segment == toolchain
        || segment
            .rsplit_once('_')
            .is_some_and(|(base, _arch)| base == toolchain)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<Updates>
 <ApplicationName>{AnyApplication}</ApplicationName>
 <PackageUpdate>
  <Name>qt.qt5.5152.gcc_64</Name>
  <DisplayName>Desktop gcc 64-bit</DisplayName>
  <Version>5.15.2-0-202011130602</Version>
  <DownloadableArchives>qtbase-Linux-RHEL_7_6-GCC-Linux-RHEL_7_6-X86_64.7z, qtsvg-Linux-RHEL_7_6-GCC-Linux-RHEL_7_6-X86_64.7z</DownloadableArchives>
 </PackageUpdate>
 <PackageUpdate>
  <Name>qt.qt5.5152.qtcharts.gcc_64</Name>
  <Version>5.15.2-0-202011130602</Version>
  <DownloadableArchives>qtcharts-Linux-RHEL_7_6-GCC-Linux-RHEL_7_6-X86_64.7z</DownloadableArchives>
 </PackageUpdate>
 <PackageUpdate>
  <Name>qt.qt5.5152.debug_info</Name>
  <Version>5.15.2-0-202011130602</Version>
 </PackageUpdate>
</Updates>"#;

    #[test]
    fn parses_package_entries() {
        let packages = parse_updates(FIXTURE, "http://r/Updates.xml").unwrap();
        assert_eq!(packages.len(), 3);
        assert_eq!(packages[0].name, "qt.qt5.5152.gcc_64");
        assert_eq!(packages[0].archives.len(), 2);
        assert!(packages[2].archives.is_empty());
    }

    #[test]
    fn archive_file_prefixes_build_version() {
        let packages = parse_updates(FIXTURE, "http://r/Updates.xml").unwrap();
        assert_eq!(
            packages[1].archive_file(&packages[1].archives[0]),
            "5.15.2-0-202011130602qtcharts-Linux-RHEL_7_6-GCC-Linux-RHEL_7_6-X86_64.7z"
        );
    }

    #[test]
    fn malformed_xml_is_parse_error() {
        let err = parse_updates("<Updates><PackageUpdate>", "http://r/Updates.xml").unwrap_err();
        assert!(matches!(err, QtdlError::Parse { .. }));
    }

    #[test]
    fn selects_base_and_module_packages() {
        let packages = parse_updates(FIXTURE, "http://r/Updates.xml").unwrap();
        let selected =
            select_packages(&packages, "5152", "gcc", &["qtcharts".to_string()]).unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].name, "qt.qt5.5152.gcc_64");
        assert_eq!(selected[1].name, "qt.qt5.5152.qtcharts.gcc_64");
    }

    #[test]
    fn full_toolchain_name_also_matches() {
        let packages = parse_updates(FIXTURE, "http://r/Updates.xml").unwrap();
        let selected = select_packages(&packages, "5152", "gcc_64", &[]).unwrap();
        assert_eq!(selected[0].name, "qt.qt5.5152.gcc_64");
    }

    #[test]
    fn missing_module_is_an_error() {
        let packages = parse_updates(FIXTURE, "http://r/Updates.xml").unwrap();
        let err =
            select_packages(&packages, "5152", "gcc", &["qtquantum".to_string()]).unwrap_err();
        match err {
            QtdlError::PackageNotFound { name } => {
                assert_eq!(name, "qt.qt5.5152.qtquantum.gcc");
            }
            other => panic!("expected PackageNotFound, got {other:?}"),
        }
    }
}
