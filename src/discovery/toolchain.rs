//! Toolchain derivation from package names
//!
//! A version directory lists package names like `qt.qt5.5152.gcc_64` or
//! `qt.qt5.5152.qtcharts.clang_64`. The toolchain token sits in the fourth
//! dot-segment; module packages (`qt*`) and `debug*` variants are skipped,
//! and the trailing `_`-architecture suffix is stripped.

use super::tree::ToolchainSet;

/// Derive the distinct toolchain identifiers from a listing of package
/// names. Order-independent, deduplicated.
pub fn extract_toolchains<'a, I>(names: I) -> ToolchainSet
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = ToolchainSet::new();
    for name in names {
        let Some(candidate) = name.split('.').nth(3) else {
            continue;
        };
        if candidate.starts_with("qt") || candidate.starts_with("debug") {
            continue;
        }
        let base = candidate
            .rsplit_once('_')
            .map_or(candidate, |(base, _arch)| base);
        if !base.is_empty() {
            out.insert(base.to_string());
        }
    }
    out
}
