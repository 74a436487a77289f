//! OS aliasing and host detection
//!
//! The remote tree uses directory names like `mac_x64`; users type `macos`.
//! Unmapped remote names pass through raw in both directions.

use crate::error::{QtdlError, QtdlResult};

const ALIASES: &[(&str, &str)] = &[
    ("linux", "linux_x64"),
    ("macos", "mac_x64"),
    ("windows", "windows_x86"),
];

/// Translate a user-facing OS name to the remote directory name.
pub fn remote_name(alias: &str) -> &str {
    ALIASES
        .iter()
        .find(|(a, _)| *a == alias)
        .map_or(alias, |(_, remote)| remote)
}

/// Translate a remote directory name to the user-facing OS name.
pub fn alias_name(remote: &str) -> &str {
    ALIASES
        .iter()
        .find(|(_, r)| *r == remote)
        .map_or(remote, |(alias, _)| alias)
}

/// Detect the host OS alias for the `auto` constraint.
pub fn host_alias() -> QtdlResult<&'static str> {
    if cfg!(target_os = "linux") {
        Ok("linux")
    } else if cfg!(target_os = "macos") {
        Ok("macos")
    } else if cfg!(target_os = "windows") {
        Ok("windows")
    } else {
        Err(QtdlError::UnsupportedHost(std::env::consts::OS.to_string()))
    }
}
