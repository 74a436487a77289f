//! Configuration schema for qtdl
//!
//! Configuration is stored at `~/.config/qtdl/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote repository settings
    pub remote: RemoteConfig,

    /// Download and extraction settings
    pub install: InstallConfig,
}

/// Remote repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Repository root listing the per-OS directories
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://download.qt.io/online/qtsdkrepository".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Download and extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Destination directory for extracted archives
    pub output_dir: PathBuf,

    /// External unpacker binary, invoked as `<unpacker> x -y -o<dir> <archive>`
    pub unpacker: String,

    /// Keep downloaded archives after extraction
    pub keep_archives: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            unpacker: "7z".to_string(),
            keep_archives: false,
        }
    }
}
