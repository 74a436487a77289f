//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Discover and download Qt SDK archives from the online repository
#[derive(Parser, Debug)]
#[command(name = "qtdl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Operating system: linux, macos, windows, `auto` to detect the host,
    /// or `discover` to enumerate
    #[arg(default_value = "discover")]
    pub os: String,

    /// Target platform (desktop, android, ios) or `discover`
    #[arg(default_value = "discover")]
    pub target: String,

    /// Version: exact (5.15.2), prefix (5.15), range (">=5.9,<5.10"),
    /// `latest`, or `discover`
    // distinct id: the bare `version` id belongs to the auto --version flag
    #[arg(id = "qt-version", value_name = "VERSION", default_value = "discover")]
    pub version: String,

    /// Toolchain (gcc, clang, win64_msvc2019) or `discover`
    #[arg(default_value = "discover")]
    pub toolchain: String,

    /// Expand every unconstrained level instead of stopping at the first
    #[arg(short, long)]
    pub all: bool,

    /// Extra Qt module packages to install (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub modules: Vec<String>,

    /// Output directory for downloaded archives
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Repository root URL
    #[arg(long, env = "QTDL_BASE_URL")]
    pub base_url: Option<String>,

    /// Output format for discovery results
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Path to the configuration file
    #[arg(short, long, env = "QTDL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_discover_everywhere() {
        let cli = Cli::parse_from(["qtdl"]);
        assert_eq!(cli.os, "discover");
        assert_eq!(cli.target, "discover");
        assert_eq!(cli.version, "discover");
        assert_eq!(cli.toolchain, "discover");
        assert!(!cli.all);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn positional_order_is_os_target_version_toolchain() {
        let cli = Cli::parse_from(["qtdl", "macos", "desktop", "5.15", "clang"]);
        assert_eq!(cli.os, "macos");
        assert_eq!(cli.target, "desktop");
        assert_eq!(cli.version, "5.15");
        assert_eq!(cli.toolchain, "clang");
    }

    #[test]
    fn version_flag_remains_distinct_from_positional() {
        let err = Cli::try_parse_from(["qtdl", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::parse_from(["qtdl", "linux", "desktop", "latest", "gcc"]);
        assert_eq!(cli.version, "latest");
    }

    #[test]
    fn modules_split_on_commas() {
        let cli = Cli::parse_from(["qtdl", "-m", "qtcharts,qtnetworkauth"]);
        assert_eq!(cli.modules, vec!["qtcharts", "qtnetworkauth"]);
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::parse_from(["qtdl", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn json_format_flag() {
        let cli = Cli::parse_from(["qtdl", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
