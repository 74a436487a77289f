//! Error types for qtdl
//!
//! All modules use `QtdlResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

use crate::discovery::Level;

/// Result type alias for qtdl operations
pub type QtdlResult<T> = Result<T, QtdlError>;

/// All errors that can occur in qtdl
#[derive(Error, Debug)]
pub enum QtdlError {
    // Remote errors
    #[error("Request failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to parse {what} from {url}: {reason}")]
    Parse {
        what: &'static str,
        url: String,
        reason: String,
    },

    // Discovery errors
    #[error("Unknown {level} '{value}'")]
    NotFound {
        level: Level,
        value: String,
        alternatives: Vec<String>,
    },

    #[error("Invalid version expression '{expr}': {reason}")]
    InvalidVersionSpec { expr: String, reason: String },

    #[error("Unsupported host platform: {0}. Pass the OS explicitly (linux, macos, windows).")]
    UnsupportedHost(String),

    // Install errors
    #[error("No package entry for '{name}' in Updates.xml")]
    PackageNotFound { name: String },

    #[error("Extraction failed: {command}, exit code: {code}")]
    Extraction { command: String, code: i32 },

    #[error("Interrupted")]
    Interrupted,

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QtdlError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a fetch error for a URL
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a parse error for a URL
    pub fn parse(what: &'static str, url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            what,
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Fetch { .. } => Some("Check network connectivity and the configured base URL"),
            Self::Extraction { .. } | Self::CommandFailed { .. } => {
                Some("Install 7-Zip (e.g. apt install p7zip-full) or set install.unpacker in the config")
            }
            Self::InvalidVersionSpec { .. } => {
                Some("Use an exact version (5.15.2), a prefix (5.15), a range (>=5.9,<5.10), or latest")
            }
            _ => None,
        }
    }
}
