//! qtdl - Qt SDK archive discovery and download
//!
//! Walks the HTML directory listings of the Qt online repository to
//! resolve an OS / target / version / toolchain selection, then downloads
//! the matching archives from Updates.xml metadata and extracts them with
//! an external unpacker.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod install;
pub mod metadata;
pub mod remote;
pub mod ui;
pub mod version;

pub use error::{QtdlError, QtdlResult};
