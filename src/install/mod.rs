//! Archive download and extraction
//!
//! Downloads the archives named by a version directory's Updates.xml into
//! the output directory, then hands each one to an external unpacker
//! (`7z x -y -o<dir> <archive>`).

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::config::Config;
use crate::discovery::Selection;
use crate::error::{QtdlError, QtdlResult};
use crate::metadata::{self, PackageUpdate};
use crate::remote::{join_url, Fetch, HttpFetcher};
use crate::ui::{self, DownloadProgress, UiContext};

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Mark the process as interrupted. Called from the Ctrl-C handler; the
/// download loop polls the flag between chunks.
pub fn request_interrupt() {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// Whether an interrupt has been requested
pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Deletes a file on drop unless disarmed.
///
/// Guards both partially-written downloads and fully-downloaded archives
/// that should not outlive extraction.
struct FileGuard {
    path: PathBuf,
    armed: bool,
}

impl FileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Downloads and extracts the packages for a resolved selection
pub struct Installer<'a> {
    fetcher: &'a HttpFetcher,
    config: &'a Config,
    ctx: &'a UiContext,
}

impl<'a> Installer<'a> {
    pub fn new(fetcher: &'a HttpFetcher, config: &'a Config, ctx: &'a UiContext) -> Self {
        Self {
            fetcher,
            config,
            ctx,
        }
    }

    /// Download and extract the base package plus the requested modules.
    pub fn install(&self, selection: &Selection, modules: &[String]) -> QtdlResult<()> {
        let version_url = self.version_dir_url(selection);
        let updates_url = join_url(&version_url, "Updates.xml");

        let xml = self.fetcher.get(&updates_url)?;
        let packages = metadata::parse_updates(&xml, &updates_url)?;

        let compact = selection
            .version_dir
            .strip_prefix("qt5_")
            .unwrap_or(&selection.version_dir);
        let selected =
            metadata::select_packages(&packages, compact, &selection.toolchain, modules)?;

        let output_dir = self.config.install.output_dir.clone();
        fs::create_dir_all(&output_dir).map_err(|e| {
            QtdlError::io(format!("creating output directory {}", output_dir.display()), e)
        })?;

        for package in &selected {
            info!(package = %package.name, archives = package.archives.len(), "installing");
            ui::step_info(self.ctx, &format!("Package {}", package.name));
            self.install_package(&version_url, package, &output_dir)?;
        }
        Ok(())
    }

    fn install_package(
        &self,
        version_url: &str,
        package: &PackageUpdate,
        output_dir: &Path,
    ) -> QtdlResult<()> {
        let package_url = join_url(version_url, &package.name);
        for archive in &package.archives {
            if interrupted() {
                return Err(QtdlError::Interrupted);
            }
            let file_name = package.archive_file(archive);
            let url = join_url(&package_url, &file_name);
            let dest = output_dir.join(&file_name);

            let mut guard = FileGuard::new(dest.clone());
            self.download(&url, &dest, archive)?;
            extract_archive(&self.config.install.unpacker, &dest, output_dir)?;
            if self.config.install.keep_archives {
                guard.disarm();
            }
            ui::step_ok(self.ctx, archive);
        }
        Ok(())
    }

    fn download(&self, url: &str, dest: &Path, label: &str) -> QtdlResult<()> {
        debug!(url, dest = %dest.display(), "downloading");
        let mut body = self.fetcher.open(url)?;
        let progress = DownloadProgress::start(self.ctx, label, body.content_length);

        let mut file = File::create(dest)
            .map_err(|e| QtdlError::io(format!("creating {}", dest.display()), e))?;
        let mut buf = [0u8; 64 * 1024];
        loop {
            if interrupted() {
                progress.finish();
                return Err(QtdlError::Interrupted);
            }
            let n = body
                .read(&mut buf)
                .map_err(|e| QtdlError::fetch(url, e.to_string()))?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])
                .map_err(|e| QtdlError::io(format!("writing {}", dest.display()), e))?;
            progress.advance(n as u64);
        }
        file.flush()
            .map_err(|e| QtdlError::io(format!("writing {}", dest.display()), e))?;
        progress.finish();
        Ok(())
    }

    fn version_dir_url(&self, selection: &Selection) -> String {
        let os_url = join_url(&self.config.remote.base_url, &selection.os_remote);
        let target_url = join_url(&os_url, &selection.target);
        join_url(&target_url, &selection.version_dir)
    }
}

/// Run the external unpacker on one archive.
fn extract_archive(unpacker: &str, archive: &Path, output_dir: &Path) -> QtdlResult<()> {
    let mut command = Command::new(unpacker);
    command
        .arg("x")
        .arg("-y")
        .arg(format!("-o{}", output_dir.display()))
        .arg(archive);
    debug!(?command, "extracting");

    let rendered = format!("{} x {}", unpacker, archive.display());
    let output = command.output().map_err(|e| QtdlError::CommandFailed {
        command: rendered.clone(),
        source: e,
    })?;
    if !output.status.success() {
        return Err(QtdlError::Extraction {
            command: rendered,
            code: output.status.code().unwrap_or(-1),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn armed_guard_removes_file_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.7z");
        fs::write(&path, b"half").unwrap();

        let guard = FileGuard::new(path.clone());
        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn disarmed_guard_keeps_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kept.7z");
        fs::write(&path, b"whole").unwrap();

        let mut guard = FileGuard::new(path.clone());
        guard.disarm();
        drop(guard);
        assert!(path.exists());
    }

    #[test]
    #[cfg(unix)]
    fn failing_unpacker_is_extraction_error() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("a.7z");
        fs::write(&archive, b"").unwrap();

        let err = extract_archive("false", &archive, dir.path()).unwrap_err();
        match err {
            QtdlError::Extraction { code, .. } => assert_ne!(code, 0),
            other => panic!("expected Extraction, got {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn succeeding_unpacker_is_ok() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("a.7z");
        fs::write(&archive, b"").unwrap();

        extract_archive("true", &archive, dir.path()).unwrap();
    }

    #[test]
    fn missing_unpacker_is_command_failed() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("a.7z");
        fs::write(&archive, b"").unwrap();

        let err = extract_archive("qtdl-no-such-unpacker", &archive, dir.path()).unwrap_err();
        assert!(matches!(err, QtdlError::CommandFailed { .. }));
    }
}
