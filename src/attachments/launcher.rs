use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use crate::storage::models::AttachmentList;

/// Hands a file to the host environment's default application.
pub trait Launcher: Send + Sync {
    fn open_path(&self, path: &Path) -> std::io::Result<()>;
}

/// Launcher backed by the platform opener (`xdg-open`, `open`, `cmd /C start`).
#[derive(Debug, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open_path(&self, path: &Path) -> std::io::Result<()> {
        spawn_reaped(opener_command(path))?;
        Ok(())
    }
}

/// Spawn `command` without blocking the caller. A reaper thread waits on the child
/// so it never lingers as a zombie.
fn spawn_reaped(
    mut command: Command,
) -> std::io::Result<JoinHandle<std::io::Result<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    std::thread::Builder::new()
        .name("opener-reaper".to_string())
        .spawn(move || {
            let status = child.wait();
            if let Err(e) = &status {
                tracing::warn!(pid = child.id(), error = %e, "Failed to reap opener");
            }
            status
        })
}

#[cfg(target_os = "windows")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg("start").arg("").arg(path);
    command
}

#[cfg(target_os = "macos")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenReport {
    pub opened: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Open every existing path of a stored `file_path` value. Missing files are skipped.
pub fn open_all(joined: &str, launcher: &dyn Launcher) -> OpenReport {
    let mut report = OpenReport::default();

    for path in AttachmentList::parse(joined).iter() {
        if !path.exists() {
            report.missing.push(path.to_path_buf());
            continue;
        }
        match launcher.open_path(path) {
            Ok(()) => report.opened.push(path.to_path_buf()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to open attachment");
                report.failed.push(path.to_path_buf());
            }
        }
    }

    report
}
