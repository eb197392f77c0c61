use bytes::Bytes;
use std::path::{Path, PathBuf};

use super::{AttachmentError, CommitFailure, CommitReport};

const STAGING_DIR: &str = ".staging";

/// Managed attachment directory on the local filesystem.
///
/// Committed copies are named `{unix_timestamp}_{original_name}`, with `,` replaced by `_`
/// since stored attachment lists are comma-separated. Browser uploads wait in a `.staging`
/// subdirectory until the form is saved.
pub struct ManagedDir {
    base_path: PathBuf,
}

impl ManagedDir {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(base_path.join(STAGING_DIR))?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn staging_path(&self) -> PathBuf {
        self.base_path.join(STAGING_DIR)
    }

    /// Write uploaded bytes into the staging area and return the staged path.
    pub async fn stage_upload(
        &self,
        file_name: &str,
        data: Bytes,
    ) -> Result<PathBuf, AttachmentError> {
        let name = base_name(file_name)
            .ok_or_else(|| AttachmentError::InvalidName(file_name.to_string()))?;
        let path = self
            .staging_path()
            .join(format!("{}_{}", uuid::Uuid::new_v4().simple(), name));
        tokio::fs::write(&path, &data).await?;
        Ok(path)
    }

    /// Copy every staged file into the managed directory.
    ///
    /// Failures are collected and the remaining files are still copied.
    pub async fn commit(&self, staged: &[PathBuf]) -> CommitReport {
        let mut report = CommitReport::default();

        for source in staged {
            match self.copy_one(source).await {
                Ok(dest) => {
                    tracing::debug!(source = %source.display(), dest = %dest.display(), "Copied attachment");
                    report.persisted.push(dest);
                }
                Err(e) => {
                    tracing::warn!(source = %source.display(), error = %e, "Skipping attachment");
                    report.failures.push(CommitFailure {
                        source: source.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    async fn copy_one(&self, source: &Path) -> Result<PathBuf, AttachmentError> {
        if !tokio::fs::try_exists(source).await? {
            return Err(AttachmentError::NotFound(source.display().to_string()));
        }
        let name = original_name(source, &self.staging_path())?.replace(',', "_");
        let dest = self.destination_for(&name).await?;
        tokio::fs::copy(source, &dest).await?;
        Ok(dest)
    }

    async fn destination_for(&self, name: &str) -> Result<PathBuf, AttachmentError> {
        let timestamp = chrono::Utc::now().timestamp();
        let dest = self.base_path.join(format!("{timestamp}_{name}"));
        if !tokio::fs::try_exists(&dest).await? {
            return Ok(dest);
        }

        // Same name committed twice within one second
        let mut n = 1u32;
        loop {
            let dest = self.base_path.join(format!("{timestamp}_{n}_{name}"));
            if !tokio::fs::try_exists(&dest).await? {
                return Ok(dest);
            }
            n += 1;
        }
    }

    /// Remove staged files that live in the staging area. User-owned paths are left alone.
    pub async fn discard_staged(&self, staged: &[PathBuf]) {
        let staging = self.staging_path();
        for path in staged.iter().filter(|p| p.starts_with(&staging)) {
            if let Err(e) = tokio::fs::remove_file(path).await {
                tracing::warn!(path = %path.display(), error = %e, "Failed to discard staged upload");
            }
        }
    }

    /// Read a managed copy by its file name.
    pub async fn read(&self, name: &str) -> Result<Bytes, AttachmentError> {
        let name = sanitize_file_name(name)?;
        let path = self.base_path.join(name);
        if !tokio::fs::try_exists(&path).await? {
            return Err(AttachmentError::NotFound(name.to_string()));
        }
        let data = tokio::fs::read(&path).await?;
        Ok(Bytes::from(data))
    }

    /// Best-effort removal of managed copies. Paths outside the directory are ignored.
    pub async fn remove(&self, paths: &[PathBuf]) -> usize {
        let mut removed = 0;
        for path in paths.iter().filter(|p| self.owns(p)) {
            match tokio::fs::remove_file(path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove attachment");
                }
            }
        }
        removed
    }

    fn owns(&self, path: &Path) -> bool {
        path.parent() == Some(self.base_path.as_path())
    }
}

/// The name a committed copy should carry: the upload's client name for staged
/// uploads, the plain file name otherwise.
fn original_name(source: &Path, staging: &Path) -> Result<String, AttachmentError> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AttachmentError::InvalidName(source.display().to_string()))?;

    if source.parent() == Some(staging) {
        if let Some((_, client_name)) = name.split_once('_') {
            return Ok(client_name.to_string());
        }
    }
    Ok(name.to_string())
}

/// Final path component of a client-provided name. Some browsers send full paths.
fn base_name(name: &str) -> Option<&str> {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next()?.trim();
    match base {
        "" | "." | ".." => None,
        _ => Some(base),
    }
}

/// A bare file name inside the managed directory; anything with a path component is rejected.
fn sanitize_file_name(name: &str) -> Result<&str, AttachmentError> {
    match base_name(name) {
        Some(base) if base == name => Ok(base),
        _ => Err(AttachmentError::InvalidName(name.to_string())),
    }
}
