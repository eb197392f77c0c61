//! Attachment manager: staged selections, managed copies, and host-side opening.

mod launcher;
mod managed;

pub use launcher::{open_all, Launcher, OpenReport, SystemLauncher};
pub use managed::ManagedDir;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Attachment not found: {0}")]
    NotFound(String),
    #[error("Invalid attachment name: {0}")]
    InvalidName(String),
}

/// A staged path that could not be copied into the managed directory.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitFailure {
    pub source: PathBuf,
    pub reason: String,
}

/// Outcome of a best-effort commit. `persisted` keeps the staged order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReport {
    pub persisted: Vec<PathBuf>,
    pub failures: Vec<CommitFailure>,
}

impl CommitReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
