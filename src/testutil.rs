//! Shared test helpers for concorsi-tracker unit tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::attachments::{Launcher, ManagedDir};
use crate::config::{Config, ServerConfig, StorageConfig};
use crate::storage::Database;
use crate::AppState;

/// Launcher that records what it was asked to open.
#[derive(Default)]
pub struct RecordingLauncher {
    pub opened: Mutex<Vec<PathBuf>>,
}

impl Launcher for RecordingLauncher {
    fn open_path(&self, path: &Path) -> std::io::Result<()> {
        self.opened
            .lock()
            .expect("launcher lock poisoned")
            .push(path.to_path_buf());
        Ok(())
    }
}

/// Create a test AppState with a temporary database and attachment directory.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let database_path = temp_dir.path().join("concorsi.db");
    let attachments_dir = temp_dir.path().join("bandi_pdf");

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        storage: StorageConfig {
            database_path: database_path.to_string_lossy().to_string(),
            attachments_dir: attachments_dir.to_string_lossy().to_string(),
            prune_attachments_on_delete: false,
        },
        max_upload_size: 10 * 1024 * 1024, // 10MB for tests
    };

    let db = Database::open(&database_path).expect("Failed to open test database");
    let attachments =
        ManagedDir::new(&attachments_dir).expect("Failed to create test attachment directory");

    Arc::new(AppState::new(
        config,
        db,
        attachments,
        Arc::new(RecordingLauncher::default()),
    ))
}
