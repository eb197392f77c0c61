use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bytes::Bytes;
use concorsi_tracker::attachments::{open_all, AttachmentError, Launcher, ManagedDir};
use concorsi_tracker::storage::models::AttachmentList;

#[derive(Default)]
struct RecordingLauncher {
    opened: Mutex<Vec<PathBuf>>,
}

impl Launcher for RecordingLauncher {
    fn open_path(&self, path: &Path) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

fn write_source(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_commit_copies_every_file() {
    let sources = tempfile::tempdir().unwrap();
    let managed = tempfile::tempdir().unwrap();
    let store = ManagedDir::new(managed.path()).unwrap();

    let staged = vec![
        write_source(sources.path(), "bando.pdf", b"bando"),
        write_source(sources.path(), "allegato_a.pdf", b"allegato"),
        write_source(sources.path(), "graduatoria.pdf", b"graduatoria"),
    ];

    let report = store.commit(&staged).await;
    assert!(report.is_complete());
    assert_eq!(report.persisted.len(), staged.len());

    for (source, dest) in staged.iter().zip(&report.persisted) {
        assert!(dest.exists());
        assert_eq!(dest.parent(), Some(managed.path()));
        assert_eq!(std::fs::read(dest).unwrap(), std::fs::read(source).unwrap());

        let original = source.file_name().unwrap().to_string_lossy().to_string();
        let copied = dest.file_name().unwrap().to_string_lossy().to_string();
        assert!(copied.ends_with(&format!("_{original}")));
        let timestamp = copied.split('_').next().unwrap();
        assert!(timestamp.parse::<i64>().is_ok());
    }

    // Sources are copied, not moved
    assert!(staged.iter().all(|p| p.exists()));
}

#[tokio::test]
async fn test_commit_same_name_twice_does_not_overwrite() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let managed = tempfile::tempdir().unwrap();
    let store = ManagedDir::new(managed.path()).unwrap();

    let staged = vec![
        write_source(first_dir.path(), "bando.pdf", b"first"),
        write_source(second_dir.path(), "bando.pdf", b"second"),
    ];

    let report = store.commit(&staged).await;
    assert_eq!(report.persisted.len(), 2);
    assert_ne!(report.persisted[0], report.persisted[1]);
    assert_eq!(std::fs::read(&report.persisted[0]).unwrap(), b"first");
    assert_eq!(std::fs::read(&report.persisted[1]).unwrap(), b"second");
}

#[tokio::test]
async fn test_commit_skips_missing_sources() {
    let sources = tempfile::tempdir().unwrap();
    let managed = tempfile::tempdir().unwrap();
    let store = ManagedDir::new(managed.path()).unwrap();

    let present = write_source(sources.path(), "present.pdf", b"ok");
    let missing = sources.path().join("missing.pdf");

    let report = store.commit(&[missing.clone(), present]).await;
    assert!(!report.is_complete());
    assert_eq!(report.persisted.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, missing);
}

#[tokio::test]
async fn test_staged_upload_keeps_client_name_on_commit() {
    let managed = tempfile::tempdir().unwrap();
    let store = ManagedDir::new(managed.path()).unwrap();

    let staged = store
        .stage_upload("bando_2024.pdf", Bytes::from("pdf bytes"))
        .await
        .unwrap();
    assert!(staged.exists());

    let report = store.commit(std::slice::from_ref(&staged)).await;
    let copied = report.persisted[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(copied.ends_with("_bando_2024.pdf"));
    assert_eq!(copied.matches('_').count(), 2);

    store.discard_staged(std::slice::from_ref(&staged)).await;
    assert!(!staged.exists());
    assert!(report.persisted[0].exists());
}

#[tokio::test]
async fn test_comma_in_upload_name_survives_stored_list() {
    let managed = tempfile::tempdir().unwrap();
    let store = ManagedDir::new(managed.path()).unwrap();

    let staged = store
        .stage_upload("bando, allegato.pdf", Bytes::from("pdf bytes"))
        .await
        .unwrap();
    let report = store.commit(std::slice::from_ref(&staged)).await;
    assert!(report.is_complete());

    let copied = report.persisted[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(copied.ends_with("_bando_ allegato.pdf"));

    let stored = AttachmentList::new(report.persisted.clone()).to_joined();
    let parsed = AttachmentList::parse(&stored);
    assert_eq!(parsed.paths(), report.persisted.as_slice());
    assert!(parsed.iter().all(|p| p.exists()));
}

#[tokio::test]
async fn test_discard_staged_leaves_user_files() {
    let sources = tempfile::tempdir().unwrap();
    let managed = tempfile::tempdir().unwrap();
    let store = ManagedDir::new(managed.path()).unwrap();

    let user_file = write_source(sources.path(), "mine.pdf", b"keep me");
    store.discard_staged(std::slice::from_ref(&user_file)).await;
    assert!(user_file.exists());
}

#[tokio::test]
async fn test_read_managed_copy() {
    let sources = tempfile::tempdir().unwrap();
    let managed = tempfile::tempdir().unwrap();
    let store = ManagedDir::new(managed.path()).unwrap();

    let source = write_source(sources.path(), "bando.pdf", b"content");
    let report = store.commit(&[source]).await;
    let name = report.persisted[0].file_name().unwrap().to_string_lossy().to_string();

    assert_eq!(store.read(&name).await.unwrap(), Bytes::from("content"));
    assert!(matches!(
        store.read("missing.pdf").await.unwrap_err(),
        AttachmentError::NotFound(_)
    ));
    assert!(matches!(
        store.read("../concorsi.db").await.unwrap_err(),
        AttachmentError::InvalidName(_)
    ));
}

#[tokio::test]
async fn test_remove_only_touches_managed_copies() {
    let sources = tempfile::tempdir().unwrap();
    let managed = tempfile::tempdir().unwrap();
    let store = ManagedDir::new(managed.path()).unwrap();

    let source = write_source(sources.path(), "bando.pdf", b"content");
    let report = store.commit(std::slice::from_ref(&source)).await;

    let removed = store
        .remove(&[report.persisted[0].clone(), source.clone()])
        .await;
    assert_eq!(removed, 1);
    assert!(!report.persisted[0].exists());
    assert!(source.exists());
}

#[test]
fn test_open_all_skips_missing_paths() {
    let dir = tempfile::tempdir().unwrap();
    let existing = write_source(dir.path(), "bando.pdf", b"pdf");
    let missing = dir.path().join("gone.pdf");
    let joined = format!("{},{}", existing.display(), missing.display());

    let launcher = RecordingLauncher::default();
    let report = open_all(&joined, &launcher);

    assert_eq!(*launcher.opened.lock().unwrap(), vec![existing.clone()]);
    assert_eq!(report.opened, vec![existing]);
    assert_eq!(report.missing, vec![missing]);
    assert!(report.failed.is_empty());
}

#[test]
fn test_open_all_empty_string_opens_nothing() {
    let launcher = RecordingLauncher::default();
    let report = open_all("", &launcher);
    assert!(report.opened.is_empty());
    assert!(launcher.opened.lock().unwrap().is_empty());
}
