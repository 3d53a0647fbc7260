use slidechat_storage::backend::{FileBackend, MemoryBackend, StateBackend};
use slidechat_storage::error::StorageError;
use slidechat_storage::state::{load_state, save_state};

#[tokio::test]
async fn file_backend_round_trips_and_deletes() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileBackend::new(dir.path().join("nested"));

    assert!(backend.get("prefs").await.unwrap().is_none());

    backend.set("prefs", b"[1,2]".to_vec()).await.unwrap();
    assert_eq!(backend.get("prefs").await.unwrap().unwrap(), b"[1,2]");
    assert!(!dir.path().join("nested/prefs.json.tmp").exists());

    backend.delete("prefs").await.unwrap();
    backend.delete("prefs").await.unwrap();
    assert!(backend.get("prefs").await.unwrap().is_none());
}

#[tokio::test]
async fn file_backend_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileBackend::new(dir.path());

    for key in ["../escape", "a/b", "", ".hidden"] {
        assert!(matches!(
            backend.get(key).await,
            Err(StorageError::InvalidKey { .. })
        ));
    }
}

#[tokio::test]
async fn load_state_reports_missing_keys() {
    let backend = MemoryBackend::new();
    let err = load_state::<Vec<u32>>(&backend, "missing").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));

    save_state(&backend, "nums", &vec![1u32, 2, 3]).await.unwrap();
    let nums: Vec<u32> = load_state(&backend, "nums").await.unwrap();
    assert_eq!(nums, vec![1, 2, 3]);
}

#[tokio::test]
async fn memory_backend_failure_injection() {
    let backend = MemoryBackend::new();
    backend.set_fail_writes(true);
    assert!(backend.set("k", vec![1]).await.is_err());

    backend.set_fail_writes(false);
    backend.set("k", vec![1]).await.unwrap();
    backend.set_fail_reads(true);
    assert!(matches!(
        backend.get("k").await,
        Err(StorageError::Unavailable(_))
    ));
}
