use std::time::Duration;

use super::*;

#[tokio::test]
async fn empty_or_missing_dir_has_no_sessions() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("does-not-exist");

    assert!(list_session_ids(dir.path()).await.expect("list").is_empty());
    assert!(list_session_ids(&missing).await.expect("list").is_empty());
    assert_eq!(most_recent_session_id(dir.path()).await.expect("recent"), None);
}

#[tokio::test]
async fn most_recent_session_id_picks_the_latest_mtime() {
    let dir = tempfile::tempdir().expect("tempdir");
    tokio::fs::write(session_file_path(dir.path(), "older"), "").await.expect("write");
    tokio::time::sleep(Duration::from_millis(20)).await;
    tokio::fs::write(session_file_path(dir.path(), "newer"), "").await.expect("write");

    let recent = most_recent_session_id(dir.path()).await.expect("recent");
    assert_eq!(recent, Some("newer".to_string()));
}

#[tokio::test]
async fn non_session_files_are_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    tokio::fs::write(dir.path().join("notes.txt"), "").await.expect("write");

    assert!(list_session_ids(dir.path()).await.expect("list").is_empty());
}

#[tokio::test]
async fn resolve_without_continue_always_mints_a_fresh_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    tokio::fs::write(session_file_path(dir.path(), "existing"), "").await.expect("write");

    let id = resolve_session_id(dir.path(), false).await.expect("resolve");
    assert_ne!(id, "existing");
}

#[tokio::test]
async fn resolve_with_continue_picks_the_most_recent_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    tokio::fs::write(session_file_path(dir.path(), "only-one"), "").await.expect("write");

    let id = resolve_session_id(dir.path(), true).await.expect("resolve");
    assert_eq!(id, "only-one");
}

#[tokio::test]
async fn resolve_with_continue_and_no_sessions_is_a_usage_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = resolve_session_id(dir.path(), true).await;
    assert!(matches!(result, Err(SessionError::NoPriorSession(_))));
}
