//! Tests for the first-run onboarding gate and its stores

use kodegen_agent_session::onboarding::ONBOARDING_SEEN_KEY;
use kodegen_agent_session::{
    Dialog, FileStore, KeyValueStore, MemoryStore, OnboardingGate, SessionError,
};
use std::sync::Arc;

#[test]
fn test_help_first_then_settings() {
    let store = Arc::new(MemoryStore::new());
    let gate = OnboardingGate::new(store.clone());

    assert!(!gate.has_seen().unwrap());
    assert_eq!(gate.first_dialog().unwrap(), Dialog::Help);
    assert!(gate.has_seen().unwrap());
    assert_eq!(gate.first_dialog().unwrap(), Dialog::Settings);
    assert_eq!(gate.first_dialog().unwrap(), Dialog::Settings);
    assert_eq!(
        store.get(ONBOARDING_SEEN_KEY).unwrap(),
        Some(serde_json::Value::Bool(true))
    );
}

#[test]
fn test_file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("flags.json");

    let gate = OnboardingGate::new(Arc::new(FileStore::new(&path)));
    assert_eq!(gate.first_dialog().unwrap(), Dialog::Help);
    assert!(path.exists());

    // A fresh store over the same file sees the flag
    let gate = OnboardingGate::new(Arc::new(FileStore::new(&path)));
    assert_eq!(gate.first_dialog().unwrap(), Dialog::Settings);
}

#[test]
fn test_file_store_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("flags.json"));

    store.set("theme", serde_json::json!("dark")).unwrap();
    OnboardingGate::new(Arc::new(FileStore::new(store.path())))
        .first_dialog()
        .unwrap();

    assert_eq!(store.get("theme").unwrap(), Some(serde_json::json!("dark")));
    assert!(store.get(ONBOARDING_SEEN_KEY).unwrap().is_some());
    assert!(store.get("missing").unwrap().is_none());
}

#[test]
fn test_file_store_empty_file_reads_as_unseen() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let gate = OnboardingGate::new(Arc::new(FileStore::new(file.path())));
    assert_eq!(gate.first_dialog().unwrap(), Dialog::Help);
}

#[test]
fn test_file_store_rejects_non_object() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flags.json");
    std::fs::write(&path, "[1, 2, 3]").unwrap();

    let gate = OnboardingGate::new(Arc::new(FileStore::new(&path)));
    let err = gate.first_dialog().unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
}
