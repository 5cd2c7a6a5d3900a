use super::{FileTokenStore, MemoryTokenStore, TokenKey, TokenStore};
use tempfile::TempDir;

#[test]
fn test_token_key_storage_names() {
    assert_eq!(TokenKey::AccessToken.as_str(), "access_token");
    assert_eq!(TokenKey::RefreshToken.as_str(), "refresh_token");
    assert_eq!(TokenKey::RefreshToken.to_string(), "refresh_token");
}

#[test]
fn test_memory_store_set_get_clear() {
    let store = MemoryTokenStore::new();
    assert_eq!(store.get(TokenKey::AccessToken).unwrap(), None);

    store.set(TokenKey::AccessToken, "T1").unwrap();
    assert_eq!(store.get(TokenKey::AccessToken).unwrap().as_deref(), Some("T1"));
    assert_eq!(store.get(TokenKey::RefreshToken).unwrap(), None);

    store.clear(TokenKey::AccessToken).unwrap();
    assert_eq!(store.get(TokenKey::AccessToken).unwrap(), None);
}

#[test]
fn test_file_store_missing_file_reads_empty() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileTokenStore::new(temp_dir.path().join("tokens.json"));

    assert_eq!(store.get(TokenKey::AccessToken).unwrap(), None);
    assert!(store.clear(TokenKey::RefreshToken).is_ok());
    assert!(!store.path().exists(), "Clearing nothing should not create the file");
}

#[test]
fn test_file_store_persists_across_instances() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("nested").join("tokens.json");

    FileTokenStore::new(&path)
        .set(TokenKey::RefreshToken, "R1")
        .unwrap();

    let reopened = FileTokenStore::new(&path);
    assert_eq!(reopened.get(TokenKey::RefreshToken).unwrap().as_deref(), Some("R1"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["refresh_token"], "R1");
}

#[test]
fn test_file_store_observes_external_writes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("tokens.json");
    let store = FileTokenStore::new(&path);
    store.set(TokenKey::AccessToken, "T1").unwrap();

    std::fs::write(&path, r#"{"access_token":"T2"}"#).unwrap();

    assert_eq!(store.get(TokenKey::AccessToken).unwrap().as_deref(), Some("T2"));
}

#[test]
fn test_file_store_clear_keeps_other_key() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileTokenStore::new(temp_dir.path().join("tokens.json"));
    store.set(TokenKey::AccessToken, "T1").unwrap();
    store.set(TokenKey::RefreshToken, "R1").unwrap();

    store.clear(TokenKey::AccessToken).unwrap();

    assert_eq!(store.get(TokenKey::AccessToken).unwrap(), None);
    assert_eq!(store.get(TokenKey::RefreshToken).unwrap().as_deref(), Some("R1"));
}

#[test]
fn test_file_store_rejects_corrupt_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("tokens.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(FileTokenStore::new(&path).get(TokenKey::AccessToken).is_err());
}
