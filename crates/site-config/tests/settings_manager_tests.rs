//! Tests for loading and saving registry settings documents

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use site_config::{ConfigKey, ConfigState, Error, Settings, SettingsManager};
use site_store::{DocumentStore, MemoryStore, StoreCall};

fn persisted(store: &MemoryStore, key: ConfigKey) -> Value {
    serde_json::from_str(&store.content(&key.remote_path()).unwrap()).unwrap()
}

#[test]
fn test_load_absent_returns_defaults() {
    let store = MemoryStore::new();
    let loaded = SettingsManager::new(&store).load(ConfigKey::AiSettings);

    assert!(loaded.source.is_none());
    assert_eq!(loaded.settings.get_str("device"), Some("cpu"));
    assert_eq!(loaded.settings.get_i64("max_articles_per_run"), Some(1));
    assert_eq!(loaded.settings, Settings::defaults(ConfigKey::AiSettings));
}

#[rstest]
#[case("not json at all")]
#[case("[1, 2, 3]")]
#[case("\"just a string\"")]
fn test_load_malformed_returns_defaults(#[case] content: &str) {
    let key = ConfigKey::AiSettings;
    let store = MemoryStore::with_documents([(key.remote_path(), content)]);
    let loaded = SettingsManager::new(&store).load(key);

    assert!(loaded.source.is_none());
    assert_eq!(loaded.settings, Settings::defaults(key));
}

#[test]
fn test_load_merges_and_keeps_unknown_keys() {
    let key = ConfigKey::AiSettings;
    let store = MemoryStore::with_documents([(
        key.remote_path(),
        r#"{"device": "mps", "legacy_flag": true}"#,
    )]);
    let loaded = SettingsManager::new(&store).load(key);

    assert!(loaded.is_persisted());
    assert_eq!(loaded.settings.get_str("device"), Some("mps"));
    assert_eq!(loaded.settings.get_bool("fetch_images"), Some(true));
    assert_eq!(loaded.settings.get_bool("legacy_flag"), Some(true));
}

#[test]
fn test_save_drops_unexpected_keys() {
    let key = ConfigKey::AiSettings;
    let store = MemoryStore::with_documents([(key.remote_path(), "{}")]);
    let manager = SettingsManager::new(&store);

    let loaded = manager.load(key);
    let mut settings = loaded.settings.clone();
    settings.set("unexpected_key", json!(1));
    manager
        .save(key, settings.values(), loaded.source.as_ref())
        .unwrap();

    let written = persisted(&store, key);
    assert!(written.get("unexpected_key").is_none());
    assert_eq!(written["device"], "cpu");
    assert_eq!(written.as_object().unwrap().len(), key.defaults().len());
}

#[test]
fn test_save_uses_two_space_indent() {
    let key = ConfigKey::AiSettings;
    let store = MemoryStore::new();
    SettingsManager::new(&store)
        .save(key, &key.defaults(), None)
        .unwrap();

    let content = store.content(&key.remote_path()).unwrap();
    assert!(content.starts_with("{\n  \""));
}

#[test]
fn test_save_without_source_creates() {
    let key = ConfigKey::SearchConfig;
    let store = MemoryStore::new();
    SettingsManager::new(&store)
        .save(key, &key.defaults(), None)
        .unwrap();

    assert!(matches!(
        store.writes().as_slice(),
        [StoreCall::Create { path, .. }] if *path == key.remote_path()
    ));
}

#[test]
fn test_save_with_stale_source_is_conflict() {
    let key = ConfigKey::AiSettings;
    let store = MemoryStore::with_documents([(key.remote_path(), "{}")]);
    let manager = SettingsManager::new(&store);

    let loaded = manager.load(key);
    store.seed(&key.remote_path(), r#"{"device": "cuda"}"#);

    let err = manager
        .save(key, loaded.settings.values(), loaded.source.as_ref())
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(persisted(&store, key)["device"], "cuda");
}

#[test]
fn test_save_transient_failure_is_not_conflict() {
    let key = ConfigKey::AiSettings;
    let store = MemoryStore::new();
    store.fail_next(site_store::Error::transient("503"));

    let err = SettingsManager::new(&store)
        .save(key, &key.defaults(), None)
        .unwrap_err();
    assert!(!err.is_conflict());
    assert_eq!(err.store_kind(), Some(site_store::ErrorKind::Transient));
}

#[test]
fn test_update_setting() {
    let key = ConfigKey::AiSettings;
    let store = MemoryStore::with_documents([(key.remote_path(), r#"{"device": "cuda"}"#)]);
    let manager = SettingsManager::new(&store);

    manager
        .update_setting(key, "max_articles_per_run", json!(5))
        .unwrap();

    let written = persisted(&store, key);
    assert_eq!(written["max_articles_per_run"], 5);
    assert_eq!(written["device"], "cuda");

    assert!(matches!(
        manager.update_setting(key, "nope", json!(1)),
        Err(Error::UnknownSetting { .. })
    ));
}

#[test]
fn test_replace_document_keeps_every_key() {
    let key = ConfigKey::App;
    let store = MemoryStore::with_documents([(key.remote_path(), r#"{"version": "4.0"}"#)]);
    let manager = SettingsManager::new(&store);

    let raw = manager.load_document(key).unwrap();
    assert_eq!(raw.value.as_ref().unwrap()["version"], "4.0");

    let replacement = json!({"version": "4.1", "extra": [1, 2]});
    manager
        .replace_document(key, &replacement, &raw.source)
        .unwrap();
    assert_eq!(persisted(&store, key), replacement);
}

#[test]
fn test_replace_document_rejects_non_object() {
    let key = ConfigKey::App;
    let store = MemoryStore::with_documents([(key.remote_path(), "{}")]);
    let manager = SettingsManager::new(&store);
    let raw = manager.load_document(key).unwrap();

    let err = manager
        .replace_document(key, &json!([1]), &raw.source)
        .unwrap_err();
    assert!(matches!(err, Error::NotAnObject { .. }));
}

#[test]
fn test_broken_document_repaired_through_replace() {
    let key = ConfigKey::App;
    let store = MemoryStore::with_documents([(key.remote_path(), "{ broken")]);
    let manager = SettingsManager::new(&store);

    assert!(!manager.load(key).is_persisted());

    let raw = manager.load_document(key).unwrap();
    assert!(!raw.is_valid());
    assert_eq!(raw.source.content, "{ broken");

    let repaired = json!({"version": "4.0"});
    manager.replace_document(key, &repaired, &raw.source).unwrap();

    assert_eq!(persisted(&store, key), repaired);
    let loaded = manager.load(key);
    assert!(loaded.is_persisted());
    assert_eq!(loaded.settings.get_str("version"), Some("4.0"));
}

#[test]
fn test_load_document_missing_is_not_found() {
    let store = MemoryStore::new();
    let err = SettingsManager::new(&store)
        .load_document(ConfigKey::App)
        .unwrap_err();
    assert_eq!(err.store_kind(), Some(site_store::ErrorKind::NotFound));
}

#[test]
fn test_overview_states() {
    let store = MemoryStore::with_documents([
        (ConfigKey::AiSettings.remote_path(), "{}"),
        (ConfigKey::App.remote_path(), "oops"),
    ]);
    let overview = SettingsManager::new(&store).overview();

    let states: Vec<_> = overview.iter().map(|s| (s.entry.key, s.state)).collect();
    assert_eq!(
        states,
        vec![
            (ConfigKey::AiSettings, ConfigState::Loaded),
            (ConfigKey::ArticleConfig, ConfigState::Missing),
            (ConfigKey::SearchConfig, ConfigState::Missing),
            (ConfigKey::App, ConfigState::Invalid),
            (ConfigKey::DomainReliability, ConfigState::Missing),
        ]
    );
}

#[test]
fn test_load_reads_every_time() {
    let key = ConfigKey::AiSettings;
    let store = MemoryStore::new();
    let manager = SettingsManager::new(&store);

    manager.load(key);
    store.seed(&key.remote_path(), r#"{"device": "cuda"}"#);
    let loaded = manager.load(key);

    assert_eq!(loaded.settings.get_str("device"), Some("cuda"));
    let fetches = store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::Fetch { .. }))
        .count();
    assert_eq!(fetches, 2);
    assert!(store.fetch(&key.remote_path()).is_ok());
}
