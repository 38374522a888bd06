//! Tests for the local-directory settings fallback

use std::fs;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use site_config::local::local_path;
use site_config::{ConfigKey, Settings, load_local, update_local_setting};
use tempfile::TempDir;

#[test]
fn test_missing_local_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        load_local(ConfigKey::AiSettings, dir.path()),
        Settings::defaults(ConfigKey::AiSettings)
    );
}

#[test]
fn test_local_file_merged_over_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_path(ConfigKey::AiSettings, dir.path()),
        r#"{"device": "cuda"}"#,
    )
    .unwrap();

    let settings = load_local(ConfigKey::AiSettings, dir.path());
    assert_eq!(settings.get_str("device"), Some("cuda"));
    assert_eq!(settings.get_str("embedding_model"), Some("all-MiniLM-L6-v2"));
}

#[test]
fn test_corrupt_local_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(local_path(ConfigKey::App, dir.path()), "{{{").unwrap();
    assert_eq!(
        load_local(ConfigKey::App, dir.path()),
        Settings::defaults(ConfigKey::App)
    );
}

#[test]
fn test_update_local_setting_persists() {
    let dir = TempDir::new().unwrap();
    let path = local_path(ConfigKey::AiSettings, dir.path());
    fs::write(&path, r#"{"device": "mps", "stray": 1}"#).unwrap();

    let settings =
        update_local_setting(ConfigKey::AiSettings, "load_in_8bit", json!(true), dir.path()).unwrap();
    assert_eq!(settings.get_bool("load_in_8bit"), Some(true));

    let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["load_in_8bit"], true);
    assert_eq!(written["device"], "mps");
    assert!(written.get("stray").is_none());
}
