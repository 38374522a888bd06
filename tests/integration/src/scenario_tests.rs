//! End-to-end scenarios across the content, store, config and core crates
//!
//! Each test plays a dashboard session against an in-memory repository and
//! checks both what the session sees and which store calls it made.

use pretty_assertions::assert_eq;
use serde_json::json;
use site_config::{ConfigKey, SettingsManager, SiteConfigManager, load_local, update_local_setting};
use site_content::replace_named_section;
use site_core::{Dashboard, PostForm, SiteConfigForm};
use site_store::{DocumentStore, GitHubStore, MemoryStore, StoreCall, StoreOptions};
use site_test_utils::site::{HOME_LAYOUT, SITE_CONFIG, post_path};
use site_test_utils::{SiteFixture, sample_site};
use tempfile::TempDir;

/// Two editors open the same post; the slower save must not clobber the
/// faster one, and a reload lets the slower editor finish.
#[test]
fn test_two_editors_same_post() {
    let store = sample_site();
    let path = post_path("2024-01-01-post-1.md");
    let alice = Dashboard::new(&store);
    let bob = Dashboard::new(&store);

    let alice_doc = alice.open(&path).unwrap();
    let bob_doc = bob.open(&path).unwrap();

    let form = |title: &str, body: &str, version| PostForm {
        title: title.into(),
        content: body.into(),
        version: Some(version),
        date: Some("2024-01-01".into()),
        ..PostForm::default()
    };

    alice
        .update_post(&path, &form("Alice", "Alice body", alice_doc.version))
        .unwrap();
    let err = bob
        .update_post(&path, &form("Bob", "Bob body", bob_doc.version))
        .unwrap_err();
    assert!(err.is_conflict());

    let reloaded = bob.open(&path).unwrap();
    assert_eq!(reloaded.field("title"), Some("Alice"));
    bob.update_post(&path, &form("Bob", "Bob body", reloaded.version))
        .unwrap();

    let titles: Vec<_> = store
        .commits()
        .into_iter()
        .map(|c| c.message.split(" - ").next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(titles, vec!["Update post: Alice", "Update post: Bob"]);
}

/// Absent `_config.yml`: load is empty and the first save creates the file.
#[test]
fn test_first_site_config_save_creates_file() {
    let store = MemoryStore::new();
    let manager = SiteConfigManager::new(&store);

    let config = manager.load();
    assert!(config.settings.is_empty());

    let mut settings = config.settings;
    settings.insert("title".into(), "Karoo Diaries".into());
    manager.save(&settings, config.source.as_ref()).unwrap();

    let calls = store.calls();
    assert!(matches!(calls.first(), Some(StoreCall::Fetch { path }) if path == SITE_CONFIG));
    match calls.last() {
        Some(StoreCall::Create { path, content, .. }) => {
            assert_eq!(path, SITE_CONFIG);
            assert!(content.contains("title: Karoo Diaries"));
        }
        other => panic!("expected a create call, got {other:?}"),
    }
}

/// Settings saved through the dashboard are read back by the raw config
/// manager with only the recognized keys.
#[test]
fn test_ai_settings_document_shape() {
    let store = MemoryStore::with_documents([(
        ConfigKey::AiSettings.remote_path(),
        r#"{"device": "cuda", "retired_option": "x"}"#,
    )]);
    let dashboard = Dashboard::new(&store);

    let mut settings = dashboard.ai_settings();
    settings.fetch_images = false;
    dashboard.update_ai_settings(&settings).unwrap();

    let raw = SettingsManager::new(&store)
        .load_document(ConfigKey::AiSettings)
        .unwrap();
    let value = raw.value.unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), ConfigKey::AiSettings.defaults().len());
    assert_eq!(value["device"], "cuda");
    assert_eq!(value["fetch_images"], false);
    assert!(object.get("retired_option").is_none());
}

/// The dashboard works the same behind a boxed trait object.
#[test]
fn test_dashboard_over_boxed_store() {
    let store: Box<dyn DocumentStore> = Box::new(SiteFixture::standard().with_posts(2).build());
    let dashboard = Dashboard::new(store);

    let summary = dashboard.summary().unwrap();
    assert_eq!(summary.total_posts, 2);
    assert_eq!(dashboard.home_about().unwrap(), "We write about indigenous plants.");
}

/// Editing the home layout touches nothing outside the about section.
#[test]
fn test_home_about_edit_is_local() {
    let store = sample_site();
    let before = store.content(HOME_LAYOUT).unwrap();

    Dashboard::new(&store)
        .update_home_about("Succulents and bulbs.")
        .unwrap();

    let after = store.content(HOME_LAYOUT).unwrap();
    assert_eq!(
        after,
        replace_named_section(&before, "about-section", "Succulents and bulbs.")
    );
    let parsed = site_content::parse(&after);
    assert_eq!(parsed.metadata_str("layout"), Some("default"));
}

/// The site settings form rewrites the whole file from its own fields.
#[test]
fn test_site_config_form_round_trip() {
    let store = sample_site();
    let dashboard = Dashboard::new(&store);

    let mut form = SiteConfigForm::from_config(&dashboard.site_config());
    form.active_theme = Some("theme1".into());
    form.theme.font_body = "Inter".into();
    dashboard.update_site_config(&form).unwrap();

    let reread = SiteConfigForm::from_config(&dashboard.site_config());
    assert_eq!(reread, form);
}

/// Without a remote store, settings live in a local directory.
#[test]
fn test_local_fallback_session() {
    let dir = TempDir::new().unwrap();

    let settings = load_local(ConfigKey::AiSettings, dir.path());
    assert_eq!(settings.get_str("device"), Some("cpu"));

    update_local_setting(ConfigKey::AiSettings, "device", json!("mps"), dir.path()).unwrap();
    let settings = load_local(ConfigKey::AiSettings, dir.path());
    assert_eq!(settings.get_str("device"), Some("mps"));
}

/// Options built from the environment produce a usable client without any
/// request being made.
#[test]
fn test_github_store_from_lookup() {
    let options = StoreOptions::from_lookup(|key| match key {
        "GITHUB_TOKEN" => Some("t0k".to_string()),
        "REPO_NAME" => Some("acme/fynbos-blog".to_string()),
        "BRANCH" => Some("main".to_string()),
        _ => None,
    })
    .unwrap();

    let store = GitHubStore::new(options).unwrap();
    assert_eq!(store.options().repository(), "acme/fynbos-blog");
    assert_eq!(store.options().branch, "main");
    assert!(!format!("{store:?}").contains("t0k"));
}
