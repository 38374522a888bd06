//! Remote-backed settings manager

use chrono::Utc;
use serde_json::{Map, Value};
use site_store::{Document, DocumentStore};

use crate::registry::{ConfigKey, RegistryEntry, entries};
use crate::settings::{LoadedSettings, Settings, filter_to_defaults};
use crate::{Error, Result};

/// A whole settings document for raw editing
#[derive(Debug, Clone)]
pub struct RawConfig {
    /// Parsed content, `None` when the document is not valid JSON
    pub value: Option<Value>,
    pub source: Document,
}

impl RawConfig {
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
}

/// State of one registry document, for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigState {
    /// Present and a JSON object
    Loaded,
    /// No document at the remote path
    Missing,
    /// Present but not a JSON object
    Invalid,
    /// The store could not be reached
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct ConfigStatus {
    pub entry: &'static RegistryEntry,
    pub state: ConfigState,
}

/// Loads and saves registry settings documents through a [`DocumentStore`].
///
/// Holds no state besides the store; every call reads the current remote
/// document.
#[derive(Debug, Clone)]
pub struct SettingsManager<S> {
    store: S,
}

impl<S: DocumentStore> SettingsManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Effective settings for `key`.
    ///
    /// Never fails: a missing, unreadable or malformed document yields the
    /// defaults with no source, and the reason is logged.
    pub fn load(&self, key: ConfigKey) -> LoadedSettings {
        let path = key.remote_path();
        let defaults = || LoadedSettings {
            settings: Settings::defaults(key),
            source: None,
        };

        let document = match self.store.fetch(&path) {
            Ok(document) => document,
            Err(e) if e.is_not_found() => {
                tracing::debug!(%key, path = %path, "Settings document not found, using defaults");
                return defaults();
            }
            Err(e) => {
                tracing::warn!(%key, path = %path, error = %e, "Failed to fetch settings, using defaults");
                return defaults();
            }
        };

        match parse_object(key, &document.content) {
            Ok(persisted) => LoadedSettings {
                settings: Settings::merged(key, persisted),
                source: Some(document),
            },
            Err(e) => {
                tracing::warn!(%key, path = %path, error = %e, "Malformed settings document, using defaults");
                defaults()
            }
        }
    }

    /// Persist `values` for `key`.
    ///
    /// Only keys defined by the registry defaults are written; missing ones
    /// are filled from the defaults. Updates `source` when given, otherwise
    /// creates the document.
    pub fn save(
        &self,
        key: ConfigKey,
        values: &Map<String, Value>,
        source: Option<&Document>,
    ) -> Result<Document> {
        let filtered = filter_to_defaults(key, values);
        let dropped: Vec<&String> = values.keys().filter(|k| !filtered.contains_key(*k)).collect();
        if !dropped.is_empty() {
            tracing::debug!(%key, ?dropped, "Dropping unrecognized settings on save");
        }

        let content = to_pretty_json(&Value::Object(filtered))?;
        let message = commit_message(key);
        let path = key.remote_path();

        let saved = self
            .store
            .write(&path, &content, source.map(|d| &d.version), &message)
            .inspect_err(|e| tracing::warn!(%key, error = %e, "Failed to save settings"))?;
        tracing::info!(%key, path = %path, "Saved settings");
        Ok(saved)
    }

    /// Load, change one setting, save
    pub fn update_setting(&self, key: ConfigKey, name: &str, value: Value) -> Result<Document> {
        if !key.defaults().contains_key(name) {
            return Err(Error::UnknownSetting {
                key: key.to_string(),
                name: name.to_string(),
            });
        }

        let LoadedSettings {
            mut settings,
            source,
        } = self.load(key);
        settings.set(name, value);
        self.save(key, settings.values(), source.as_ref())
    }

    /// Fetch the whole document for `key` without merging defaults.
    ///
    /// A document that is not valid JSON is still returned with its source,
    /// so [`replace_document`](Self::replace_document) can overwrite it.
    pub fn load_document(&self, key: ConfigKey) -> Result<RawConfig> {
        let path = key.remote_path();
        let source = self.store.fetch(&path)?;
        let value = match serde_json::from_str::<Value>(&source.content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%key, path = %path, error = %e, "Settings document is not valid JSON");
                None
            }
        };
        Ok(RawConfig { value, source })
    }

    /// Overwrite the whole document for `key` with `value`.
    ///
    /// Unlike [`save`](Self::save) nothing is filtered; the document must
    /// already exist.
    pub fn replace_document(&self, key: ConfigKey, value: &Value, source: &Document) -> Result<Document> {
        if !value.is_object() {
            return Err(Error::NotAnObject {
                key: key.to_string(),
                found: json_type(value).to_string(),
            });
        }

        let content = to_pretty_json(value)?;
        let saved = self.store.update(
            &key.remote_path(),
            &content,
            &source.version,
            &commit_message(key),
        )?;
        tracing::info!(%key, "Replaced settings document");
        Ok(saved)
    }

    /// Status of every registry document
    pub fn overview(&self) -> Vec<ConfigStatus> {
        entries()
            .iter()
            .map(|entry| {
                let state = match self.store.fetch(&entry.remote_path()) {
                    Ok(doc) => match parse_object(entry.key, &doc.content) {
                        Ok(_) => ConfigState::Loaded,
                        Err(_) => ConfigState::Invalid,
                    },
                    Err(e) if e.is_not_found() => ConfigState::Missing,
                    Err(e) => {
                        tracing::warn!(key = %entry.key, error = %e, "Failed to fetch settings document");
                        ConfigState::Unavailable
                    }
                };
                ConfigStatus { entry, state }
            })
            .collect()
    }
}

fn parse_object(key: ConfigKey, content: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| site_store::Error::malformed(key.remote_path(), e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::NotAnObject {
            key: key.to_string(),
            found: json_type(&other).to_string(),
        }),
    }
}

fn to_pretty_json(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::serialize("json", e))
}

fn commit_message(key: ConfigKey) -> String {
    format!("Update {key} - {}", Utc::now().format("%Y-%m-%d %H:%M"))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
