//! Effective settings objects

use serde_json::{Map, Value};
use site_store::Document;

use crate::registry::ConfigKey;

/// Registry defaults overridden by whatever the persisted document holds
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    key: ConfigKey,
    values: Map<String, Value>,
}

impl Settings {
    /// The default mapping for `key`
    pub fn defaults(key: ConfigKey) -> Self {
        Self {
            key,
            values: key.defaults(),
        }
    }

    /// Shallow merge of `persisted` over the defaults for `key`.
    ///
    /// Persisted keys win, including ones the defaults do not know about.
    pub fn merged(key: ConfigKey, persisted: Map<String, Value>) -> Self {
        let mut values = key.defaults();
        values.extend(persisted);
        Self { key, values }
    }

    pub fn key(&self) -> ConfigKey {
        self.key
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_values(self) -> Map<String, Value> {
        self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// Look up a nested value by dotted path, e.g. `search.delay`
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = self.values.get(parts.next()?)?;
        parts.try_fold(first, |value, part| value.get(part))
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    /// Keys present here that the registry defaults do not define
    pub fn unknown_keys(&self) -> Vec<&str> {
        let defaults = self.key.defaults();
        self.values
            .keys()
            .filter(|k| !defaults.contains_key(*k))
            .map(String::as_str)
            .collect()
    }

    /// Reliability score of `domain` from a `domain_reliability` mapping.
    ///
    /// Categories are searched in key order; the first hit wins.
    pub fn domain_score(&self, domain: &str) -> Option<f64> {
        self.values
            .values()
            .filter_map(Value::as_object)
            .find_map(|category| category.get(domain))
            .and_then(Value::as_f64)
    }
}

/// Restrict `values` to the default keys of `key`, filling gaps from defaults
pub fn filter_to_defaults(key: ConfigKey, values: &Map<String, Value>) -> Map<String, Value> {
    key.defaults()
        .into_iter()
        .map(|(name, default)| {
            let value = values.get(&name).cloned().unwrap_or(default);
            (name, value)
        })
        .collect()
}

/// Result of [`crate::SettingsManager::load`]
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// The fetched document, absent when defaults were used
    pub source: Option<Document>,
}

impl LoadedSettings {
    pub fn is_persisted(&self) -> bool {
        self.source.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_prefers_persisted() {
        let settings = Settings::merged(
            ConfigKey::AiSettings,
            object(json!({"device": "cuda", "custom": 5})),
        );
        assert_eq!(settings.get_str("device"), Some("cuda"));
        assert_eq!(settings.get_i64("max_articles_per_run"), Some(1));
        assert_eq!(settings.get_i64("custom"), Some(5));
        assert_eq!(settings.unknown_keys(), vec!["custom"]);
    }

    #[test]
    fn test_merge_is_shallow() {
        let settings = Settings::merged(
            ConfigKey::SearchConfig,
            object(json!({"search": {"delay": 3.0}})),
        );
        assert_eq!(settings.lookup("search.delay"), Some(&json!(3.0)));
        assert_eq!(settings.lookup("search.max_sources"), None);
    }

    #[test]
    fn test_filter_to_defaults() {
        let values = object(json!({"device": "mps", "unexpected_key": 1}));
        let filtered = filter_to_defaults(ConfigKey::AiSettings, &values);
        assert!(!filtered.contains_key("unexpected_key"));
        assert_eq!(filtered["device"], "mps");
        assert_eq!(filtered["fetch_images"], true);
        assert_eq!(filtered.len(), ConfigKey::AiSettings.defaults().len());
    }

    #[test]
    fn test_domain_score() {
        let settings = Settings::defaults(ConfigKey::DomainReliability);
        assert_eq!(settings.domain_score("kew.org"), Some(0.95));
        assert_eq!(settings.domain_score("sanbi.org"), Some(0.98));
        assert_eq!(settings.domain_score("example.com"), None);
    }

    #[test]
    fn test_lookup_top_level() {
        let settings = Settings::defaults(ConfigKey::App);
        assert_eq!(settings.lookup("version"), Some(&json!("4.0")));
        assert_eq!(settings.lookup("output.posts_directory"), Some(&json!("_posts")));
    }
}
