//! Static-site `_config.yml`

use serde_yaml::{Mapping, Value};
use site_store::{Document, DocumentStore};

use crate::{Error, Result};

/// Location of the site generator configuration
pub const SITE_CONFIG_PATH: &str = "_config.yml";

/// `_config.yml` as loaded
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    pub settings: Mapping,
    pub source: Option<Document>,
}

impl SiteConfig {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }
}

/// Reads and writes `_config.yml` through a [`DocumentStore`]
#[derive(Debug, Clone)]
pub struct SiteConfigManager<S> {
    store: S,
}

impl<S: DocumentStore> SiteConfigManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the mapping; empty when the file is absent or unreadable.
    ///
    /// A file that exists but does not hold a mapping is still returned as
    /// the source so that a later save updates it in place.
    pub fn load(&self) -> SiteConfig {
        let source = match self.store.fetch_optional(SITE_CONFIG_PATH) {
            Ok(Some(document)) => document,
            Ok(None) => {
                tracing::debug!("No site configuration found");
                return SiteConfig::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch site configuration");
                return SiteConfig::default();
            }
        };

        let settings = match serde_yaml::from_str::<Value>(&source.content) {
            Ok(Value::Mapping(mapping)) => mapping,
            Ok(Value::Null) => Mapping::new(),
            Ok(_) => {
                tracing::warn!("Site configuration is not a mapping, starting empty");
                Mapping::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Malformed site configuration, starting empty");
                Mapping::new()
            }
        };

        SiteConfig {
            settings,
            source: Some(source),
        }
    }

    /// Serialize `settings` and write it, creating the file when `source`
    /// is absent
    pub fn save(&self, settings: &Mapping, source: Option<&Document>) -> Result<Document> {
        let content = serde_yaml::to_string(settings).map_err(|e| Error::serialize("yaml", e))?;
        let saved = self.store.write(
            SITE_CONFIG_PATH,
            &content,
            source.map(|d| &d.version),
            "Update site configuration",
        )?;
        tracing::info!(version = %saved.version, "Saved site configuration");
        Ok(saved)
    }
}
