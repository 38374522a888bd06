//! Typed view of the article-generation settings

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::ConfigKey;
use crate::settings::Settings;
use crate::{Error, Result};

/// Inclusive bounds of `max_articles_per_run`
pub const MAX_ARTICLES_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Compute device used to load the models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    Cuda,
    Mps,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Cuda => "cuda",
            Self::Mps => "mps",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda),
            "mps" => Ok(Self::Mps),
            other => Err(Error::invalid(
                "device",
                format!("'{other}' is not one of cpu, cuda, mps"),
            )),
        }
    }
}

/// Settings consumed by the article-generation workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSettings {
    pub include_front_matter: bool,
    pub fetch_images: bool,
    pub embedding_model: String,
    pub llm_model: String,
    pub config_path: String,
    pub database_path: String,
    pub device: Device,
    pub load_in_8bit: bool,
    pub max_articles_per_run: u32,
    pub search_config_path: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            include_front_matter: true,
            fetch_images: true,
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            llm_model: "LiquidAI/LFM2-1.2B-RAG".to_string(),
            config_path: "research_v4/article_config.json".to_string(),
            database_path: "research_v4/flora_data.db".to_string(),
            device: Device::Cpu,
            load_in_8bit: false,
            max_articles_per_run: 1,
            search_config_path: "research_v4/search_config.json".to_string(),
        }
    }
}

impl AiSettings {
    /// Read the typed view out of effective `ai_settings`.
    ///
    /// Never fails: a field whose stored value has the wrong type falls
    /// back to its default. Out-of-range values are kept as stored so the
    /// edit form shows them; only [`validate`](Self::validate) rejects them.
    pub fn from_settings(settings: &Settings) -> Self {
        let defaults = Self::default();
        let parsed = Self {
            include_front_matter: field(settings, "include_front_matter", defaults.include_front_matter),
            fetch_images: field(settings, "fetch_images", defaults.fetch_images),
            embedding_model: field(settings, "embedding_model", defaults.embedding_model),
            llm_model: field(settings, "llm_model", defaults.llm_model),
            config_path: field(settings, "config_path", defaults.config_path),
            database_path: field(settings, "database_path", defaults.database_path),
            device: field(settings, "device", defaults.device),
            load_in_8bit: field(settings, "load_in_8bit", defaults.load_in_8bit),
            max_articles_per_run: field(settings, "max_articles_per_run", defaults.max_articles_per_run),
            search_config_path: field(settings, "search_config_path", defaults.search_config_path),
        };
        if let Err(e) = parsed.validate() {
            tracing::warn!(key = %ConfigKey::AiSettings, error = %e, "Stored AI settings are out of range");
        }
        parsed
    }

    /// Convert back to an untyped settings object
    pub fn to_settings(&self) -> Result<Settings> {
        match serde_json::to_value(self) {
            Ok(Value::Object(values)) => Ok(Settings::merged(ConfigKey::AiSettings, values)),
            Ok(_) => Err(Error::serialize("json", "settings did not serialize to an object")),
            Err(e) => Err(Error::serialize("json", e)),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !MAX_ARTICLES_RANGE.contains(&self.max_articles_per_run) {
            return Err(Error::invalid(
                "max_articles_per_run",
                format!(
                    "must be between {} and {}, got {}",
                    MAX_ARTICLES_RANGE.start(),
                    MAX_ARTICLES_RANGE.end(),
                    self.max_articles_per_run
                ),
            ));
        }
        for (field, value) in [
            ("embedding_model", &self.embedding_model),
            ("llm_model", &self.llm_model),
        ] {
            if value.trim().is_empty() {
                return Err(Error::invalid(field, "must not be empty"));
            }
        }
        Ok(())
    }
}

fn field<T: DeserializeOwned>(settings: &Settings, name: &str, default: T) -> T {
    let Some(value) = settings.get(name) else {
        return default;
    };
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(key = %ConfigKey::AiSettings, setting = name, error = %e, "Unreadable setting, using default");
            default
        }
    }
}
