//! Static registry of settings documents
//!
//! Each [`ConfigKey`] names one JSON document under [`REMOTE_DIR`] together
//! with the default mapping that fills in whatever the persisted copy
//! leaves out. The registry is read-only data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::Error;

/// Remote directory holding the settings documents
pub const REMOTE_DIR: &str = "flask_app/research_v4";

/// Recognized settings documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKey {
    AiSettings,
    ArticleConfig,
    SearchConfig,
    #[serde(rename = "config")]
    App,
    DomainReliability,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 5] = [
        ConfigKey::AiSettings,
        ConfigKey::ArticleConfig,
        ConfigKey::SearchConfig,
        ConfigKey::App,
        ConfigKey::DomainReliability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiSettings => "ai_settings",
            Self::ArticleConfig => "article_config",
            Self::SearchConfig => "search_config",
            Self::App => "config",
            Self::DomainReliability => "domain_reliability",
        }
    }

    /// Registry entry for this key
    pub fn entry(self) -> &'static RegistryEntry {
        match self {
            Self::AiSettings => &REGISTRY[0],
            Self::ArticleConfig => &REGISTRY[1],
            Self::SearchConfig => &REGISTRY[2],
            Self::App => &REGISTRY[3],
            Self::DomainReliability => &REGISTRY[4],
        }
    }

    /// Remote path of the backing document
    pub fn remote_path(self) -> String {
        self.entry().remote_path()
    }

    /// Fresh copy of the default mapping
    pub fn defaults(self) -> Map<String, Value> {
        default_settings(self)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownKey { key: s.to_string() })
    }
}

/// Descriptive metadata for one settings document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub key: ConfigKey,
    pub file_name: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    /// Top-level fields the dashboard exposes for editing
    pub editable_fields: &'static [&'static str],
}

impl RegistryEntry {
    pub fn remote_path(&self) -> String {
        format!("{REMOTE_DIR}/{}", self.file_name)
    }

    pub fn is_editable(&self, field: &str) -> bool {
        self.editable_fields.contains(&field)
    }
}

static REGISTRY: [RegistryEntry; 5] = [
    RegistryEntry {
        key: ConfigKey::AiSettings,
        file_name: ".ai_settings.json",
        label: "AI Settings",
        icon: "fa-robot",
        description: "Configure embedding and LLM models, device settings, and generation parameters",
        editable_fields: &[
            "include_front_matter",
            "fetch_images",
            "embedding_model",
            "llm_model",
            "config_path",
            "database_path",
            "device",
            "load_in_8bit",
            "max_articles_per_run",
        ],
    },
    RegistryEntry {
        key: ConfigKey::ArticleConfig,
        file_name: "article_config.json",
        label: "Article Configuration",
        icon: "fa-newspaper",
        description: "Manage article templates, headings, image settings, and content cleaning rules",
        editable_fields: &["headings", "image_settings", "content_cleaning"],
    },
    RegistryEntry {
        key: ConfigKey::SearchConfig,
        file_name: "search_config.json",
        label: "Search Configuration",
        icon: "fa-search",
        description: "Configure search strategy, domains, and research questions for article generation",
        editable_fields: &[
            "search",
            "supported_extensions",
            "skip_domains",
            "search_strategy",
            "questions",
        ],
    },
    RegistryEntry {
        key: ConfigKey::App,
        file_name: "config.json",
        label: "Application Config",
        icon: "fa-cogs",
        description: "API settings, scraping configuration, and output preferences",
        editable_fields: &["api", "scraping", "output"],
    },
    RegistryEntry {
        key: ConfigKey::DomainReliability,
        file_name: "domain_reliability.json",
        label: "Domain Reliability Scores",
        icon: "fa-globe",
        description: "Source reliability ratings for different domains and research sources",
        editable_fields: &[
            "south_african",
            "international_botanical",
            "educational",
            "general_gardening",
        ],
    },
];

/// All registry entries, in display order
pub fn entries() -> &'static [RegistryEntry] {
    &REGISTRY
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn default_settings(key: ConfigKey) -> Map<String, Value> {
    let value = match key {
        ConfigKey::AiSettings => json!({
            "include_front_matter": true,
            "fetch_images": true,
            "embedding_model": "all-MiniLM-L6-v2",
            "llm_model": "LiquidAI/LFM2-1.2B-RAG",
            "config_path": "research_v4/article_config.json",
            "database_path": "research_v4/flora_data.db",
            "device": "cpu",
            "load_in_8bit": false,
            "max_articles_per_run": 1,
            "search_config_path": "research_v4/search_config.json"
        }),
        ConfigKey::App => json!({
            "app_name": "South African Flora Research System",
            "version": "4.0",
            "debug": false,
            "logging": {
                "level": "INFO",
                "format": "%(asctime)s - %(name)s - %(levelname)s - %(message)s"
            },
            "api": {
                "serpapi_key_env": "SERP_API_KEY",
                "request_timeout": 30,
                "retry_attempts": 3,
                "retry_delay": 2
            },
            "scraping": {
                "delay_between_requests": 1.5,
                "max_sources": 20,
                "request_headers": {
                    "User-Agent": "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                }
            },
            "output": {
                "posts_directory": "_posts",
                "enable_preview": true,
                "save_json": true
            }
        }),
        ConfigKey::SearchConfig => json!({
            "search": {
                "delay": 1.5,
                "max_sources": 20,
                "add_search_terms": false
            },
            "supported_extensions": [".html", ".htm", ".php", ".asp", ".aspx", ".pdf", ".txt"],
            "unsupported_extensions": [
                ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".rar", ".tar", ".gz",
                ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".mp4", ".avi", ".mov", ".mp3", ".wav"
            ],
            "skip_domains": ["pinterest.com", "youtube.com", "amazon.com", "ebay.com"],
            "search_strategy": {
                "prioritize_sa": true,
                "sa_domains_first": true,
                "general_sa_second": true,
                "international_last": true
            },
            "questions": [
                "what are the benefits",
                "interesting facts",
                "care and cultivation guide",
                "what does it look like physical description"
            ]
        }),
        ConfigKey::DomainReliability => json!({
            "south_african": {
                "up.ac.za": 0.98, "uct.ac.za": 0.98, "wits.ac.za": 0.98,
                "sun.ac.za": 0.98, "ru.ac.za": 0.97, "ukzn.ac.za": 0.97,
                "ufs.ac.za": 0.97, "unisa.ac.za": 0.96, "nwu.ac.za": 0.96,
                "sanbi.org": 0.98, "sanbi.org.za": 0.98, "plantzafrica.com": 0.97,
                "ispotnature.org": 0.95, "biodiversityadvisor.sanbi.org": 0.97,
                "redlist.sanbi.org": 0.97, "pza.sanbi.org": 0.97
            },
            "international_botanical": {
                "en.wikipedia.org": 0.93, "kew.org": 0.95, "powo.science.kew.org": 0.95,
                "missouribotanicalgarden.org": 0.88, "britannica.com": 0.87, "rhs.org.uk": 0.86
            },
            "educational": {
                "extension.wisc.edu": 0.80, "ces.ncsu.edu": 0.80, "extension.umn.edu": 0.80
            },
            "general_gardening": {
                "thespruce.com": 0.70, "plants.usda.gov": 0.85, "plantnet.rbgsyd.nsw.gov.au": 0.82
            }
        }),
        ConfigKey::ArticleConfig => json!({
            "headings": [
                {
                    "title": "The Complete Guide to {plant_name}",
                    "subtitle": "Discover the facts, care tips, and benefits of this remarkable plant"
                },
                {
                    "title": "Everything You Need to Know About {plant_name}",
                    "subtitle": "A comprehensive guide to growing and caring for this beautiful species"
                },
                {
                    "title": "{plant_name}: Nature's Hidden Treasure",
                    "subtitle": "Uncover the secrets of this extraordinary South African plant"
                },
                {
                    "title": "Growing {plant_name}: Expert Tips and Insights",
                    "subtitle": "Master the art of cultivating this stunning native plant"
                },
                {
                    "title": "{plant_name} Revealed",
                    "subtitle": "Explore the fascinating world of this unique botanical specimen"
                }
            ],
            "image_settings": {
                "width": 800,
                "height": 600,
                "default_fallback": "/img/posts/default-plant.jpg"
            },
            "content_cleaning": {
                "remove_source_markers": true,
                "remove_incomplete_paragraphs": true,
                "min_paragraph_length": 50,
                "remove_citations": true
            }
        }),
    };
    object(value)
}
