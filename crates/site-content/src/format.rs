//! Format detection and YAML normalization

use serde_yaml::Value as YamlValue;

/// File formats found in a static-site repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Markdown,
    Html,
    Yaml,
    Json,
    PlainText,
}

impl DocumentFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "html" | "htm" => Some(Self::Html),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "txt" | "text" => Some(Self::PlainText),
            _ => None,
        }
    }

    /// Detect format from the extension of a repository path
    pub fn from_path(path: &str) -> Option<Self> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Self::from_extension(ext)
    }

    /// Whether files of this format carry front matter on a static site
    pub fn supports_front_matter(&self) -> bool {
        matches!(self, Self::Markdown | Self::Html)
    }

    /// Get default file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Markdown => &["md", "markdown"],
            Self::Html => &["html", "htm"],
            Self::Yaml => &["yaml", "yml"],
            Self::Json => &["json"],
            Self::PlainText => &["txt", "text"],
        }
    }
}

/// Convert a YAML value to JSON with mapping keys sorted.
///
/// Non-string scalar keys are rendered to strings; tags are dropped.
pub fn yaml_to_json(value: &YamlValue) -> serde_json::Value {
    match value {
        YamlValue::Null => serde_json::Value::Null,
        YamlValue::Bool(b) => serde_json::Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_json::Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                serde_json::Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            } else {
                serde_json::Value::Null
            }
        }
        YamlValue::String(s) => serde_json::Value::String(s.clone()),
        YamlValue::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(yaml_to_json).collect())
        }
        YamlValue::Mapping(map) => {
            let mut entries: Vec<(String, serde_json::Value)> = map
                .iter()
                .filter_map(|(k, v)| key_to_string(k).map(|k| (k, yaml_to_json(v))))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            serde_json::Value::Object(entries.into_iter().collect())
        }
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn key_to_string(key: &YamlValue) -> Option<String> {
    match key {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Bool(b) => Some(b.to_string()),
        YamlValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
