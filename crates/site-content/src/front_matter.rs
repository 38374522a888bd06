//! Front matter codec
//!
//! Site files are stored as `---\n<yaml mapping>---\n\n<body>`. Parsing is
//! lenient: content that cannot be read as front matter comes back whole as
//! the body, and the reason is logged.

use serde_yaml::Value as YamlValue;

use crate::Metadata;
use crate::error::{Error, Result};

/// Delimiter opening and closing the metadata block.
pub const MARKER: &str = "---";

/// A document split into optional front matter and a body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredDocument {
    /// Metadata block, `None` when the content had no usable front matter
    pub metadata: Option<Metadata>,
    /// Everything after the closing marker, trimmed
    pub body: String,
}

impl StructuredDocument {
    /// Create a document with front matter
    pub fn new(metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            metadata: Some(metadata),
            body: body.into(),
        }
    }

    /// Create a document that is all body
    pub fn opaque(raw: impl Into<String>) -> Self {
        Self {
            metadata: None,
            body: raw.into(),
        }
    }

    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }

    /// Metadata, or an empty mapping when the document had none
    pub fn metadata_or_empty(&self) -> Metadata {
        self.metadata.clone().unwrap_or_default()
    }

    /// Look up a metadata value by key
    pub fn metadata_value(&self, key: &str) -> Option<&YamlValue> {
        self.metadata.as_ref()?.get(key)
    }

    /// Look up a string metadata value by key
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata_value(key)?.as_str()
    }

    /// Render back to raw text.
    ///
    /// Documents without metadata render as their body alone.
    pub fn to_text(&self) -> Result<String> {
        match &self.metadata {
            Some(metadata) => serialize(metadata, &self.body),
            None => Ok(self.body.clone()),
        }
    }
}

/// Parse raw content, degrading to an all-body document on malformed input.
pub fn parse(raw: &str) -> StructuredDocument {
    match try_parse(raw) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(error = %e, "Unusable front matter, treating content as body");
            StructuredDocument::opaque(raw)
        }
    }
}

/// Parse raw content, reporting malformed front matter as an error.
///
/// Content that does not start with [`MARKER`] is not an error: it is
/// returned as an all-body document.
pub fn try_parse(raw: &str) -> Result<StructuredDocument> {
    if !raw.starts_with(MARKER) {
        return Ok(StructuredDocument::opaque(raw));
    }

    let mut parts = raw.splitn(3, MARKER);
    let (Some(_), Some(header), Some(body)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::UnterminatedFrontMatter);
    };

    Ok(StructuredDocument {
        metadata: Some(decode_metadata(header)?),
        body: body.trim().to_string(),
    })
}

/// Render metadata and body as a front matter document.
///
/// Keys are emitted in the mapping's order, in block style. The body is
/// appended verbatim; the marker is not escaped inside it.
pub fn serialize(metadata: &Metadata, body: &str) -> Result<String> {
    let mut out = String::with_capacity(body.len() + 64);
    out.push_str(MARKER);
    out.push('\n');

    // serde_yaml renders an empty mapping in flow style as `{}`
    if !metadata.is_empty() {
        let yaml =
            serde_yaml::to_string(metadata).map_err(|e| Error::serialize("YAML", e.to_string()))?;
        out.push_str(&yaml);
        if !yaml.ends_with('\n') {
            out.push('\n');
        }
    }

    out.push_str(MARKER);
    out.push_str("\n\n");
    out.push_str(body);
    Ok(out)
}

fn decode_metadata(header: &str) -> Result<Metadata> {
    if header.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: YamlValue =
        serde_yaml::from_str(header).map_err(|e| Error::parse("YAML", e.to_string()))?;

    match value {
        YamlValue::Mapping(mapping) => Ok(mapping),
        YamlValue::Null => Ok(Metadata::new()),
        other => Err(Error::NotAMapping {
            found: describe(&other).to_string(),
        }),
    }
}

fn describe(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a sequence",
        YamlValue::Mapping(_) => "a mapping",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        let mut map = Metadata::new();
        for (k, v) in pairs {
            map.insert((*k).into(), (*v).into());
        }
        map
    }

    #[test]
    fn test_parse_without_marker_is_all_body() {
        let doc = parse("no marker here");
        assert_eq!(doc.metadata, None);
        assert_eq!(doc.body, "no marker here");
    }

    #[test]
    fn test_parse_unterminated_marker_is_all_body() {
        let raw = "---\ntitle: Hello\nno closing marker";
        let doc = parse(raw);
        assert_eq!(doc.metadata, None);
        assert_eq!(doc.body, raw);
        assert!(matches!(
            try_parse(raw),
            Err(Error::UnterminatedFrontMatter)
        ));
    }

    #[test]
    fn test_parse_trims_body() {
        let doc = parse("---\ntitle: Hello\n---\n\n  Body text  \n\n");
        assert_eq!(doc.metadata_str("title"), Some("Hello"));
        assert_eq!(doc.body, "Body text");
    }

    #[test]
    fn test_parse_malformed_yaml_is_all_body() {
        let raw = "---\ntitle: [unclosed\n---\nbody";
        let doc = parse(raw);
        assert!(!doc.has_metadata());
        assert_eq!(doc.body, raw);
        assert!(matches!(try_parse(raw), Err(Error::ParseError { .. })));
    }

    #[test]
    fn test_parse_scalar_front_matter_is_all_body() {
        let raw = "---\njust a sentence\n---\nbody";
        assert!(matches!(try_parse(raw), Err(Error::NotAMapping { .. })));
        assert_eq!(parse(raw).body, raw);
    }

    #[test]
    fn test_parse_empty_front_matter() {
        let doc = parse("---\n---\n\nbody");
        assert_eq!(doc.metadata, Some(Metadata::new()));
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn test_serialize_layout() {
        let text = serialize(&metadata(&[("layout", "post"), ("title", "Hello")]), "Body").unwrap();
        assert_eq!(text, "---\nlayout: post\ntitle: Hello\n---\n\nBody");
    }

    #[test]
    fn test_serialize_empty_metadata() {
        let text = serialize(&Metadata::new(), "Body").unwrap();
        assert_eq!(text, "---\n---\n\nBody");
    }

    #[test]
    fn test_to_text_without_metadata_is_body() {
        let doc = StructuredDocument::opaque("plain");
        assert_eq!(doc.to_text().unwrap(), "plain");
    }
}
