//! Dashboard service object and cross-cutting operations

use chrono::Utc;
use serde::Serialize;
use site_config::{SettingsManager, SiteConfigManager};
use site_content::{DocumentFormat, Metadata, yaml_to_json};
use site_store::{CommitSummary, DirEntry, Document, DocumentStore, VersionToken};

use crate::Result;
use crate::options::DashboardOptions;

/// A listed post or page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    pub version: VersionToken,
    pub size: u64,
}

impl From<DirEntry> for ContentEntry {
    fn from(entry: DirEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            version: entry.version,
            size: entry.size,
        }
    }
}

/// Landing page data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub recent_posts: Vec<ContentEntry>,
    pub pages: Vec<ContentEntry>,
    pub total_posts: usize,
}

/// A fetched file split into front matter and body, ready for an edit form
#[derive(Debug, Clone, PartialEq)]
pub struct EditableDocument {
    pub path: String,
    pub format: Option<DocumentFormat>,
    /// Front matter; empty when the file has none
    pub metadata: Metadata,
    pub body: String,
    /// Token the edit form must send back with its save
    pub version: VersionToken,
}

impl EditableDocument {
    fn from_document(document: Document) -> Self {
        let structured = document.structured();
        Self {
            format: DocumentFormat::from_path(&document.path),
            metadata: structured.metadata_or_empty(),
            body: structured.body,
            path: document.path,
            version: document.version,
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// Front matter as JSON, for API responses
    pub fn metadata_json(&self) -> serde_json::Value {
        yaml_to_json(&serde_yaml::Value::Mapping(self.metadata.clone()))
    }
}

/// Request-scoped entry point for every dashboard operation.
///
/// Built explicitly around a store and handed to whatever serves requests;
/// it caches nothing between calls.
#[derive(Debug, Clone)]
pub struct Dashboard<S> {
    store: S,
    options: DashboardOptions,
}

impl<S: DocumentStore> Dashboard<S> {
    pub fn new(store: S) -> Self {
        Self::with_options(store, DashboardOptions::default())
    }

    pub fn with_options(store: S, options: DashboardOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    pub(crate) fn settings(&self) -> SettingsManager<&S> {
        SettingsManager::new(&self.store)
    }

    pub(crate) fn site_config_manager(&self) -> SiteConfigManager<&S> {
        SiteConfigManager::new(&self.store)
    }

    /// Recent posts, all pages and the post count
    pub fn summary(&self) -> Result<DashboardSummary> {
        let posts = self.list_posts()?;
        let pages = self.list_pages()?;
        let total_posts = posts.len();

        Ok(DashboardSummary {
            recent_posts: posts.into_iter().take(self.options.recent_posts).collect(),
            pages,
            total_posts,
        })
    }

    /// Fetch a file and split its front matter for editing
    pub fn open(&self, path: &str) -> Result<EditableDocument> {
        let document = self.store.fetch(path)?;
        Ok(EditableDocument::from_document(document))
    }

    /// Head commit of the site branch
    pub fn sync_check(&self) -> Result<CommitSummary> {
        Ok(self.store.latest_commit()?)
    }
}

/// Minute-resolution timestamp appended to commit messages
pub(crate) fn stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M").to_string()
}

/// Today's date as written into post front matter
pub(crate) fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Trimmed, non-empty form value
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  x ")), Some("x"));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_editable_document_without_front_matter() {
        let doc = EditableDocument::from_document(Document::new(
            "notes.txt",
            "plain text",
            VersionToken::new("v1"),
        ));
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "plain text");
        assert_eq!(doc.format, Some(DocumentFormat::PlainText));
    }

    #[test]
    fn test_metadata_json() {
        let doc = EditableDocument::from_document(Document::new(
            "_posts/a.md",
            "---\ntitle: Hello\ntags: [a, b]\n---\n\nBody",
            VersionToken::new("v1"),
        ));
        assert_eq!(doc.field("title"), Some("Hello"));
        assert_eq!(doc.metadata_json()["tags"][1], "b");
    }
}
