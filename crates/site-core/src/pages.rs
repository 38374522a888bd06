//! Standalone pages and the home page about section

use std::sync::LazyLock;

use regex::Regex;
use site_content::{Metadata, extract_named_section, has_named_section, replace_named_section};
use site_store::{Document, DocumentStore, VersionToken};

use crate::dashboard::{ContentEntry, Dashboard, non_empty, stamp};
use crate::{Error, Result};

/// Title used when the about page form leaves it blank
pub const DEFAULT_ABOUT_TITLE: &str = "About Our Blog";

/// Home layouts written before named sections existed
static LEGACY_ABOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<h1><u>About</u></h1>\s*<p>(.*?)</p>").expect("valid regex")
});

/// Submitted page edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageForm {
    pub title: String,
    pub description: String,
    pub content: String,
    /// Background image; the configured default when absent
    pub background: Option<String>,
    pub version: Option<VersionToken>,
}

impl PageForm {
    fn front_matter(&self, title: &str, default_background: &str) -> Metadata {
        let background = non_empty(self.background.as_deref()).unwrap_or(default_background);
        let mut metadata = Metadata::new();
        metadata.insert("layout".into(), "page".into());
        metadata.insert("title".into(), title.into());
        metadata.insert("description".into(), self.description.as_str().into());
        metadata.insert("background".into(), background.into());
        metadata
    }
}

impl<S: DocumentStore> Dashboard<S> {
    /// HTML files at the repository root, excluding the index
    pub fn list_pages(&self) -> Result<Vec<ContentEntry>> {
        let pages = self
            .store()
            .list_directory("")?
            .into_iter()
            .filter(|e| e.is_file())
            .filter(|e| e.name.ends_with(".html") && e.name != "index.html")
            .map(ContentEntry::from)
            .collect();
        Ok(pages)
    }

    /// Rewrite a page from its edit form
    pub fn update_page(&self, path: &str, form: &PageForm) -> Result<Document> {
        let title = non_empty(Some(form.title.as_str())).ok_or(Error::MissingField { field: "title" })?;
        let message = format!("Update page: {title} - {}", stamp());
        self.write_page(path, title, form, &message)
    }

    /// Rewrite the about page; a blank title falls back to the default
    pub fn update_about_page(&self, form: &PageForm) -> Result<Document> {
        let title = non_empty(Some(form.title.as_str())).unwrap_or(DEFAULT_ABOUT_TITLE);
        let message = format!("Update about page - {}", stamp());
        self.write_page(&self.options().about_page, title, form, &message)
    }

    fn write_page(
        &self,
        path: &str,
        title: &str,
        form: &PageForm,
        message: &str,
    ) -> Result<Document> {
        let version = form
            .version
            .as_ref()
            .ok_or(Error::MissingField { field: "version" })?;

        let metadata = form.front_matter(title, &self.options().default_background);
        let text = site_content::serialize(&metadata, &form.content)?;
        let saved = self.store().update(path, &text, version, message)?;
        tracing::info!(path, "Updated page");
        Ok(saved)
    }

    /// Current text of the home page about section.
    ///
    /// Falls back to the legacy heading-and-paragraph markup, then to an
    /// empty string.
    pub fn home_about(&self) -> Result<String> {
        let layout = self.store().fetch(&self.options().home_layout)?;
        if let Some(text) = extract_named_section(&layout.content, &self.options().about_section) {
            return Ok(text);
        }

        let legacy = LEGACY_ABOUT
            .captures(&layout.content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());
        if legacy.is_some() {
            tracing::debug!(path = %layout.path, "Using legacy about markup");
        }
        Ok(legacy.unwrap_or_default())
    }

    /// Replace the home page about section
    pub fn update_home_about(&self, text: &str) -> Result<Document> {
        let options = self.options();
        let layout = self.store().fetch(&options.home_layout)?;
        if !has_named_section(&layout.content, &options.about_section) {
            return Err(Error::SectionNotFound {
                path: layout.path,
                section: options.about_section.clone(),
            });
        }

        let updated = replace_named_section(&layout.content, &options.about_section, text);
        let message = format!("Update home about section - {}", stamp());
        let saved = self
            .store()
            .update(&layout.path, &updated, &layout.version, &message)?;
        tracing::info!(path = %saved.path, "Updated home about section");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_about_pattern() {
        let html = "<h1><u>About</u></h1>\n  <p>We grow\nthings.</p>";
        let caps = LEGACY_ABOUT.captures(html).unwrap();
        assert_eq!(&caps[1], "We grow\nthings.");
    }

    #[test]
    fn test_page_front_matter_default_background() {
        let form = PageForm {
            description: "Who we are".into(),
            ..PageForm::default()
        };
        let metadata = form.front_matter("About", "/img/bg.jpg");
        assert_eq!(
            metadata.get("background").and_then(|v| v.as_str()),
            Some("/img/bg.jpg")
        );
        assert_eq!(
            metadata.get("layout").and_then(|v| v.as_str()),
            Some("page")
        );
    }
}
