//! Blog posts

use site_content::Metadata;
use site_store::{Document, DocumentStore, VersionToken};

use crate::dashboard::{ContentEntry, Dashboard, non_empty, stamp, today};
use crate::{Error, Result};

/// Extensions the site generator renders as posts
pub const POST_EXTENSIONS: &[&str] = &["html", "md", "markdown"];

/// Submitted post edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    /// Token from the fetch that populated the form
    pub version: Option<VersionToken>,
    /// `YYYY-MM-DD`; today when absent
    pub date: Option<String>,
    pub description: Option<String>,
    pub categories: Option<String>,
}

impl PostForm {
    /// Front matter in the order the site templates expect
    pub fn front_matter(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("layout".into(), "post".into());
        metadata.insert("title".into(), self.title.trim().into());
        let date = non_empty(self.date.as_deref()).map_or_else(today, str::to_string);
        metadata.insert("date".into(), date.into());
        if let Some(description) = non_empty(self.description.as_deref()) {
            metadata.insert("description".into(), description.into());
        }
        if let Some(categories) = non_empty(self.categories.as_deref()) {
            metadata.insert("categories".into(), categories.into());
        }
        metadata
    }
}

impl<S: DocumentStore> Dashboard<S> {
    /// Posts in the posts directory, newest file name first.
    ///
    /// A missing posts directory is an empty blog, not an error.
    pub fn list_posts(&self) -> Result<Vec<ContentEntry>> {
        let entries = match self.store().list_directory(&self.options().posts_dir) {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => {
                tracing::debug!(dir = %self.options().posts_dir, "Posts directory not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut posts: Vec<ContentEntry> = entries
            .into_iter()
            .filter(|e| e.is_file())
            .filter(|e| {
                e.extension()
                    .is_some_and(|ext| POST_EXTENSIONS.contains(&ext.as_str()))
            })
            .map(ContentEntry::from)
            .collect();
        posts.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(posts)
    }

    /// Rewrite a post from its edit form
    pub fn update_post(&self, path: &str, form: &PostForm) -> Result<Document> {
        if form.title.trim().is_empty() {
            return Err(Error::MissingField { field: "title" });
        }
        if form.content.trim().is_empty() {
            return Err(Error::MissingField { field: "content" });
        }
        let version = form
            .version
            .as_ref()
            .ok_or(Error::MissingField { field: "version" })?;

        let text = site_content::serialize(&form.front_matter(), &form.content)?;
        let message = format!("Update post: {} - {}", form.title.trim(), stamp());
        let saved = self.store().update(path, &text, version, &message)?;
        tracing::info!(path, "Updated post");
        Ok(saved)
    }

    /// Delete a post at its current version
    pub fn delete_post(&self, path: &str) -> Result<()> {
        let current = self.store().fetch(path)?;
        let message = format!("Delete post: {path} - {}", stamp());
        self.store().delete(path, &current.version, &message)?;
        tracing::info!(path, "Deleted post");
        Ok(())
    }
}
