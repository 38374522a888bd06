//! Document store trait

use crate::document::{CommitSummary, DirEntry, Document, VersionToken};
use crate::{Error, Result};

/// Path-addressed CRUD against one repository branch.
///
/// Writes use optimistic concurrency: `update` and `delete` take the
/// [`VersionToken`] from a `fetch` made in the same logical operation, and
/// fail with [`Error::VersionConflict`] when the file has changed since.
/// Implementations never cache or infer tokens and never retry.
pub trait DocumentStore {
    /// Fetch the current content and version of a file
    fn fetch(&self, path: &str) -> Result<Document>;

    /// Create a file that must not already exist
    fn create(&self, path: &str, content: &str, message: &str) -> Result<Document>;

    /// Replace a file's content, given its current version
    fn update(
        &self,
        path: &str,
        content: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<Document>;

    /// Delete a file, given its current version
    fn delete(&self, path: &str, version: &VersionToken, message: &str) -> Result<()>;

    /// List the immediate children of a directory
    ///
    /// The empty path lists the repository root.
    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>>;

    /// Trigger a workflow run on the configured branch
    fn dispatch_workflow(&self, workflow: &str) -> Result<()>;

    /// Head commit of the configured branch
    fn latest_commit(&self) -> Result<CommitSummary>;

    /// Fetch a file, mapping `NotFound` to `None`
    fn fetch_optional(&self, path: &str) -> Result<Option<Document>> {
        match self.fetch(path) {
            Ok(document) => Ok(Some(document)),
            Err(Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Update when a version is supplied, create otherwise
    fn write(
        &self,
        path: &str,
        content: &str,
        version: Option<&VersionToken>,
        message: &str,
    ) -> Result<Document> {
        match version {
            Some(version) => self.update(path, content, version, message),
            None => self.create(path, content, message),
        }
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn fetch(&self, path: &str) -> Result<Document> {
        (**self).fetch(path)
    }

    fn create(&self, path: &str, content: &str, message: &str) -> Result<Document> {
        (**self).create(path, content, message)
    }

    fn update(
        &self,
        path: &str,
        content: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<Document> {
        (**self).update(path, content, version, message)
    }

    fn delete(&self, path: &str, version: &VersionToken, message: &str) -> Result<()> {
        (**self).delete(path, version, message)
    }

    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>> {
        (**self).list_directory(path)
    }

    fn dispatch_workflow(&self, workflow: &str) -> Result<()> {
        (**self).dispatch_workflow(workflow)
    }

    fn latest_commit(&self) -> Result<CommitSummary> {
        (**self).latest_commit()
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for Box<T> {
    fn fetch(&self, path: &str) -> Result<Document> {
        (**self).fetch(path)
    }

    fn create(&self, path: &str, content: &str, message: &str) -> Result<Document> {
        (**self).create(path, content, message)
    }

    fn update(
        &self,
        path: &str,
        content: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<Document> {
        (**self).update(path, content, version, message)
    }

    fn delete(&self, path: &str, version: &VersionToken, message: &str) -> Result<()> {
        (**self).delete(path, version, message)
    }

    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>> {
        (**self).list_directory(path)
    }

    fn dispatch_workflow(&self, workflow: &str) -> Result<()> {
        (**self).dispatch_workflow(workflow)
    }

    fn latest_commit(&self) -> Result<CommitSummary> {
        (**self).latest_commit()
    }
}
