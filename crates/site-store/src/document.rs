//! Documents, directory entries and version tokens

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of one revision of a remote file.
///
/// Required to update or delete the file; a token from an older revision is
/// rejected with [`crate::Error::VersionConflict`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for VersionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A file in the remote store at a specific revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Path within the repository (unique key)
    pub path: String,
    /// Raw UTF-8 content
    pub content: String,
    /// Revision token for optimistic concurrency
    pub version: VersionToken,
}

impl Document {
    pub fn new(path: impl Into<String>, content: impl Into<String>, version: VersionToken) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            version,
        }
    }

    /// Parse the content as a front matter document
    pub fn structured(&self) -> site_content::StructuredDocument {
        site_content::parse(&self.content)
    }

    /// File name component of the path
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    pub version: VersionToken,
    /// Size in bytes; zero for directories
    pub size: u64,
}

impl DirEntry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Lowercased extension of the entry name, if any
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .filter(|(stem, _)| !stem.is_empty())
            .map(|(_, ext)| ext.to_lowercase())
    }
}

/// Head commit of the configured branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Abbreviated commit id (seven characters)
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
}

impl CommitSummary {
    /// Build a summary, abbreviating the commit id
    pub fn new(
        sha: &str,
        message: impl Into<String>,
        author: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            sha: sha.chars().take(7).collect(),
            message: message.into(),
            author: author.into(),
            date,
        }
    }
}
