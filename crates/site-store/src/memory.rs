//! In-memory document store
//!
//! Behaves like the remote backend (version checks, directory listings,
//! commit history) without any I/O. Every call is recorded so tests can
//! assert exactly which remote operations a higher layer performed.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::document::{CommitSummary, DirEntry, Document, EntryKind, VersionToken};
use crate::path::{normalize_dir_path, normalize_file_path};
use crate::store::DocumentStore;
use crate::{Error, Result};

/// One recorded store operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Fetch {
        path: String,
    },
    Create {
        path: String,
        content: String,
        message: String,
    },
    Update {
        path: String,
        content: String,
        version: VersionToken,
        message: String,
    },
    Delete {
        path: String,
        version: VersionToken,
        message: String,
    },
    ListDirectory {
        path: String,
    },
    DispatchWorkflow {
        workflow: String,
    },
    LatestCommit,
}

impl StoreCall {
    /// Whether the call changes repository content
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::Create { .. } | Self::Update { .. } | Self::Delete { .. }
        )
    }
}

/// A commit produced by a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub sha: String,
    pub path: String,
    pub message: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug)]
struct Entry {
    content: String,
    version: VersionToken,
}

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<String, Entry>,
    revision: u64,
    calls: Vec<StoreCall>,
    commits: Vec<CommitRecord>,
    workflows: Vec<String>,
    fail_next: Option<Error>,
}

impl State {
    fn next_version(&mut self, content: &str) -> VersionToken {
        self.revision += 1;
        VersionToken::new(digest(&format!("{}:{content}", self.revision)))
    }

    fn commit(&mut self, path: &str, message: &str) {
        let sha = digest(&format!("commit:{}:{path}:{message}", self.revision));
        self.commits.push(CommitRecord {
            sha,
            path: path.to_string(),
            message: message.to_string(),
            date: Utc::now(),
        });
    }

    fn take_failure(&mut self) -> Result<()> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Thread-safe in-memory [`DocumentStore`]
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<State>,
    author: String,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            author: "site-manager".to_string(),
        }
    }

    /// Create a store pre-populated with `(path, content)` pairs
    pub fn with_documents<P, C>(documents: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<String>,
    {
        let store = Self::new();
        for (path, content) in documents {
            store.seed(path.as_ref(), content);
        }
        store
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write a file directly, bypassing version checks and the call log.
    ///
    /// Simulates a change made by someone else: any token handed out
    /// earlier for `path` becomes stale.
    pub fn seed(&self, path: &str, content: impl Into<String>) -> VersionToken {
        let path = path.trim_matches('/').to_string();
        let content = content.into();
        let mut state = self.state();
        let version = state.next_version(&content);
        state.files.insert(
            path,
            Entry {
                content,
                version: version.clone(),
            },
        );
        version
    }

    /// Remove a file directly, bypassing the call log
    pub fn remove(&self, path: &str) -> bool {
        self.state().files.remove(path.trim_matches('/')).is_some()
    }

    /// Make the next store call fail with `err`
    pub fn fail_next(&self, err: Error) {
        self.state().fail_next = Some(err);
    }

    pub fn content(&self, path: &str) -> Option<String> {
        self.state()
            .files
            .get(path.trim_matches('/'))
            .map(|e| e.content.clone())
    }

    pub fn version(&self, path: &str) -> Option<VersionToken> {
        self.state()
            .files
            .get(path.trim_matches('/'))
            .map(|e| e.version.clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.state().files.contains_key(path.trim_matches('/'))
    }

    pub fn paths(&self) -> Vec<String> {
        self.state().files.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Recorded calls that changed repository content
    pub fn writes(&self) -> Vec<StoreCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn commits(&self) -> Vec<CommitRecord> {
        self.state().commits.clone()
    }

    pub fn dispatched_workflows(&self) -> Vec<String> {
        self.state().workflows.clone()
    }
}

impl DocumentStore for MemoryStore {
    fn fetch(&self, path: &str) -> Result<Document> {
        let mut state = self.state();
        state.calls.push(StoreCall::Fetch {
            path: path.to_string(),
        });
        state.take_failure()?;

        let path = normalize_file_path(path)?;
        let entry = state
            .files
            .get(&path)
            .ok_or_else(|| Error::not_found(&path))?;
        Ok(Document::new(
            path.clone(),
            entry.content.clone(),
            entry.version.clone(),
        ))
    }

    fn create(&self, path: &str, content: &str, message: &str) -> Result<Document> {
        let mut state = self.state();
        state.calls.push(StoreCall::Create {
            path: path.to_string(),
            content: content.to_string(),
            message: message.to_string(),
        });
        state.take_failure()?;

        let path = normalize_file_path(path)?;
        if state.files.contains_key(&path) {
            return Err(Error::AlreadyExists { path });
        }

        let version = state.next_version(content);
        state.files.insert(
            path.clone(),
            Entry {
                content: content.to_string(),
                version: version.clone(),
            },
        );
        state.commit(&path, message);
        tracing::debug!(path = %path, version = %version, "Created document in memory");
        Ok(Document::new(path, content, version))
    }

    fn update(
        &self,
        path: &str,
        content: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<Document> {
        let mut state = self.state();
        state.calls.push(StoreCall::Update {
            path: path.to_string(),
            content: content.to_string(),
            version: version.clone(),
            message: message.to_string(),
        });
        state.take_failure()?;

        let path = normalize_file_path(path)?;
        match state.files.get(&path) {
            None => return Err(Error::not_found(path)),
            Some(entry) if entry.version != *version => {
                return Err(Error::VersionConflict { path });
            }
            Some(_) => {}
        }

        let next = state.next_version(content);
        state.files.insert(
            path.clone(),
            Entry {
                content: content.to_string(),
                version: next.clone(),
            },
        );
        state.commit(&path, message);
        tracing::debug!(path = %path, version = %next, "Updated document in memory");
        Ok(Document::new(path, content, next))
    }

    fn delete(&self, path: &str, version: &VersionToken, message: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(StoreCall::Delete {
            path: path.to_string(),
            version: version.clone(),
            message: message.to_string(),
        });
        state.take_failure()?;

        let path = normalize_file_path(path)?;
        match state.files.get(&path) {
            None => return Err(Error::not_found(path)),
            Some(entry) if entry.version != *version => {
                return Err(Error::VersionConflict { path });
            }
            Some(_) => {}
        }

        state.files.remove(&path);
        state.revision += 1;
        state.commit(&path, message);
        Ok(())
    }

    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>> {
        let mut state = self.state();
        state.calls.push(StoreCall::ListDirectory {
            path: path.to_string(),
        });
        state.take_failure()?;

        let dir = normalize_dir_path(path)?;
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };

        let mut children: BTreeMap<String, DirEntry> = BTreeMap::new();
        for (file_path, entry) in &state.files {
            let Some(rest) = file_path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((subdir, _)) => {
                    children.entry(subdir.to_string()).or_insert_with(|| {
                        let child = format!("{prefix}{subdir}");
                        DirEntry {
                            name: subdir.to_string(),
                            version: VersionToken::new(digest(&format!("dir:{child}"))),
                            path: child,
                            kind: EntryKind::Dir,
                            size: 0,
                        }
                    });
                }
                None => {
                    children.insert(
                        rest.to_string(),
                        DirEntry {
                            name: rest.to_string(),
                            path: file_path.clone(),
                            kind: EntryKind::File,
                            version: entry.version.clone(),
                            size: entry.content.len() as u64,
                        },
                    );
                }
            }
        }

        if children.is_empty() && !dir.is_empty() {
            return Err(Error::not_found(dir));
        }
        Ok(children.into_values().collect())
    }

    fn dispatch_workflow(&self, workflow: &str) -> Result<()> {
        let mut state = self.state();
        state.calls.push(StoreCall::DispatchWorkflow {
            workflow: workflow.to_string(),
        });
        state.take_failure()?;

        state.workflows.push(workflow.to_string());
        Ok(())
    }

    fn latest_commit(&self) -> Result<CommitSummary> {
        let mut state = self.state();
        state.calls.push(StoreCall::LatestCommit);
        state.take_failure()?;

        let head = state
            .commits
            .last()
            .ok_or_else(|| Error::not_found("HEAD"))?;
        Ok(CommitSummary::new(
            &head.sha,
            head.message.clone(),
            self.author.clone(),
            head.date,
        ))
    }
}

fn digest(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_seed_changes_version() {
        let store = MemoryStore::new();
        let first = store.seed("a.md", "same");
        let second = store.seed("a.md", "same");
        assert_ne!(first, second);
    }

    #[test]
    fn test_fetch_records_call() {
        let store = MemoryStore::with_documents([("about.html", "<p>hi</p>")]);
        let doc = store.fetch("/about.html").unwrap();
        assert_eq!(doc.path, "about.html");
        assert_eq!(
            store.calls(),
            vec![StoreCall::Fetch {
                path: "/about.html".into()
            }]
        );
    }

    #[test]
    fn test_fail_next_is_one_shot() {
        let store = MemoryStore::with_documents([("a.md", "x")]);
        store.fail_next(Error::transient("offline"));
        assert!(store.fetch("a.md").is_err());
        assert!(store.fetch("a.md").is_ok());
    }

    #[test]
    fn test_list_directory_groups_subdirectories() {
        let store = MemoryStore::with_documents([
            ("index.html", "i"),
            ("about.html", "a"),
            ("_posts/a.md", "p"),
            ("_posts/drafts/b.md", "d"),
        ]);

        let root = store.list_directory("").unwrap();
        let names: Vec<_> = root.iter().map(|e| (e.name.as_str(), e.kind)).collect();
        assert_eq!(
            names,
            vec![
                ("_posts", EntryKind::Dir),
                ("about.html", EntryKind::File),
                ("index.html", EntryKind::File),
            ]
        );

        let posts = store.list_directory("_posts").unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].path, "_posts/drafts");
    }

    #[test]
    fn test_list_missing_directory() {
        let store = MemoryStore::with_documents([("a.md", "x")]);
        assert!(store.list_directory("_posts").unwrap_err().is_not_found());
        assert!(store.list_directory("").unwrap().len() == 1);
    }

    #[test]
    fn test_latest_commit_follows_writes() {
        let store = MemoryStore::new().with_author("Ada");
        assert!(store.latest_commit().unwrap_err().is_not_found());

        store.create("a.md", "x", "Add a").unwrap();
        let head = store.latest_commit().unwrap();
        assert_eq!(head.message, "Add a");
        assert_eq!(head.author, "Ada");
        assert_eq!(head.sha.len(), 7);
    }
}
