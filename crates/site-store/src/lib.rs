//! Versioned remote document store for Site Manager
//!
//! A [`DocumentStore`] reads and writes UTF-8 files on one branch of a
//! remote repository. Every read returns a [`VersionToken`]; writes to an
//! existing file must present the token from their own read and fail with
//! [`Error::VersionConflict`] when it is stale.
//!
//! Two backends are provided:
//!
//! - [`GitHubStore`] talks to the GitHub contents API
//! - [`MemoryStore`] keeps everything in memory and records each call

pub mod document;
pub mod error;
pub mod github;
pub mod memory;
pub mod options;
pub mod path;
pub mod store;

pub use document::{CommitSummary, DirEntry, Document, EntryKind, VersionToken};
pub use error::{Error, ErrorKind, Result};
pub use github::GitHubStore;
pub use memory::{CommitRecord, MemoryStore, StoreCall};
pub use options::StoreOptions;
pub use path::{normalize_dir_path, normalize_file_path, parent_dir};
pub use store::DocumentStore;

pub use site_content::{extract_named_section, has_named_section, replace_named_section};
