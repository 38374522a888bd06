//! Error types for site-store

/// Result type for site-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of a store failure, for callers that branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    VersionConflict,
    Transient,
    MalformedContent,
    InvalidConfig,
    InvalidPath,
}

/// Errors that can occur in site-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Document not found: {path}")]
    NotFound { path: String },

    #[error("Document already exists: {path}")]
    AlreadyExists { path: String },

    /// The version token is stale: the document changed since it was read.
    #[error("Version conflict on {path}: the document changed since it was read")]
    VersionConflict { path: String },

    #[error("Remote store request failed: {message}")]
    Transient { message: String },

    #[error("Malformed content at {path}: {message}")]
    MalformedContent { path: String, message: String },

    #[error("Invalid store configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid document path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl Error {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedContent {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::VersionConflict { .. } => ErrorKind::VersionConflict,
            Self::Transient { .. } => ErrorKind::Transient,
            Self::MalformedContent { .. } => ErrorKind::MalformedContent,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::InvalidPath { .. } => ErrorKind::InvalidPath,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::VersionConflict
    }
}
