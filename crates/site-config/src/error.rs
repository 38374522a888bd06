//! Error types for site-config

use std::path::PathBuf;

/// Result type for site-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in site-config operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] site_store::Error),

    #[error("Unknown config key: {key}")]
    UnknownKey { key: String },

    #[error("'{name}' is not a recognized setting of {key}")]
    UnknownSetting { key: String, name: String },

    #[error("{key} must be a JSON object, found {found}")]
    NotAnObject { key: String, found: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidSetting { field: String, message: String },

    #[error("Failed to serialize {format}: {message}")]
    Serialize { format: String, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn serialize(format: &str, message: impl ToString) -> Self {
        Self::Serialize {
            format: format.to_string(),
            message: message.to_string(),
        }
    }

    /// Store error kind, when the failure came from the remote store
    pub fn store_kind(&self) -> Option<site_store::ErrorKind> {
        match self {
            Self::Store(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Whether the save lost an optimistic-concurrency race
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_conflict())
    }
}
