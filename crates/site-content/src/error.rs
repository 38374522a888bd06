//! Error types for site-content

/// Result type for site-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in site-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("Front matter opened with '---' but never closed")]
    UnterminatedFrontMatter,

    #[error("Front matter must be a mapping, found {found}")]
    NotAMapping { found: String },

    #[error("Failed to serialize {format} content: {message}")]
    SerializeError { format: String, message: String },
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn serialize(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SerializeError {
            format: format.into(),
            message: message.into(),
        }
    }
}
