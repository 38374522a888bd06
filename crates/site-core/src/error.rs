//! Error types for site-core

use site_store::ErrorKind;

/// Result type for site-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in dashboard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] site_store::Error),

    #[error(transparent)]
    Config(#[from] site_config::Error),

    #[error(transparent)]
    Content(#[from] site_content::Error),

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Section '{section}' not found in {path}")]
    SectionNotFound { path: String, section: String },
}

impl Error {
    /// Store error kind, wherever in the stack it came from
    pub fn store_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Store(e) => Some(e.kind()),
            Self::Config(e) => e.store_kind(),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.store_kind() == Some(ErrorKind::VersionConflict)
    }

    pub fn is_not_found(&self) -> bool {
        self.store_kind() == Some(ErrorKind::NotFound)
    }

    /// Short message suitable for showing to the person who made the edit
    pub fn user_message(&self) -> String {
        match self.store_kind() {
            Some(ErrorKind::VersionConflict) => {
                return "This file was changed by someone else since you opened it. \
                        Reload it and apply your changes again."
                    .to_string();
            }
            Some(ErrorKind::NotFound) => return "The file could not be found.".to_string(),
            Some(ErrorKind::AlreadyExists) => return "A file with that name already exists.".to_string(),
            Some(ErrorKind::Transient) => {
                return "Could not reach the repository. Try again in a moment.".to_string();
            }
            _ => {}
        }

        match self {
            Self::MissingField { .. } => "Missing required fields".to_string(),
            Self::SectionNotFound { section, .. } => {
                format!("The '{section}' section is missing from the layout.")
            }
            Self::Config(site_config::Error::InvalidSetting { field, message }) => {
                format!("Invalid {field}: {message}")
            }
            _ => "Error saving changes".to_string(),
        }
    }
}
