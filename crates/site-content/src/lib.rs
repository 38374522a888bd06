//! Content parsing and editing for Site Manager
//!
//! Converts raw repository files into structured documents (YAML front
//! matter plus body) and back, and edits marker-delimited sections in place.

pub mod error;
pub mod format;
pub mod front_matter;
pub mod section;

pub use error::{Error, Result};
pub use format::{DocumentFormat, yaml_to_json};
pub use front_matter::{MARKER, StructuredDocument, parse, serialize, try_parse};
pub use section::{extract_named_section, has_named_section, replace_named_section};

/// Ordered key/value metadata carried in a document's front matter.
pub type Metadata = serde_yaml::Mapping;
