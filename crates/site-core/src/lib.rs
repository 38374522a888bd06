//! Dashboard operations for Site Manager
//!
//! [`Dashboard`] turns edit-form submissions into store calls: it builds
//! front matter with `site-content`, persists through a `site-store`
//! [`DocumentStore`](site_store::DocumentStore) and reads settings through
//! `site-config`.
//!
//! ```text
//!                 request handlers
//!                        |
//!                    site-core
//!                        |
//!          +-------------+-------------+
//!          |             |             |
//!    site-content    site-store    site-config
//! ```
//!
//! Every operation reads current remote state. Saves pass along the version
//! token their edit form was rendered with, so a concurrent change shows up
//! as a conflict ([`Error::is_conflict`]) instead of being overwritten.

pub mod dashboard;
pub mod error;
pub mod generation;
pub mod options;
pub mod pages;
pub mod posts;
pub mod site;

pub use dashboard::{ContentEntry, Dashboard, DashboardSummary, EditableDocument};
pub use error::{Error, Result};
pub use generation::GenerationRun;
pub use options::DashboardOptions;
pub use pages::{DEFAULT_ABOUT_TITLE, PageForm};
pub use posts::{POST_EXTENSIONS, PostForm};
pub use site::{SiteConfigForm, THEME1, ThemeFooter, ThemeSettings};
