//! Layered settings for Site Manager
//!
//! Settings documents are JSON objects stored at fixed remote paths (see
//! [`registry`]). Loading merges the persisted object over the registry
//! defaults and never fails; saving writes back only the keys the defaults
//! define, using the version token from the load.
//!
//! The static site's own `_config.yml` is handled by [`SiteConfigManager`],
//! and [`local`] provides an on-disk fallback when no remote store is
//! configured.

pub mod ai;
pub mod error;
pub mod local;
pub mod manager;
pub mod registry;
pub mod settings;
pub mod site;

pub use ai::{AiSettings, Device, MAX_ARTICLES_RANGE};
pub use error::{Error, Result};
pub use local::{load_local, save_local, update_local_setting};
pub use manager::{ConfigState, ConfigStatus, RawConfig, SettingsManager};
pub use registry::{ConfigKey, REMOTE_DIR, RegistryEntry};
pub use settings::{LoadedSettings, Settings, filter_to_defaults};
pub use site::{SITE_CONFIG_PATH, SiteConfig, SiteConfigManager};
