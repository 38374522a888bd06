//! Local disk fallback for settings documents
//!
//! Used when no remote store is configured. Files live directly in the given
//! directory under their registry file names.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde_json::{Map, Value};

use crate::registry::ConfigKey;
use crate::settings::{Settings, filter_to_defaults};
use crate::{Error, Result};

/// Path of the local copy of `key` inside `dir`
pub fn local_path(key: ConfigKey, dir: &Path) -> PathBuf {
    dir.join(key.entry().file_name)
}

/// Effective settings from the local copy, or the defaults.
///
/// Like the remote load this never fails; problems are logged.
pub fn load_local(key: ConfigKey, dir: &Path) -> Settings {
    let path = local_path(key, dir);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Local settings not found, using defaults");
            return Settings::defaults(key);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read local settings");
            return Settings::defaults(key);
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(persisted)) => Settings::merged(key, persisted),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "Local settings are not a JSON object");
            Settings::defaults(key)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Malformed local settings");
            Settings::defaults(key)
        }
    }
}

/// Write `values` (filtered to the registry defaults) to the local copy
pub fn save_local(key: ConfigKey, values: &Map<String, Value>, dir: &Path) -> Result<PathBuf> {
    let filtered = filter_to_defaults(key, values);
    let content = serde_json::to_string_pretty(&Value::Object(filtered))
        .map_err(|e| Error::serialize("json", e))?;
    let path = local_path(key, dir);
    write_atomic(&path, content.as_bytes())?;
    tracing::info!(%key, path = %path.display(), "Saved local settings");
    Ok(path)
}

/// Load the local copy, change one setting, write it back
pub fn update_local_setting(key: ConfigKey, name: &str, value: Value, dir: &Path) -> Result<Settings> {
    if !key.defaults().contains_key(name) {
        return Err(Error::UnknownSetting {
            key: key.to_string(),
            name: name.to_string(),
        });
    }

    let mut settings = load_local(key, dir);
    settings.set(name, value);
    save_local(key, settings.values(), dir)?;
    Ok(Settings::merged(key, filter_to_defaults(key, settings.values())))
}

/// Write `content` via a locked temp file renamed over `path`
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;
    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}
