//! Settings file loading.
//!
//! Settings come from, lowest to highest precedence: built-in defaults, a
//! JSON settings file, then command-line flags. Every source is sanitized.
//! A field with the wrong type keeps its default; an unparseable file is
//! reported and replaced by the defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::Settings;

/// Application directory under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "pomoflow";

/// Settings file name inside [`CONFIG_DIR_NAME`].
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Errors from loading a settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid settings JSON.
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Returns true if the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Returns a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Read { .. } => "check the path passed to --config",
            Self::Parse { .. } => "fix the JSON syntax or delete the file to use defaults",
        }
    }
}

/// Returns the default settings file path, if a config directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(SETTINGS_FILE_NAME))
}

/// Loads and sanitizes settings from a JSON file.
///
/// Missing fields take their defaults. A field whose value does not fit its
/// type is logged and keeps its default.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not JSON.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "Settings file loaded");
    Ok(settings_from_value(value).sanitized(&Settings::default()))
}

/// Overlays the file's fields on the defaults one at a time.
fn settings_from_value(value: Value) -> Settings {
    let Value::Object(fields) = value else {
        warn!("Settings file is not a JSON object, using defaults");
        return Settings::default();
    };
    let mut merged = match serde_json::to_value(Settings::default()) {
        Ok(Value::Object(defaults)) => defaults,
        _ => return Settings::default(),
    };

    for (key, field) in fields {
        if !merged.contains_key(&key) {
            debug!(%key, "Unknown setting ignored");
            continue;
        }
        let mut candidate: Map<String, Value> = merged.clone();
        candidate.insert(key.clone(), field);
        match serde_json::from_value::<Settings>(Value::Object(candidate.clone())) {
            Ok(_) => merged = candidate,
            Err(e) => warn!(%key, "Invalid setting ignored, keeping default: {}", e),
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}

/// Resolves the file-level settings.
///
/// An explicit path must exist. Without one, the default path is used when
/// present and built-in defaults otherwise. A file that is not JSON is
/// logged and replaced by the defaults.
///
/// # Errors
///
/// Returns an error if the chosen file cannot be read.
pub fn resolve_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let loaded = match explicit {
        Some(path) => load_settings(path),
        None => match default_config_path() {
            Some(path) if path.is_file() => load_settings(&path),
            _ => {
                debug!("No settings file, using defaults");
                return Ok(Settings::default());
            }
        },
    };

    match loaded {
        Err(e @ ConfigError::Parse { .. }) => {
            warn!("{} ({}), using defaults", e, e.suggestion());
            Ok(Settings::default())
        }
        other => other,
    }
}
