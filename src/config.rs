use std::path::PathBuf;

use crate::models::Settings;
use crate::storage::{KeyValueStore, StorageError};

pub const APP_DIR_NAME: &str = "share-todo";
pub const DATA_DIR_ENV: &str = "SHARE_TODO_DATA_DIR";
pub const SETTINGS_KEY: &str = "settings";

/// Picks the data directory: an explicit path, then the environment override, then
/// `<platform data dir>/share-todo`.
pub fn resolve_data_dir(
    explicit: Option<PathBuf>,
    env_override: Option<String>,
    platform_data_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    explicit
        .or_else(|| {
            env_override
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| platform_data_dir.map(|dir| dir.join(APP_DIR_NAME)))
}

/// Settings never block startup: missing or unreadable settings fall back to defaults.
pub fn load_settings(backend: &impl KeyValueStore) -> Settings {
    let raw = match backend.get(SETTINGS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Settings::default(),
        Err(error) => {
            log::warn!("settings unavailable, using defaults: {error}");
            return Settings::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|error| {
        log::warn!("settings unreadable, using defaults: {error}");
        Settings::default()
    })
}

pub fn save_settings(
    backend: &impl KeyValueStore,
    settings: &Settings,
) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(settings)?;
    backend.set(SETTINGS_KEY, &json)
}
