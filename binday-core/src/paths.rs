//! Platform directories for settings, persisted records, and logs.

use std::path::PathBuf;

const APP_DIR: &str = "binday";

/// Directory holding `settings.toml` and the config record.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("/tmp/binday-config"))
}

/// Directory holding the schedule snapshot.
#[must_use]
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("/tmp/binday-cache"))
}

/// Directory for logs and exported calendars.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("/tmp/binday-data"))
}

/// Optional user settings (`config_dir()/settings.toml`).
#[must_use]
pub fn settings_file() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Persisted property selection (`config_dir()/config.json`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.json")
}

/// Persisted schedule snapshot (`cache_dir()/cache.json`).
#[must_use]
pub fn cache_file() -> PathBuf {
    cache_dir().join("cache.json")
}

/// Log files (`data_dir()/logs/`).
#[must_use]
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Calendar export target (`data_dir()/bin_collection.ics`).
#[must_use]
pub fn calendar_file() -> PathBuf {
    data_dir().join("bin_collection.ics")
}
