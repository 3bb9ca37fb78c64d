//! Persisted records and their JSON file store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{PropertyId, Schedule, ScheduleSource};
use crate::ports::{PortError, StatePort};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// The property being tracked and when setup finished.
pub struct ConfigRecord {
    /// Sole key used for schedule refresh.
    pub property_id: PropertyId,
    /// Whether setup ran to completion.
    pub setup_completed: bool,
    /// When setup finished.
    pub setup_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Last successfully resolved schedule.
pub struct ScheduleSnapshot {
    /// Property the schedule belongs to.
    pub property_id: PropertyId,
    /// Resolved collection dates.
    pub collections: Schedule,
    /// Whether the dates were listed or derived from the collection weekday.
    pub source: ScheduleSource,
    /// Listed entries dropped during resolution.
    #[serde(default)]
    pub discarded: usize,
    /// When the schedule was fetched.
    pub cached_at: DateTime<Utc>,
}

/// Stores each record as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config_path: PathBuf,
    cache_path: PathBuf,
}

impl JsonFileStore {
    /// Store writing the config record and the snapshot to the given files.
    #[must_use]
    pub fn new<C: Into<PathBuf>, S: Into<PathBuf>>(config_path: C, cache_path: S) -> Self {
        Self {
            config_path: config_path.into(),
            cache_path: cache_path.into(),
        }
    }

    /// Store using the platform config and cache directories.
    #[must_use]
    pub fn in_default_dirs() -> Self {
        Self::new(crate::paths::config_file(), crate::paths::cache_file())
    }

    /// Location of the config record.
    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Location of the schedule snapshot.
    #[must_use]
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}

impl StatePort for JsonFileStore {
    fn load_config(&self) -> Result<Option<ConfigRecord>, PortError> {
        read_json(&self.config_path)
    }

    fn save_config(&self, config: &ConfigRecord) -> Result<(), PortError> {
        write_json(&self.config_path, config)
    }

    fn load_snapshot(&self) -> Result<Option<ScheduleSnapshot>, PortError> {
        read_json(&self.cache_path)
    }

    fn save_snapshot(&self, snapshot: &ScheduleSnapshot) -> Result<(), PortError> {
        write_json(&self.cache_path, snapshot)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PortError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

// Writes to a sibling temp file first so a crash never leaves a truncated record behind.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PortError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, contents)?;
    fs::rename(&staging, path)?;
    debug!(path = %path.display(), "saved record");
    Ok(())
}
