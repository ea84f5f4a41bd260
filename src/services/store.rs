//! Flat-file JSON persistence for the timer and alarm lists
//!
//! The store keeps no state of its own: every call reads or rewrites the
//! whole document at the given path.

use std::{fs, path::Path};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

pub const TIMERS_FILE: &str = "timers.json";
pub const ALARMS_FILE: &str = "alarms.json";

/// A persisted record that can check its own invariants after loading
pub trait Record {
    fn is_valid(&self) -> bool;
}

/// Load the list stored at `path`.
///
/// Missing, unreadable or malformed files, and files holding any record
/// that fails validation, all load as an empty list.
pub fn load<T>(path: &Path) -> Vec<T>
where
    T: DeserializeOwned + Record,
{
    if !path.exists() {
        debug!("No saved data at {}", path.display());
        return Vec::new();
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let records: Vec<T> = match serde_json::from_str(&contents) {
        Ok(records) => records,
        Err(e) => {
            warn!("Ignoring malformed data in {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    if records.iter().any(|record| !record.is_valid()) {
        warn!("Ignoring {}: it contains invalid records", path.display());
        return Vec::new();
    }

    debug!("Loaded {} records from {}", records.len(), path.display());
    records
}

/// Overwrite `path` with the full list, creating parent directories first
pub fn save<T: Serialize>(path: &Path, records: &[T]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    debug!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}
