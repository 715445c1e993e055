//! File-backed activity state persistence.
//!
//! Reads and writes the single record in `state.json`. The UI server reads,
//! the `set-state` CLI writes, and a reader that finds a stale working state
//! writes the auto-idle record back.
//!
//! # File Format
//!
//! ```json
//! {
//!   "state": "writing",
//!   "detail": "在写热点日报模板...",
//!   "progress": 40,
//!   "updated_at": "2026-01-30T12:00:00.000000+08:00",
//!   "ttl_seconds": 60
//! }
//! ```
//!
//! # Defensive Design
//!
//! Other tools edit this file by hand or with scripts, so on load we handle:
//! - Missing files (default idle record)
//! - Empty files (default idle record)
//! - Corrupt JSON (default idle record, log warning)
//! - Valid JSON that is not an object (same)
//!
//! Any JSON object is kept. Fields of the wrong type are coerced or defaulted
//! one at a time (see [`StateRecord`]), never by discarding the record.
//!
//! # Atomic Writes
//!
//! Uses temp file + rename so a poller never sees a half-written record.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{OfficeError, Result};

use super::decay::{self, Verdict};
use super::types::{StateRecord, StateUpdate};

/// Result of a raw load: the record plus whether it came from the fallback.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LoadedRecord {
    pub record: StateRecord,
    pub defaulted: bool,
}

/// Handle to the persisted activity record.
///
/// Cheap to clone; holds only the file path. Each call is its own
/// read-modify-write cycle and the last complete write wins.
#[derive(Debug, Clone)]
pub struct StateStore {
    file_path: PathBuf,
}

impl StateStore {
    /// Creates a handle without touching the filesystem.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        StateStore {
            file_path: file_path.into(),
        }
    }

    /// Creates a handle and seeds the default idle record if no file exists yet.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(file_path);
        if !store.file_path.exists() {
            let record = StateRecord::default_idle(Local::now());
            store.save(&record)?;
            debug!(path = %store.file_path.display(), "Seeded default state file");
        }
        Ok(store)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the current record, resetting a stale working state to idle.
    ///
    /// Never fails: unreadable storage yields the default idle record.
    pub fn read_current_state(&self) -> StateRecord {
        self.read_current_state_at(Local::now())
    }

    pub(crate) fn read_current_state_at(&self, now: DateTime<Local>) -> StateRecord {
        let LoadedRecord { record, defaulted } = self.load_at(now);
        if defaulted {
            debug!(path = %self.file_path.display(), "Serving default idle record");
        }

        let Verdict::Expired { age_secs, ttl_secs } = decay::evaluate(&record, now) else {
            return record;
        };

        info!(
            previous_state = %record.state,
            updated_at = record.updated_at.as_deref().unwrap_or(""),
            age_secs,
            ttl_secs,
            "Working state expired, returning to idle"
        );

        let mut idle = record;
        idle.mark_auto_idle(now);

        // Persisting is best-effort: readers still get the idle record.
        if let Err(err) = self.save(&idle) {
            warn!(error = %err, "Failed to persist auto-idle state");
        }

        idle
    }

    /// Replaces state and detail (and progress/TTL when given), stamps
    /// `updated_at`, and persists the whole record. Returns what was written.
    pub fn write_state(&self, update: StateUpdate) -> Result<StateRecord> {
        self.write_state_at(update, Local::now())
    }

    pub(crate) fn write_state_at(
        &self,
        update: StateUpdate,
        now: DateTime<Local>,
    ) -> Result<StateRecord> {
        // Raw load: no auto-idle here, the caller is about to overwrite state anyway.
        let LoadedRecord { mut record, .. } = self.load_at(now);
        record.apply(update, now);
        self.save(&record)?;
        debug!(state = %record.state, "State written");
        Ok(record)
    }

    /// Loads the record without auto-idle, substituting the default on any failure.
    pub(crate) fn load_at(&self, now: DateTime<Local>) -> LoadedRecord {
        match self.try_load() {
            Ok(Some(record)) => LoadedRecord {
                record,
                defaulted: false,
            },
            Ok(None) => LoadedRecord {
                record: StateRecord::default_idle(now),
                defaulted: true,
            },
            Err(reason) => {
                warn!(
                    path = %self.file_path.display(),
                    reason = %reason,
                    "Unusable state file, using default idle record"
                );
                LoadedRecord {
                    record: StateRecord::default_idle(now),
                    defaulted: true,
                }
            }
        }
    }

    /// `Ok(None)` means there is simply nothing on disk yet.
    fn try_load(&self) -> std::result::Result<Option<StateRecord>, String> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = fs_err::read_to_string(&self.file_path).map_err(|e| e.to_string())?;

        if content.trim().is_empty() {
            return Err("empty file".to_string());
        }

        let value: Value =
            serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {}", e))?;

        if !value.is_object() {
            return Err("top-level value is not an object".to_string());
        }

        serde_json::from_value::<StateRecord>(value)
            .map(Some)
            .map_err(|e| format!("unexpected record shape: {}", e))
    }

    fn save(&self, record: &StateRecord) -> Result<()> {
        let mut content =
            serde_json::to_string_pretty(record).map_err(|source| OfficeError::Json {
                context: "Failed to serialize state record".to_string(),
                source,
            })?;
        content.push('\n');

        let parent_dir = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs_err::create_dir_all(&parent_dir)
            .map_err(|e| OfficeError::persistence(&self.file_path, e))?;

        let mut temp_file = NamedTempFile::new_in(&parent_dir)
            .map_err(|e| OfficeError::persistence(&self.file_path, e))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| OfficeError::persistence(&self.file_path, e))?;
        temp_file
            .flush()
            .map_err(|e| OfficeError::persistence(&self.file_path, e))?;
        temp_file
            .persist(&self.file_path)
            .map_err(|e| OfficeError::persistence(&self.file_path, e.error))?;

        Ok(())
    }
}
