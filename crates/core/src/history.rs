//! Capped diagnosis history.
//!
//! The history is a single JSON blob (newest entry first, at most [`HISTORY_LIMIT`] entries)
//! kept under [`HISTORY_STORAGE_KEY`] in a [`HistoryStore`]. Entries are immutable once
//! written. A store that is not available reads as an empty history.
//!
//! Appends within one process are serialised; separate processes writing the same store can
//! still race on truncation.

use crate::constants::{HISTORY_LIMIT, HISTORY_STORAGE_KEY};
use crate::disease::{DiagnosisResult, ResultError};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use sidia_types::NonEmptyText;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("history storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize history: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("stored history is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("invalid diagnosis result: {0}")]
    InvalidResult(#[from] ResultError),
    #[error("internal lock error")]
    LockPoisoned,
}

/// One saved diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryLog {
    #[schema(value_type = String)]
    pub id: Uuid,
    /// Creation time as Unix milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub timestamp: DateTime<Utc>,
    pub patient_name: String,
    pub result: DiagnosisResult,
}

impl HistoryLog {
    fn matches(&self, needle: &str) -> bool {
        if self.patient_name.to_lowercase().contains(needle) {
            return true;
        }
        if self
            .result
            .disease_name()
            .is_some_and(|name| name.to_lowercase().contains(needle))
        {
            return true;
        }
        let date = self.timestamp.date_naive();
        date.format("%d/%m/%Y").to_string().contains(needle)
            || date.format("%Y-%m-%d").to_string().contains(needle)
    }
}

/// Keyed blob storage backing the history.
pub trait HistoryStore: Send + Sync {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, HistoryError>;
    fn set(&self, key: &str, value: &str) -> Result<(), HistoryError>;
    fn remove(&self, key: &str) -> Result<(), HistoryError>;
}

/// Stores each key as `<dir>/<key>.json`.
///
/// The directory must already exist; otherwise every operation reports
/// `HistoryError::StorageUnavailable`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the directory if needed before returning the store.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, HistoryError> {
        if !self.dir.is_dir() {
            return Err(HistoryError::StorageUnavailable(format!(
                "directory does not exist: {}",
                self.dir.display()
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl HistoryStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, HistoryError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HistoryError::Io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HistoryError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HistoryError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HistoryError::Io(e)),
        }
    }
}

/// In-memory store, used by tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, HistoryError> {
        let entries = self.entries.lock().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), HistoryError> {
        let mut entries = self.entries.lock().map_err(|_| HistoryError::LockPoisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), HistoryError> {
        let mut entries = self.entries.lock().map_err(|_| HistoryError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Append, list, search and clear operations over a [`HistoryStore`].
#[derive(Clone)]
pub struct HistoryService {
    store: Arc<dyn HistoryStore>,
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for HistoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryService").finish_non_exhaustive()
    }
}

impl HistoryService {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Records `result` for `patient_name` as the newest entry.
    ///
    /// Entries beyond the newest [`HISTORY_LIMIT`] are evicted.
    ///
    /// # Errors
    ///
    /// Returns `HistoryError::InvalidResult` if `result` fails [`DiagnosisResult::validate`],
    /// and another `HistoryError` if the store is unavailable, the stored history is corrupt,
    /// or the write fails. The stored history is left unchanged on error.
    pub fn append(
        &self,
        result: DiagnosisResult,
        patient_name: &NonEmptyText,
    ) -> Result<HistoryLog, HistoryError> {
        result.validate()?;
        let _guard = self.write_lock.lock().map_err(|_| HistoryError::LockPoisoned)?;

        let mut history = self.load()?;
        let log = HistoryLog {
            id: Uuid::new_v4(),
            timestamp: Utc::now().trunc_subsecs(3),
            patient_name: patient_name.as_str().to_owned(),
            result,
        };
        history.insert(0, log.clone());
        history.truncate(HISTORY_LIMIT);

        let blob = serde_json::to_string(&history).map_err(HistoryError::Serialization)?;
        self.store.set(HISTORY_STORAGE_KEY, &blob)?;

        tracing::debug!(id = %log.id, entries = history.len(), "history entry saved");
        Ok(log)
    }

    /// All entries, newest first. An unavailable store yields an empty list.
    pub fn list_all(&self) -> Result<Vec<HistoryLog>, HistoryError> {
        match self.load() {
            Err(HistoryError::StorageUnavailable(reason)) => {
                tracing::debug!(%reason, "history storage unavailable; treating as empty");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Case-insensitive substring search over patient name, disease name and entry date
    /// (`dd/mm/yyyy` or `yyyy-mm-dd`, UTC).
    pub fn search(&self, query: &str) -> Result<Vec<HistoryLog>, HistoryError> {
        let needle = query.trim().to_lowercase();
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|log| log.matches(&needle))
            .collect())
    }

    pub fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().map_err(|_| HistoryError::LockPoisoned)?;
        self.store.remove(HISTORY_STORAGE_KEY)
    }

    fn load(&self) -> Result<Vec<HistoryLog>, HistoryError> {
        match self.store.get(HISTORY_STORAGE_KEY)? {
            Some(blob) if !blob.trim().is_empty() => {
                serde_json::from_str(&blob).map_err(HistoryError::Corrupt)
            }
            _ => Ok(Vec::new()),
        }
    }
}
