//! File-backed wildcard store.
//!
//! The store loads candidate lists from a wildcards directory, one
//! `<name>.json` file per wildcard name. Each file holds a JSON array of
//! entries:
//!
//! ```json
//! [
//!   { "value": "red", "success": 3, "blocked": 0, "average": 3 },
//!   { "value": "blue" }
//! ]
//! ```
//!
//! Loads are cached and invalid entries are skipped with a warning, so one
//! damaged entry never takes a whole wildcard down. Generation outcomes feed
//! back into the counters and are written to disk, letting the surrounding
//! tool rank candidate values over time.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use wildcard_foundation::CandidateProvider;

/// One candidate entry with outcome counters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WildcardEntry {
    /// The candidate replacement text.
    pub value: String,
    /// Number of generations this value appeared in that succeeded.
    #[serde(default)]
    pub success: u32,
    /// Number of generations this value appeared in that were blocked.
    #[serde(default)]
    pub blocked: u32,
    /// Derived score, kept in the file for the surrounding tool:
    /// `success - blocked`.
    #[serde(default)]
    pub average: i64,
}

impl WildcardEntry {
    /// Creates an entry with zeroed counters.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            success: 0,
            blocked: 0,
            average: 0,
        }
    }

    /// Recomputes the derived score from the counters.
    fn recalculate(&mut self) {
        self.average = i64::from(self.success) - i64::from(self.blocked);
    }
}

/// Generation outcome reported back into the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The generation using this value succeeded.
    Success,
    /// The generation using this value was blocked.
    Blocked,
}

/// Errors from writing wildcard files.
///
/// Reads are resilient (a missing or damaged file yields an empty candidate
/// list with a warning); only write-back failures surface as errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure while writing a wildcard file.
    #[error("failed to write wildcard file {path}: {source}")]
    Io {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization failure while writing a wildcard file.
    #[error("failed to serialize wildcard file {path}: {source}")]
    Json {
        /// The file that could not be serialized.
        path: PathBuf,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// A candidate provider backed by a directory of `<name>.json` files.
pub struct WildcardStore {
    /// Directory holding the wildcard files.
    base_dir: PathBuf,
    /// Cache of loaded entry lists by normalized name.
    cache: Mutex<HashMap<String, Vec<WildcardEntry>>>,
}

impl WildcardStore {
    /// Creates a store over the given wildcards directory.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the wildcards directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the entries for `name`, loading and caching the file on
    /// first use. Unknown or unreadable names yield an empty list.
    #[must_use]
    pub fn entries(&self, name: &str) -> Vec<WildcardEntry> {
        let key = name.to_lowercase();
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entries) = cache.get(&key) {
            return entries.clone();
        }
        let entries = self.load_file(&key);
        cache.insert(key, entries.clone());
        entries
    }

    /// Lists the wildcard names available in the directory.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.base_dir.display(), error = %e, "cannot read wildcards directory");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    path.file_stem().map(|stem| stem.to_string_lossy().to_lowercase())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        names
    }

    /// Drops every cached entry list.
    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Drops the cached entry list for one wildcard name.
    pub fn clear_entry(&self, name: &str) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&name.to_lowercase());
    }

    /// Records a generation outcome against the entry whose value matches
    /// `value`, updating the counters and writing the file back.
    ///
    /// Returns false when no entry with that value exists.
    ///
    /// # Errors
    /// Returns `StoreError` when the updated file cannot be written.
    pub fn record_outcome(
        &self,
        name: &str,
        value: &str,
        outcome: Outcome,
    ) -> Result<bool, StoreError> {
        let key = name.to_lowercase();
        let mut entries = self.entries(&key);

        let Some(entry) = entries.iter_mut().find(|e| e.value == value) else {
            warn!(name = key.as_str(), value, "no entry found for outcome update");
            return Ok(false);
        };

        match outcome {
            Outcome::Success => entry.success += 1,
            Outcome::Blocked => entry.blocked += 1,
        }
        entry.recalculate();
        debug!(
            name = key.as_str(),
            value,
            success = entry.success,
            blocked = entry.blocked,
            "outcome recorded"
        );

        self.save(&key, &entries)?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entries);
        Ok(true)
    }

    /// Loads and validates one wildcard file. Damaged files and entries are
    /// skipped with a warning rather than failing the lookup.
    fn load_file(&self, name: &str) -> Vec<WildcardEntry> {
        let Some(path) = self.file_path(name) else {
            return Vec::new();
        };
        if !path.is_file() {
            warn!(path = %path.display(), "wildcard file not found");
            return Vec::new();
        }

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read wildcard file");
                return Vec::new();
            }
        };
        if text.trim().is_empty() {
            warn!(path = %path.display(), "wildcard file is empty");
            return Vec::new();
        }

        let raw = match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(serde_json::Value::Array(values)) => values,
            Ok(_) => {
                warn!(path = %path.display(), "wildcard file root is not a list");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot parse wildcard file");
                return Vec::new();
            }
        };

        let mut entries = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            match serde_json::from_value::<WildcardEntry>(value) {
                Ok(mut entry) => {
                    entry.recalculate();
                    entries.push(entry);
                }
                Err(e) => {
                    warn!(path = %path.display(), index, error = %e, "skipping invalid entry");
                }
            }
        }
        debug!(name, count = entries.len(), "wildcard file loaded");
        entries
    }

    /// Writes one wildcard file back to disk.
    fn save(&self, name: &str, entries: &[WildcardEntry]) -> Result<(), StoreError> {
        let Some(path) = self.file_path(name) else {
            return Ok(());
        };
        if let Err(source) = fs::create_dir_all(&self.base_dir) {
            return Err(StoreError::Io {
                path: self.base_dir.clone(),
                source,
            });
        }
        let text = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, text).map_err(|source| StoreError::Io { path, source })
    }

    /// Maps a wildcard name to its file path, rejecting names that would
    /// escape the wildcards directory.
    fn file_path(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            warn!(name, "refusing wildcard name outside the store directory");
            return None;
        }
        Some(self.base_dir.join(format!("{name}.json")))
    }
}

impl CandidateProvider for WildcardStore {
    fn candidates(&self, name: &str) -> Vec<String> {
        self.entries(name).into_iter().map(|e| e.value).collect()
    }
}
