//! File-per-key cache storage
//!
//! Every logical key maps to one JSON file holding `{timestamp, data}` where
//! `timestamp` is float epoch seconds. An entry is fresh while
//! `now - timestamp < ttl`; stale entries read as absent and are overwritten on
//! the next write. Writes go to a temp file and are renamed into place, so a
//! concurrent reader sees either the old or the new file, never a torn one.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::key::cache_file_name;
use crate::clock::{Clock, epoch_seconds};
use crate::error::CacheError;

type Result<T> = std::result::Result<T, CacheError>;

/// Suffix of a write in progress, renamed into place once complete
const TEMP_EXTENSION: &str = "json.tmp";

/// On-disk envelope
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile<T> {
    timestamp: f64,
    data: T,
}

/// Header-only view used for stats, so payloads are not deserialized twice
#[derive(Debug, Deserialize)]
struct CacheFileHeader {
    timestamp: f64,
}

/// Disk cache with a fixed TTL
pub struct CacheStorage {
    dir: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl CacheStorage {
    /// Get the default cache directory path (~/.cache/skillmatch on Linux)
    pub fn default_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("skillmatch"))
    }

    /// Open (creating if needed) cache storage at a directory
    pub fn open_at(dir: &Path, ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        Ok(Self {
            dir: dir.to_path_buf(),
            ttl,
            clock,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(cache_file_name(key))
    }

    fn is_fresh(&self, timestamp: f64) -> bool {
        let age = epoch_seconds(self.clock.now()) - timestamp;
        age < self.ttl.as_secs_f64()
    }

    /// Get a fresh value for `key`.
    ///
    /// Returns `None` when the file is missing, stale, unreadable or holds a
    /// payload of a different shape. A stored `null` or empty collection is a
    /// hit like any other value.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Failed to read cache file {}: {}", path.display(), e);
                return None;
            }
        };

        let entry: CacheFile<T> = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Ignoring unreadable cache entry {}: {}", key, e);
                return None;
            }
        };

        if self.is_fresh(entry.timestamp) {
            Some(entry.data)
        } else {
            log::debug!("Cache entry expired: {}", key);
            None
        }
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let entry = CacheFile {
            timestamp: epoch_seconds(self.clock.now()),
            data: value,
        };
        let json = serde_json::to_vec(&entry)?;

        let path = self.path_for(key);
        let tmp = path.with_extension(TEMP_EXTENSION);
        let written = std::fs::write(&tmp, json)
            .map_err(|e| CacheError::Io(format!("Failed to write cache entry: {}", e)))
            .and_then(|()| {
                std::fs::rename(&tmp, &path)
                    .map_err(|e| CacheError::Io(format!("Failed to replace cache entry: {}", e)))
            });
        if written.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }

        written
    }

    /// Delete every cache file, including temp files left by an interrupted write
    pub fn clear_all(&self) -> Result<ClearStats> {
        let mut entries_removed = 0;
        for path in self.entry_paths()? {
            match std::fs::remove_file(&path) {
                Ok(()) => entries_removed += 1,
                Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
        for path in self.paths_with_extension("tmp")? {
            if let Err(e) = std::fs::remove_file(&path) {
                log::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
        Ok(ClearStats { entries_removed })
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();

        for path in self.entry_paths()? {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            stats.total_entries += 1;
            stats.total_size_bytes += bytes.len();

            let Ok(header) = serde_json::from_slice::<CacheFileHeader>(&bytes) else {
                stats.expired_entries += 1;
                continue;
            };

            if self.is_fresh(header.timestamp) {
                stats.valid_entries += 1;
                let ts = header.timestamp as i64;
                stats.oldest_entry = Some(stats.oldest_entry.map_or(ts, |o| o.min(ts)));
                stats.newest_entry = Some(stats.newest_entry.map_or(ts, |n| n.max(ts)));
            } else {
                stats.expired_entries += 1;
            }
        }

        Ok(stats)
    }

    fn entry_paths(&self) -> Result<Vec<PathBuf>> {
        self.paths_with_extension("json")
    }

    fn paths_with_extension(&self, extension: &str) -> Result<Vec<PathBuf>> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::Io(format!("Failed to list cache dir: {}", e))),
        };

        Ok(read_dir
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == extension))
            .collect())
    }
}

/// Statistics about cache clear operation
#[derive(Debug)]
pub struct ClearStats {
    pub entries_removed: usize,
}

/// Statistics about cache state
#[derive(Debug, Default)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub total_size_bytes: usize,
    pub oldest_entry: Option<i64>,
    pub newest_entry: Option<i64>,
}
