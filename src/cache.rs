//! External key/value cache for derived data.
//!
//! Scanning a parts directory is cheap compared to rendering, but it still
//! touches the filesystem on every request. The part inventory is therefore
//! stored in a [`Cache`] with a long TTL (a year by default) and rebuilt only
//! when the entry is missing or unreadable.
//!
//! # Design
//!
//! The cache stores plain [`serde_json::Value`]s, so any value that survives a
//! JSON round trip (nested maps and lists of strings, for the inventory) can
//! be cached. Invalidation is the caller's job: delete the entry or the cache
//! directory when the parts change.
//!
//! ## Stores
//!
//! - [`FileCache`]: one JSON file per key under a directory. The file name is
//!   the SHA-256 of the key, so keys can contain any characters. Each file
//!   records a format version and an absolute expiry timestamp.
//! - [`MemoryCache`]: a mutex-guarded map, for tests and single-process use.
//!
//! A missing file, corrupt JSON, a version mismatch or an expired entry all
//! read as a miss. Reads never fail; only writes report errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Version of the on-disk entry format. Bump this to invalidate all
/// existing entries when the format changes.
const ENTRY_VERSION: u32 = 1;

/// One year, the default lifetime of cached inventories.
pub const YEAR: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value store with per-entry expiry.
pub trait Cache: Send + Sync {
    /// Look up a live entry.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key` for `ttl`.
    fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), CacheError>;
}

/// Seconds since the Unix epoch.
fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// A single on-disk cache entry.
#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    version: u32,
    key: String,
    expires_at: u64,
    value: Value,
}

/// Directory-backed cache, one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", hash_key(key)))
    }

    /// Remove the entry for `key`, if present.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        match std::fs::remove_file(self.entry_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Option<Value> {
        let content = std::fs::read_to_string(self.entry_path(key)).ok()?;
        let entry: FileEntry = serde_json::from_str(&content).ok()?;
        if entry.version != ENTRY_VERSION || entry.key != key || entry.expires_at <= now() {
            return None;
        }
        Some(entry.value)
    }

    fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir)?;
        let entry = FileEntry {
            version: ENTRY_VERSION,
            key: key.to_string(),
            expires_at: now().saturating_add(ttl.as_secs()),
            value: value.clone(),
        };
        let json = serde_json::to_string(&entry)?;
        std::fs::write(self.entry_path(key), json)?;
        Ok(())
    }
}

/// In-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (u64, Value)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The map is always left consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, (u64, Value)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        let entries = self.lock();
        let (expires_at, value) = entries.get(key)?;
        if *expires_at <= now() {
            return None;
        }
        Some(value.clone())
    }

    fn set(&self, key: &str, value: &Value, ttl: Duration) -> Result<(), CacheError> {
        self.lock().insert(
            key.to_string(),
            (now().saturating_add(ttl.as_secs()), value.clone()),
        );
        Ok(())
    }
}

/// SHA-256 of a cache key, as a hex string.
pub fn hash_key(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}
