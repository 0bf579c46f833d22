//! Part inventory: which image fragments exist for each part type.
//!
//! A parts directory is a flat (or, for some styles, nested) collection of
//! files following the [`naming`](crate::naming) convention:
//!
//! ```text
//! parts/monster-id/
//! ├── arms_1.png
//! ├── arms_S8.png
//! ├── body_1.png
//! ├── ...
//! └── mouth_S5.png
//! ```
//!
//! [`PartInventory::get_parts`] turns that into an ordered mapping
//! `part type → candidates`:
//!
//! 1. **Memo**: if this inventory already resolved its parts, reuse them.
//! 2. **External cache**: look up `parts/<dir basename>` in the [`Cache`].
//! 3. **Scan**: walk the directory, bucket files by part-type prefix, drop
//!    unknown prefixes, sort each bucket naturally, then store the result in
//!    the cache with the configured TTL.
//!
//! Sorting happens before anything is cached or returned, so the candidate
//! at a given index is the same on every filesystem.
//!
//! For raster styles a candidate is the file's path relative to the parts
//! directory. Vector styles preload the markup instead: the candidate is the
//! SVG fragment with its XML prolog and outer `<svg>` element removed.

use crate::cache::{Cache, YEAR};
use crate::naming;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Candidates per part type, each list in natural order.
pub type Parts = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Parts directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("No parts found in {0}")]
    NoPartsFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// File format of a parts directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartFormat {
    /// PNG files; candidates are relative paths.
    Png,
    /// SVG fragments; candidates are the preloaded markup.
    Svg,
}

impl PartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PartFormat::Png => "png",
            PartFormat::Svg => "svg",
        }
    }
}

/// Lazily built, externally cached inventory of one parts directory.
pub struct PartInventory {
    dir: PathBuf,
    part_types: &'static [&'static str],
    format: PartFormat,
    recursive: bool,
    cache: Arc<dyn Cache>,
    ttl: Duration,
    parts: Option<Parts>,
}

impl PartInventory {
    pub fn new(
        dir: impl Into<PathBuf>,
        part_types: &'static [&'static str],
        format: PartFormat,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            dir: dir.into(),
            part_types,
            format,
            recursive: false,
            cache,
            ttl: YEAR,
            parts: None,
        }
    }

    /// Also descend into subdirectories (e.g. `parts/body/body_1.png`).
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn part_types(&self) -> &'static [&'static str] {
        self.part_types
    }

    pub fn format(&self) -> PartFormat {
        self.format
    }

    /// External cache key, derived from the directory basename.
    pub fn cache_key(&self) -> String {
        let base = self
            .dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        format!("parts/{base}")
    }

    /// Return the inventory, building and caching it on first access.
    pub fn get_parts(&mut self) -> Result<&Parts, InventoryError> {
        if self.parts.is_none() {
            let parts = match self.cached() {
                Some(parts) => {
                    debug!(key = %self.cache_key(), "part inventory cache hit");
                    parts
                }
                None => {
                    debug!(dir = %self.dir.display(), "scanning parts directory");
                    let parts = self.build_parts()?;
                    self.store(&parts);
                    parts
                }
            };
            self.parts = Some(parts);
        }
        match &self.parts {
            Some(parts) => Ok(parts),
            None => Err(InventoryError::NoPartsFound(self.dir.clone())),
        }
    }

    /// Read a usable inventory from the external cache.
    fn cached(&self) -> Option<Parts> {
        let value = self.cache.get(&self.cache_key())?;
        let parts: Parts = serde_json::from_value(value).ok()?;
        let complete = self.part_types.iter().all(|t| parts.contains_key(*t));
        if complete && has_candidates(&parts) {
            Some(parts)
        } else {
            None
        }
    }

    fn store(&self, parts: &Parts) {
        let stored = serde_json::to_value(parts)
            .map_err(crate::cache::CacheError::from)
            .and_then(|value| self.cache.set(&self.cache_key(), &value, self.ttl));
        if let Err(e) = stored {
            warn!(key = %self.cache_key(), error = %e, "could not cache part inventory");
        }
    }

    /// Scan the directory, bypassing every cache.
    pub fn build_parts(&self) -> Result<Parts, InventoryError> {
        if !self.dir.is_dir() {
            return Err(InventoryError::MissingDirectory(self.dir.clone()));
        }

        let files = collect_files(&self.dir, self.format, self.recursive)?;
        let mut parts = bucket_parts(files, self.part_types);

        if !has_candidates(&parts) {
            return Err(InventoryError::NoPartsFound(self.dir.clone()));
        }

        if self.format == PartFormat::Svg {
            for candidates in parts.values_mut() {
                for candidate in candidates.iter_mut() {
                    let content = std::fs::read_to_string(self.dir.join(candidate.as_str()))?;
                    *candidate = strip_svg_wrapper(&content);
                }
            }
        }

        Ok(parts)
    }
}

fn has_candidates(parts: &Parts) -> bool {
    parts.values().any(|c| !c.is_empty())
}

/// List part files under `dir` as `/`-separated relative paths.
fn collect_files(
    dir: &Path,
    format: PartFormat,
    recursive: bool,
) -> Result<Vec<String>, InventoryError> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(if recursive { usize::MAX } else { 1 });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();
        let matches_ext = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(format.extension()));
        if name.starts_with('.') || !matches_ext {
            continue;
        }
        let Ok(rel) = path.strip_prefix(dir) else {
            continue;
        };
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect::<Vec<_>>()
            .join("/");
        files.push(rel);
    }
    Ok(files)
}

/// Bucket relative file paths by part type.
///
/// Every known part type gets an entry (possibly empty); files whose prefix
/// is not a known part type are dropped. Each bucket is naturally sorted, so
/// the result does not depend on the order of `files`.
pub fn bucket_parts(files: impl IntoIterator<Item = String>, part_types: &[&str]) -> Parts {
    let mut parts: Parts = part_types
        .iter()
        .map(|t| (t.to_string(), Vec::new()))
        .collect();

    for file in files {
        let name = file.rsplit('/').next().unwrap_or(&file);
        let Some(prefix) = naming::part_type(name) else {
            continue;
        };
        if let Some(bucket) = parts.get_mut(prefix) {
            bucket.push(file);
        }
    }

    for candidates in parts.values_mut() {
        naming::sort_natural(candidates);
    }
    parts
}

/// Strip the XML prolog, comments before the root, and the outer `<svg>`
/// element from an SVG document, keeping the inner markup.
pub fn strip_svg_wrapper(content: &str) -> String {
    let Some(open) = content.find("<svg") else {
        return content.trim().to_string();
    };
    let Some(open_end) = content[open..].find('>').map(|i| open + i + 1) else {
        return content.trim().to_string();
    };
    let close = content.rfind("</svg>").unwrap_or(content.len());
    if close < open_end {
        // Self-closing root, nothing inside
        return String::new();
    }
    content[open_end..close].trim().to_string()
}
