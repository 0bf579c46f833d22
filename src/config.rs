//! Avatar configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the root directory overrides any subset
//! of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! [parts]                           # parts directory per style
//! monster = "parts/monster-id"
//! wavatar = "parts/wavatar"
//! cat = "parts/cat-avatar"
//! bird = "parts/bird-avatar"
//! robohash = "parts/robohash"
//!
//! [inventory]
//! cache_dir = ".avatar-forge/cache" # part inventory cache
//! ttl_days = 365                    # inventory cache lifetime
//!
//! [monster]
//! # bounds_file = "monster-bounds.json"
//!
//! [rings]
//! mono = false                      # one color for all rings
//!
//! [output]
//! default_size = 80                 # pixels, 1-1024
//! # store_dir = ".avatar-forge/avatars"
//! ```
//!
//! Relative paths are resolved against the root directory. Unknown keys are
//! rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub use crate::raster::MAX_SIZE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvatarConfig {
    /// Parts directories of the parts-based styles.
    pub parts: PartsConfig,
    /// Part inventory cache settings.
    pub inventory: InventoryConfig,
    /// Monster style settings.
    pub monster: MonsterConfig,
    /// Rings style settings.
    pub rings: RingsConfig,
    /// Output defaults and rendered-avatar store.
    pub output: OutputConfig,
}

impl AvatarConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inventory.ttl_days == 0 {
            return Err(ConfigError::Validation(
                "inventory.ttl_days must be greater than 0".into(),
            ));
        }
        if self.output.default_size == 0 || self.output.default_size > MAX_SIZE {
            return Err(ConfigError::Validation(format!(
                "output.default_size must be 1-{MAX_SIZE}"
            )));
        }
        Ok(())
    }
}

/// Parts directory per style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartsConfig {
    pub monster: PathBuf,
    pub wavatar: PathBuf,
    pub cat: PathBuf,
    pub bird: PathBuf,
    pub robohash: PathBuf,
}

impl Default for PartsConfig {
    fn default() -> Self {
        Self {
            monster: "parts/monster-id".into(),
            wavatar: "parts/wavatar".into(),
            cat: "parts/cat-avatar".into(),
            bird: "parts/bird-avatar".into(),
            robohash: "parts/robohash".into(),
        }
    }
}

/// Part inventory cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InventoryConfig {
    /// Directory of the file-backed inventory cache.
    pub cache_dir: PathBuf,
    /// How long a cached inventory stays valid, in days.
    pub ttl_days: u64,
}

impl InventoryConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_days.saturating_mul(24 * 60 * 60))
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            cache_dir: ".avatar-forge/cache".into(),
            ttl_days: 365,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonsterConfig {
    /// JSON bounds table written by the `dimensions` command.
    pub bounds_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RingsConfig {
    /// Draw every ring in the first ring's color.
    pub mono: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Size used when `--size` is not given.
    pub default_size: u32,
    /// When set, rendered avatars are cached here.
    pub store_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_size: 80,
            store_dir: None,
        }
    }
}

/// Resolve a configured path against the root directory.
///
/// Absolute paths are returned unchanged.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// The stock defaults as a TOML table, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AvatarConfig::default())?)
}

/// Layer `overlay` over `base`, descending into tables.
///
/// Scalars and arrays from the overlay win outright; keys only present in
/// the base survive.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Apply an optional user layer, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AvatarConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AvatarConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in `root`, on top of the stock defaults.
pub fn load_config(root: &Path) -> Result<AvatarConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Avatar Forge Configuration
# ==========================
# Every key is optional and shows its default value. Delete what you do
# not want to change. Relative paths resolve against the directory that
# holds this file; misspelled keys are reported as errors.

# ---------------------------------------------------------------------------
# Parts directories
# ---------------------------------------------------------------------------
[parts]
# One directory of part files per parts-based style. Files are named
# <parttype>_<variant>.png (or .svg for robohash).
monster = "parts/monster-id"
wavatar = "parts/wavatar"
cat = "parts/cat-avatar"
bird = "parts/bird-avatar"
robohash = "parts/robohash"

# ---------------------------------------------------------------------------
# Part inventory cache
# ---------------------------------------------------------------------------
[inventory]
# Where scanned part lists are cached between runs.
cache_dir = ".avatar-forge/cache"

# Cache lifetime in days. Delete the cache directory after changing parts.
ttl_days = 365

# ---------------------------------------------------------------------------
# Monster style
# ---------------------------------------------------------------------------
[monster]
# Bounds table written by `avatar-forge dimensions`. Speeds up recoloring.
# bounds_file = "monster-bounds.json"

# ---------------------------------------------------------------------------
# Rings style
# ---------------------------------------------------------------------------
[rings]
# Draw all rings in one color.
mono = false

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Avatar size in pixels when --size is not given (1-1024).
default_size = 80

# Cache rendered avatars on disk.
# store_dir = ".avatar-forge/avatars"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = AvatarConfig::default();
        assert_eq!(config.parts.monster, PathBuf::from("parts/monster-id"));
        assert_eq!(config.inventory.ttl_days, 365);
        assert_eq!(config.output.default_size, 80);
        assert_eq!(config.output.store_dir, None);
        assert!(!config.rings.mono);
    }

    #[test]
    fn ttl_in_seconds() {
        let inventory = InventoryConfig {
            ttl_days: 2,
            ..InventoryConfig::default()
        };
        assert_eq!(inventory.ttl(), Duration::from_secs(172_800));
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[parts]
cat = "art/cats"

[rings]
mono = true
"#;
        let config: AvatarConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.parts.cat, PathBuf::from("art/cats"));
        assert!(config.rings.mono);
        // Defaults preserved
        assert_eq!(config.parts.bird, PathBuf::from("parts/bird-avatar"));
        assert_eq!(config.output.default_size, 80);
    }

    #[test]
    fn resolve_relative_and_absolute_paths() {
        let root = Path::new("/srv/avatars");
        assert_eq!(
            resolve_path(root, Path::new("parts/cat")),
            PathBuf::from("/srv/avatars/parts/cat")
        );
        assert_eq!(
            resolve_path(root, Path::new("/opt/parts")),
            PathBuf::from("/opt/parts")
        );
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1").unwrap();
        let overlay: toml::Value = toml::from_str("a = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(2));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_adds_new_keys() {
        let base: toml::Value = toml::from_str("[monster]").unwrap();
        let overlay: toml::Value =
            toml::from_str("[monster]\nbounds_file = \"b.json\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["monster"]["bounds_file"].as_str(), Some("b.json"));
    }

    // =========================================================================
    // Unknown keys and validation
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<AvatarConfig, _> = toml::from_str("[parts]\nmonstr = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<AvatarConfig, _> = toml::from_str("[jdenticon]\nsize = 3");
        assert!(result.is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(AvatarConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_ttl_zero() {
        let mut config = AvatarConfig::default();
        config.inventory.ttl_days = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn ttl_saturates_for_huge_day_counts() {
        let mut inventory = InventoryConfig::default();
        assert_eq!(inventory.ttl(), Duration::from_secs(365 * 86_400));
        inventory.ttl_days = u64::MAX;
        assert_eq!(inventory.ttl(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn validate_size_bounds() {
        let mut config = AvatarConfig::default();
        config.output.default_size = 0;
        assert!(config.validate().is_err());
        config.output.default_size = MAX_SIZE;
        assert!(config.validate().is_ok());
        config.output.default_size = MAX_SIZE + 1;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Loading
    // =========================================================================

    #[test]
    fn load_config_without_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_config(tmp.path()).unwrap(), AvatarConfig::default());
    }

    #[test]
    fn load_config_merges_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[output]\ndefault_size = 128\nstore_dir = \"out\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.output.default_size, 128);
        assert_eq!(config.output.store_dir, Some(PathBuf::from("out")));
        assert_eq!(config.inventory.ttl_days, 365);
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[inventory]\nttl_days = 0\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[output\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(stock_defaults_value().unwrap(), Some(value)).unwrap();
        assert_eq!(config, AvatarConfig::default());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let stock = stock_config_toml();
        for section in ["[parts]", "[inventory]", "[monster]", "[rings]", "[output]"] {
            assert!(stock.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_is_table() {
        let value = stock_defaults_value().unwrap();
        assert!(value.as_table().unwrap().contains_key("inventory"));
    }
}
