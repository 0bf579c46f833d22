//! Concrete avatar styles.
//!
//! | Style | Output | Parts | Native size | Module |
//! |---|---|---|---|---|
//! | `monster` | PNG | legs, hair, arms, body, eyes, mouth | 120 | [`monster`] |
//! | `wavatar` | PNG | fade, mask, shine, brow, eyes, pupils, mouth | 80 | [`wavatar`] |
//! | `cat` | PNG | body, fur, eyes, mouth, accessorie | 256 | [`layered`] |
//! | `bird` | PNG | tail, hoop, body, wing, eyes, bec, accessorie | 256 | [`layered`] |
//! | `robohash` | SVG | body, face, eyes, mouth, accessory | 320 view box | [`robohash`] |
//! | `retro` | SVG | none, bitmap from seed digits | 5 view box | [`retro`] |
//! | `rings` | SVG | none, segments from random draws | 100 view box | [`rings`] |
//!
//! Parts-based styles run through [`PartsGenerator`]; `retro` and `rings`
//! implement [`Generator`] directly. [`create`] wires a style to its parts
//! directory and the shared inventory cache.

pub mod layered;
pub mod monster;
pub mod retro;
pub mod rings;
pub mod robohash;
pub mod wavatar;

use crate::cache::Cache;
use crate::config::{self, AvatarConfig};
use crate::generator::{Generator, PartsGenerator, PartsStyle};
use crate::inventory::PartInventory;
use crate::raster::{self, RasterError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use layered::Layered;
pub use monster::Monster;
pub use retro::Retro;
pub use rings::Rings;
pub use robohash::Robohash;
pub use wavatar::Wavatar;

/// Every avatar style this crate can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Monster,
    Wavatar,
    Cat,
    Bird,
    Robohash,
    Retro,
    Rings,
}

impl Style {
    pub const ALL: [Style; 7] = [
        Style::Monster,
        Style::Wavatar,
        Style::Cat,
        Style::Bird,
        Style::Robohash,
        Style::Retro,
        Style::Rings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Style::Monster => "monster",
            Style::Wavatar => "wavatar",
            Style::Cat => "cat",
            Style::Bird => "bird",
            Style::Robohash => "robohash",
            Style::Retro => "retro",
            Style::Rings => "rings",
        }
    }

    /// File extension of the style's output.
    pub fn extension(self) -> &'static str {
        match self {
            Style::Monster | Style::Wavatar | Style::Cat | Style::Bird => "png",
            Style::Robohash | Style::Retro | Style::Rings => "svg",
        }
    }

    /// Part types in back-to-front order; empty for styles without parts.
    pub fn part_types(self) -> &'static [&'static str] {
        match self {
            Style::Monster => monster::PART_TYPES,
            Style::Wavatar => wavatar::PART_TYPES,
            Style::Cat => Layered::CAT.part_types(),
            Style::Bird => Layered::BIRD.part_types(),
            Style::Robohash => robohash::PART_TYPES,
            Style::Retro | Style::Rings => &[],
        }
    }

    /// Configured parts directory, resolved against `root`.
    pub fn parts_dir(self, config: &AvatarConfig, root: &Path) -> Option<PathBuf> {
        let dir = match self {
            Style::Monster => &config.parts.monster,
            Style::Wavatar => &config.parts.wavatar,
            Style::Cat => &config.parts.cat,
            Style::Bird => &config.parts.bird,
            Style::Robohash => &config.parts.robohash,
            Style::Retro | Style::Rings => return None,
        };
        Some(config::resolve_path(root, dir))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inventory for a parts style, using the configured cache TTL.
pub fn inventory_for<S: PartsStyle>(
    style: &S,
    dir: PathBuf,
    config: &AvatarConfig,
    cache: Arc<dyn Cache>,
) -> PartInventory {
    PartInventory::new(dir, style.part_types(), style.format(), cache)
        .with_ttl(config.inventory.ttl())
}

/// Inventory of the configured parts directory of `style`.
///
/// `None` for styles that do not use parts.
pub fn style_inventory(
    style: Style,
    config: &AvatarConfig,
    root: &Path,
    cache: Arc<dyn Cache>,
) -> Option<PartInventory> {
    let dir = style.parts_dir(config, root)?;
    let inventory = match style {
        Style::Monster => inventory_for(&Monster::new(), dir, config, cache),
        Style::Wavatar => inventory_for(&Wavatar, dir, config, cache),
        Style::Cat => inventory_for(&Layered::CAT, dir, config, cache),
        Style::Bird => inventory_for(&Layered::BIRD, dir, config, cache),
        Style::Robohash => inventory_for(&Robohash, dir, config, cache),
        Style::Retro | Style::Rings => return None,
    };
    Some(inventory)
}

fn parts_generator<S: PartsStyle + 'static>(
    style: S,
    dir: PathBuf,
    config: &AvatarConfig,
    cache: Arc<dyn Cache>,
) -> Box<dyn Generator> {
    let inventory = inventory_for(&style, dir, config, cache);
    Box::new(PartsGenerator::new(style, inventory))
}

/// Build the generator for `style`.
///
/// Only loading the monster bounds table can fail; parts directories are
/// checked lazily on the first build.
pub fn create(
    style: Style,
    config: &AvatarConfig,
    root: &Path,
    cache: Arc<dyn Cache>,
) -> Result<Box<dyn Generator>, RasterError> {
    let dir = style.parts_dir(config, root).unwrap_or_default();
    let generator: Box<dyn Generator> = match style {
        Style::Monster => {
            let monster = match &config.monster.bounds_file {
                Some(file) => {
                    let bounds = raster::load_parts_dimensions(&config::resolve_path(root, file))?;
                    Monster::with_bounds(bounds)
                }
                None => Monster::new(),
            };
            parts_generator(monster, dir, config, cache)
        }
        Style::Wavatar => parts_generator(Wavatar, dir, config, cache),
        Style::Cat => parts_generator(Layered::CAT, dir, config, cache),
        Style::Bird => parts_generator(Layered::BIRD, dir, config, cache),
        Style::Robohash => parts_generator(Robohash, dir, config, cache),
        Style::Retro => Box::new(Retro),
        Style::Rings => Box::new(Rings::new(config.rings.mono)),
    };
    Ok(generator)
}
