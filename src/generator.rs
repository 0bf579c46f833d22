//! The parts generator pipeline.
//!
//! Every avatar style implements [`Generator`]. Parts-based styles plug a
//! [`PartsStyle`] into [`PartsGenerator`], which owns the fixed skeleton:
//!
//! ```text
//! seed RNG → load inventory → select one candidate per part type
//!          → derive style arguments → render → resize/encode → reset RNG
//! ```
//!
//! A style only decides *what* to draw: its ordered part types, how a part
//! index is chosen (PRNG draw by default, seed offsets for positional
//! styles), which extra arguments it needs, and how the selected parts are
//! drawn. Its render output is turned into an [`Avatar`] through
//! [`Rendered`]: raster canvases are resized and PNG-encoded, markup is
//! returned as-is.
//!
//! ## Failure containment
//!
//! [`Generator::build`] never returns an error. Any failure (missing parts
//! directory, unreadable part file, malformed seed, encoder failure) is
//! logged and turned into `None`, which callers treat as "fall back to some
//! other avatar". The random source is reset after every build, whichever
//! step failed.

use crate::inventory::{InventoryError, PartFormat, PartInventory, Parts};
use crate::random::RandomSource;
use crate::raster::{self, RasterError};
use image::RgbaImage;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Part inventory error: {0}")]
    Inventory(#[from] InventoryError),
    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),
    #[error("Seed has no {len} hex digits at offset {offset}")]
    InvalidSeed { offset: usize, len: usize },
    #[error("Part index {index} out of range for {part_type} ({count} candidates)")]
    PartIndex {
        part_type: String,
        index: usize,
        count: usize,
    },
    #[error("Renderer produced no output")]
    EmptyOutput,
}

/// A finished avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Png(Vec<u8>),
    Svg(String),
}

impl Avatar {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Avatar::Png(_) => "image/png",
            Avatar::Svg(_) => "image/svg+xml",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Avatar::Png(_) => "png",
            Avatar::Svg(_) => "svg",
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Avatar::Png(bytes) => bytes,
            Avatar::Svg(markup) => markup.as_bytes(),
        }
    }
}

/// Anything that turns a seed into an avatar.
pub trait Generator {
    /// Build the avatar for `seed` at `size` pixels.
    ///
    /// Returns `None` when the avatar could not be generated.
    fn build(&mut self, seed: &str, size: u32) -> Option<Avatar>;
}

/// Native render output of a style.
pub trait Rendered {
    fn into_avatar(self, size: u32) -> Option<Avatar>;
}

impl Rendered for RgbaImage {
    fn into_avatar(self, size: u32) -> Option<Avatar> {
        let bytes = raster::get_resized_image_data(&self, size);
        if bytes.is_empty() {
            None
        } else {
            Some(Avatar::Png(bytes))
        }
    }
}

impl Rendered for String {
    /// Markup scales by itself; `size` is not needed.
    fn into_avatar(self, _size: u32) -> Option<Avatar> {
        if self.is_empty() {
            None
        } else {
            Some(Avatar::Svg(self))
        }
    }
}

/// One chosen candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPart {
    pub part_type: &'static str,
    /// Relative file path (raster) or markup (vector).
    pub candidate: String,
}

/// Chosen candidates in part-type order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedParts(Vec<SelectedPart>);

impl SelectedParts {
    pub fn new(parts: Vec<SelectedPart>) -> Self {
        Self(parts)
    }

    pub fn get(&self, part_type: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.part_type == part_type)
            .map(|p| p.candidate.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedPart> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Style hooks for [`PartsGenerator`].
pub trait PartsStyle {
    /// Extra rendering parameters derived once per build.
    type Args;
    /// Native render output.
    type Output: Rendered;

    /// Style name, for logs.
    fn name(&self) -> &'static str;

    /// Part types in back-to-front order.
    fn part_types(&self) -> &'static [&'static str];

    fn format(&self) -> PartFormat {
        PartFormat::Png
    }

    /// Pick the candidate index for `part_type` (`count > 0`).
    fn select_index(
        &self,
        _part_type: &str,
        count: usize,
        _seed: &str,
        random: &mut RandomSource,
    ) -> Result<usize, GeneratorError> {
        Ok(random.index(count))
    }

    /// Derive style arguments after part selection.
    fn additional_arguments(
        &self,
        seed: &str,
        size: u32,
        parts: &SelectedParts,
        random: &mut RandomSource,
    ) -> Result<Self::Args, GeneratorError>;

    /// Draw the selected parts at native size.
    fn render(
        &self,
        parts: &SelectedParts,
        args: Self::Args,
        parts_dir: &Path,
    ) -> Result<Self::Output, GeneratorError>;
}

/// Select one candidate per part type, in part-type order.
///
/// Part types without candidates are skipped.
pub fn select_parts<S: PartsStyle + ?Sized>(
    style: &S,
    parts: &Parts,
    seed: &str,
    random: &mut RandomSource,
) -> Result<SelectedParts, GeneratorError> {
    let mut selected = Vec::with_capacity(style.part_types().len());
    for &part_type in style.part_types() {
        let Some(candidates) = parts.get(part_type).filter(|c| !c.is_empty()) else {
            continue;
        };
        let index = style.select_index(part_type, candidates.len(), seed, random)?;
        let candidate = candidates
            .get(index)
            .ok_or_else(|| GeneratorError::PartIndex {
                part_type: part_type.to_string(),
                index,
                count: candidates.len(),
            })?;
        selected.push(SelectedPart {
            part_type,
            candidate: candidate.clone(),
        });
    }
    Ok(SelectedParts::new(selected))
}

/// Read `len` hex digits at `offset` of the seed as a number.
pub fn seed_hex(seed: &str, offset: usize, len: usize) -> Result<u32, GeneratorError> {
    seed.get(offset..offset + len)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()))
        .and_then(|digits| u32::from_str_radix(digits, 16).ok())
        .ok_or(GeneratorError::InvalidSeed { offset, len })
}

/// Resets the borrowed source when dropped, including during unwinding.
struct ResetGuard<'a>(&'a mut RandomSource);

impl Drop for ResetGuard<'_> {
    fn drop(&mut self) {
        self.0.reset();
    }
}

/// Seed the source, run `f`, and reset the source whatever the outcome.
pub(crate) fn run_seeded(
    random: &mut RandomSource,
    style: &str,
    seed: &str,
    size: u32,
    f: impl FnOnce(&mut RandomSource) -> Result<Avatar, GeneratorError>,
) -> Option<Avatar> {
    if seed.is_empty() || size == 0 {
        warn!(style, size, "refusing to build avatar for empty seed or zero size");
        return None;
    }
    if size > raster::MAX_SIZE {
        warn!(style, size, max = raster::MAX_SIZE, "requested avatar size too large");
        return None;
    }

    random.seed(seed);
    let result = {
        let mut guard = ResetGuard(random);
        f(&mut *guard.0)
    };

    match result {
        Ok(avatar) => Some(avatar),
        Err(e) => {
            let prefix: String = seed.chars().take(8).collect();
            warn!(style, seed = %prefix, size, error = %e, "avatar generation failed");
            None
        }
    }
}

/// Template-method driver for parts-based styles.
pub struct PartsGenerator<S: PartsStyle> {
    style: S,
    inventory: PartInventory,
    random: RandomSource,
}

impl<S: PartsStyle> PartsGenerator<S> {
    /// `inventory` must have been built for `style.part_types()`.
    pub fn new(style: S, inventory: PartInventory) -> Self {
        Self {
            style,
            inventory,
            random: RandomSource::new(),
        }
    }

    pub fn style(&self) -> &S {
        &self.style
    }

    pub fn inventory(&mut self) -> &mut PartInventory {
        &mut self.inventory
    }

    pub fn random(&mut self) -> &mut RandomSource {
        &mut self.random
    }
}

impl<S: PartsStyle> Generator for PartsGenerator<S> {
    fn build(&mut self, seed: &str, size: u32) -> Option<Avatar> {
        let style = &self.style;
        let inventory = &mut self.inventory;
        run_seeded(&mut self.random, style.name(), seed, size, |random| {
            let parts = inventory.get_parts()?;
            let selected = select_parts(style, parts, seed, random)?;
            let args = style.additional_arguments(seed, size, &selected, random)?;
            let rendered = style.render(&selected, args, inventory.dir())?;
            rendered
                .into_avatar(size)
                .ok_or(GeneratorError::EmptyOutput)
        })
    }
}
