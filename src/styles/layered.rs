//! Layered styles: part selection only, composited in part-type order on a
//! transparent canvas. Cat and Bird are both instances of [`Layered`].

use crate::generator::{GeneratorError, PartsStyle, SelectedParts};
use crate::random::RandomSource;
use crate::raster::{self, Background, Layer};
use image::RgbaImage;
use std::path::Path;

/// A parts style without recoloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layered {
    name: &'static str,
    part_types: &'static [&'static str],
    size: u32,
}

impl Layered {
    pub const CAT: Layered = Layered {
        name: "cat",
        part_types: &["body", "fur", "eyes", "mouth", "accessorie"],
        size: 256,
    };

    pub const BIRD: Layered = Layered {
        name: "bird",
        part_types: &["tail", "hoop", "body", "wing", "eyes", "bec", "accessorie"],
        size: 256,
    };

    /// Native canvas size.
    pub fn size(&self) -> u32 {
        self.size
    }
}

impl PartsStyle for Layered {
    type Args = ();
    type Output = RgbaImage;

    fn name(&self) -> &'static str {
        self.name
    }

    fn part_types(&self) -> &'static [&'static str] {
        self.part_types
    }

    fn additional_arguments(
        &self,
        _seed: &str,
        _size: u32,
        _parts: &SelectedParts,
        _random: &mut RandomSource,
    ) -> Result<(), GeneratorError> {
        Ok(())
    }

    fn render(
        &self,
        parts: &SelectedParts,
        _args: (),
        parts_dir: &Path,
    ) -> Result<RgbaImage, GeneratorError> {
        let mut avatar = raster::create_image(Background::Transparent, self.size);
        for part in parts.iter() {
            raster::combine_images(&mut avatar, Layer::File(&part.candidate), parts_dir)?;
        }
        Ok(avatar)
    }
}
