//! Wavatar style: face parts picked by fixed seed offsets.
//!
//! Unlike the other parts styles, part indices and colors are read straight
//! from hex digits of the seed instead of sequential PRNG draws. `mask` and
//! `shine` read the same offset, so a mask always gets its own highlight.
//!
//! | Value | Seed offset (2 hex digits) |
//! |---|---|
//! | `fade` | 1 |
//! | `mask`, `shine` | 3 |
//! | `brow` | 5 |
//! | `eyes` | 7 |
//! | `pupils` | 9 |
//! | `mouth` | 11 |
//! | background hue | 13 |
//! | face hue | 15 |
//!
//! Part indices are the value modulo the candidate count; hues are
//! `value * 360 / 256`. Changing any of these changes every existing avatar.
//! Seeds are expected to be hex hashes; a seed too short for the offsets
//! fails the build.

use crate::generator::{GeneratorError, PartsStyle, SelectedParts, seed_hex};
use crate::random::RandomSource;
use crate::raster::{self, Background, Layer};
use image::RgbaImage;
use std::path::Path;

pub const PART_TYPES: &[&str] = &["fade", "mask", "shine", "brow", "eyes", "pupils", "mouth"];

/// Native canvas size.
pub const SIZE: u32 = 80;

const SATURATION: f64 = 94.0;
const BACKGROUND_LIGHTNESS: f64 = 20.0;
const FACE_LIGHTNESS: f64 = 66.0;

const BACKGROUND_OFFSET: usize = 13;
const FACE_OFFSET: usize = 15;

fn part_offset(part_type: &str) -> Option<usize> {
    match part_type {
        "fade" => Some(1),
        "mask" | "shine" => Some(3),
        "brow" => Some(5),
        "eyes" => Some(7),
        "pupils" => Some(9),
        "mouth" => Some(11),
        _ => None,
    }
}

fn seed_hue(seed: &str, offset: usize) -> Result<u16, GeneratorError> {
    Ok((seed_hex(seed, offset, 2)? * 360 / 256) as u16)
}

/// Background and face hues in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavatarColors {
    pub background: u16,
    pub face: u16,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Wavatar;

impl PartsStyle for Wavatar {
    type Args = WavatarColors;
    type Output = RgbaImage;

    fn name(&self) -> &'static str {
        "wavatar"
    }

    fn part_types(&self) -> &'static [&'static str] {
        PART_TYPES
    }

    fn select_index(
        &self,
        part_type: &str,
        count: usize,
        seed: &str,
        _random: &mut RandomSource,
    ) -> Result<usize, GeneratorError> {
        let offset = part_offset(part_type).ok_or_else(|| GeneratorError::PartIndex {
            part_type: part_type.to_string(),
            index: 0,
            count,
        })?;
        Ok(seed_hex(seed, offset, 2)? as usize % count)
    }

    fn additional_arguments(
        &self,
        seed: &str,
        _size: u32,
        _parts: &SelectedParts,
        _random: &mut RandomSource,
    ) -> Result<WavatarColors, GeneratorError> {
        Ok(WavatarColors {
            background: seed_hue(seed, BACKGROUND_OFFSET)?,
            face: seed_hue(seed, FACE_OFFSET)?,
        })
    }

    fn render(
        &self,
        parts: &SelectedParts,
        colors: WavatarColors,
        parts_dir: &Path,
    ) -> Result<RgbaImage, GeneratorError> {
        let mut avatar = raster::create_image(Background::Transparent, SIZE);
        raster::fill_image(
            &mut avatar,
            colors.background,
            SATURATION,
            BACKGROUND_LIGHTNESS,
            0,
            0,
        );

        // The face color floods the area the fade and mask leave open
        let mut face_filled = false;
        for part in parts.iter() {
            if !face_filled && !matches!(part.part_type, "fade" | "mask") {
                fill_face(&mut avatar, colors.face);
                face_filled = true;
            }
            raster::combine_images(&mut avatar, Layer::File(&part.candidate), parts_dir)?;
        }
        if !face_filled {
            fill_face(&mut avatar, colors.face);
        }

        Ok(avatar)
    }
}

fn fill_face(avatar: &mut RgbaImage, hue: u16) {
    let center = SIZE / 2;
    raster::fill_image(avatar, hue, SATURATION, FACE_LIGHTNESS, center, center);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hsl_to_rgb;
    use crate::generator::SelectedPart;
    use crate::test_helpers::write_png_rect;
    use image::Rgba;
    use tempfile::TempDir;

    const SEED: &str = "0a1b2c3d4e5f60718293a4b5c6d7e8f9";

    #[test]
    fn indices_come_from_seed_offsets() {
        let mut random = RandomSource::new();
        // offset 1: "a1" = 161
        assert_eq!(Wavatar.select_index("fade", 10, SEED, &mut random).unwrap(), 1);
        // offset 3: "b2" = 178
        assert_eq!(Wavatar.select_index("mask", 100, SEED, &mut random).unwrap(), 78);
        assert_eq!(Wavatar.select_index("shine", 100, SEED, &mut random).unwrap(), 78);
        // offset 11: "f6" = 246
        assert_eq!(Wavatar.select_index("mouth", 4, SEED, &mut random).unwrap(), 2);
    }

    #[test]
    fn mask_and_shine_always_agree() {
        let mut random = RandomSource::new();
        for seed in ["00ff00ff00ff00ff00", "1234567890abcdef12", SEED] {
            assert_eq!(
                Wavatar.select_index("mask", 7, seed, &mut random).unwrap(),
                Wavatar.select_index("shine", 7, seed, &mut random).unwrap()
            );
        }
    }

    #[test]
    fn selection_does_not_draw_from_random_source() {
        let mut random = RandomSource::new();
        random.seed("x");
        let mut replay = RandomSource::new();
        replay.seed("x");
        Wavatar.select_index("eyes", 5, SEED, &mut random).unwrap();
        assert_eq!(random.get(0, 1_000_000), replay.get(0, 1_000_000));
    }

    #[test]
    fn hues_from_seed() {
        let mut random = RandomSource::new();
        let colors = Wavatar
            .additional_arguments(SEED, 80, &SelectedParts::default(), &mut random)
            .unwrap();
        // offset 13: "07" = 7, offset 15: "18" = 24
        assert_eq!(colors.background, 7 * 360 / 256);
        assert_eq!(colors.face, 24 * 360 / 256);
    }

    #[test]
    fn short_seed_is_invalid() {
        let mut random = RandomSource::new();
        let result =
            Wavatar.additional_arguments("abcd", 80, &SelectedParts::default(), &mut random);
        assert!(matches!(result, Err(GeneratorError::InvalidSeed { .. })));
    }

    #[test]
    fn render_fills_background_and_face() {
        let tmp = TempDir::new().unwrap();
        // A black ring separating an inner face from the background
        let mut mask = RgbaImage::from_pixel(SIZE, SIZE, Rgba([0, 0, 0, 0]));
        for i in 10..70 {
            for (x, y) in [(i, 10), (i, 69), (10, i), (69, i)] {
                mask.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        crate::test_helpers::write_png_image(tmp.path(), "mask_1.png", &mask);
        write_png_rect(tmp.path(), "eyes_1.png", SIZE, (30, 30, 31, 31), [0, 0, 255, 255]);

        let parts = SelectedParts::new(vec![
            SelectedPart {
                part_type: "mask",
                candidate: "mask_1.png".into(),
            },
            SelectedPart {
                part_type: "eyes",
                candidate: "eyes_1.png".into(),
            },
        ]);
        let colors = WavatarColors {
            background: 200,
            face: 30,
        };
        let avatar = Wavatar.render(&parts, colors, tmp.path()).unwrap();

        let [r, g, b] = hsl_to_rgb(200, SATURATION, BACKGROUND_LIGHTNESS);
        assert_eq!(*avatar.get_pixel(0, 0), Rgba([r, g, b, 255]));
        let [r, g, b] = hsl_to_rgb(30, SATURATION, FACE_LIGHTNESS);
        assert_eq!(*avatar.get_pixel(40, 40), Rgba([r, g, b, 255]));
        assert_eq!(*avatar.get_pixel(30, 30), Rgba([0, 0, 255, 255]));
        assert_eq!(*avatar.get_pixel(10, 10), Rgba([0, 0, 0, 255]));
    }
}
