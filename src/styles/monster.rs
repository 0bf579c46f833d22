//! Monster style: recolored creature parts on a white background.
//!
//! Parts are composited back to front (`legs` first, `mouth` last) on a
//! 120 px canvas. Each part is recolored on its own canvas before it is
//! copied onto the base, following the part's coloring rule:
//!
//! | Rule | Parts | Color |
//! |---|---|---|
//! | Main | every `body`, plus the same-color list | the monster's hue/saturation |
//! | Fixed range | e.g. `hair_S4.png` (blue), `mouth_9.png` (red) | hue drawn from the range |
//! | Random | the random-color list | independent hue/saturation |
//! | None | everything else | uncolored |
//!
//! All colors are drawn after part selection, in part order, from the seeded
//! source, so the rules are part of the style's fingerprint: changing a list
//! changes existing monsters.

use crate::color::normalize_hue;
use crate::generator::{GeneratorError, PartsStyle, SelectedParts};
use crate::random::RandomSource;
use crate::raster::{self, Background, Layer, PartsDimensions};
use image::RgbaImage;
use std::path::Path;

pub const PART_TYPES: &[&str] = &["legs", "hair", "arms", "body", "eyes", "mouth"];

/// Native canvas size.
pub const SIZE: u32 = 120;

/// Parts that share the monster's main color (in addition to all bodies).
const SAME_COLOR_PARTS: &[&str] = &[
    "arms_S8.png",
    "legs_S5.png",
    "legs_S13.png",
    "mouth_S5.png",
    "mouth_S4.png",
];

/// Parts with a fixed hue range in degrees (may be negative before normalization).
const SPECIFIC_COLOR_PARTS: &[(&str, i64, i64)] = &[
    ("hair_S4.png", 216, 270),
    ("arms_S2.png", -18, 18),
    ("hair_S6.png", -18, 18),
    ("mouth_9.png", -18, 18),
    ("mouth_6.png", -18, 18),
    ("mouth_S2.png", -18, 18),
];

/// Parts colored independently of the main color.
const RANDOM_COLOR_PARTS: &[&str] = &[
    "arms_3.png",
    "arms_4.png",
    "arms_5.png",
    "arms_S1.png",
    "arms_S3.png",
    "arms_S5.png",
    "arms_S6.png",
    "arms_S7.png",
    "arms_S9.png",
    "hair_S1.png",
    "hair_S2.png",
    "hair_S3.png",
    "hair_S5.png",
    "legs_1.png",
    "legs_2.png",
    "legs_3.png",
    "legs_5.png",
    "legs_S1.png",
    "legs_S2.png",
    "legs_S3.png",
    "legs_S4.png",
    "legs_S6.png",
    "legs_S7.png",
    "legs_S10.png",
    "legs_S12.png",
    "mouth_3.png",
    "mouth_4.png",
    "mouth_7.png",
    "mouth_10.png",
    "mouth_S6.png",
];

const MIN_SATURATION: i64 = 25;
const MAX_SATURATION: i64 = 100;

/// Hue (degrees) and saturation (percent) for one part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartColor {
    pub hue: u16,
    pub saturation: f64,
}

/// How a part file is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorRule {
    Main,
    Range(i64, i64),
    Random,
    Uncolored,
}

fn color_rule(part_type: &str, candidate: &str) -> ColorRule {
    let file = candidate.rsplit('/').next().unwrap_or(candidate);
    if part_type == "body" || SAME_COLOR_PARTS.contains(&file) {
        ColorRule::Main
    } else if let Some(&(_, low, high)) = SPECIFIC_COLOR_PARTS.iter().find(|(f, ..)| *f == file) {
        ColorRule::Range(low, high)
    } else if RANDOM_COLOR_PARTS.contains(&file) {
        ColorRule::Random
    } else {
        ColorRule::Uncolored
    }
}

fn draw_saturation(random: &mut RandomSource) -> f64 {
    random.get(MIN_SATURATION, MAX_SATURATION) as f64
}

/// Monster style with an optional precomputed bounds table.
#[derive(Debug, Clone, Default)]
pub struct Monster {
    bounds: PartsDimensions,
}

impl Monster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict recoloring of known parts to their recorded bounding boxes.
    pub fn with_bounds(bounds: PartsDimensions) -> Self {
        Self { bounds }
    }
}

impl PartsStyle for Monster {
    /// One entry per selected part, in part order.
    type Args = Vec<Option<PartColor>>;
    type Output = RgbaImage;

    fn name(&self) -> &'static str {
        "monster"
    }

    fn part_types(&self) -> &'static [&'static str] {
        PART_TYPES
    }

    fn additional_arguments(
        &self,
        _seed: &str,
        _size: u32,
        parts: &SelectedParts,
        random: &mut RandomSource,
    ) -> Result<Self::Args, GeneratorError> {
        let main = PartColor {
            hue: normalize_hue(random.get(0, 359)),
            saturation: draw_saturation(random),
        };

        let colors = parts
            .iter()
            .map(|part| match color_rule(part.part_type, &part.candidate) {
                ColorRule::Main => Some(main),
                ColorRule::Range(low, high) => Some(PartColor {
                    hue: normalize_hue(random.get(low, high)),
                    saturation: draw_saturation(random),
                }),
                ColorRule::Random => Some(PartColor {
                    hue: normalize_hue(random.get(0, 359)),
                    saturation: draw_saturation(random),
                }),
                ColorRule::Uncolored => None,
            })
            .collect();
        Ok(colors)
    }

    fn render(
        &self,
        parts: &SelectedParts,
        colors: Self::Args,
        parts_dir: &Path,
    ) -> Result<RgbaImage, GeneratorError> {
        let mut monster = raster::create_image(Background::White, SIZE);

        for (part, color) in parts.iter().zip(colors) {
            match color {
                Some(PartColor { hue, saturation }) => {
                    let mut image = raster::load_part(parts_dir, &part.candidate)?;
                    let bounds = self.bounds.get(&part.candidate).copied();
                    raster::colorize_image(&mut image, hue, saturation, bounds);
                    raster::combine_images(&mut monster, Layer::Image(&image), parts_dir)?;
                }
                None => {
                    raster::combine_images(&mut monster, Layer::File(&part.candidate), parts_dir)?;
                }
            }
        }

        Ok(monster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SelectedPart;
    use crate::raster::Bounds;
    use crate::test_helpers::write_png_part;
    use image::Rgba;
    use tempfile::TempDir;

    fn selected(items: &[(&'static str, &str)]) -> SelectedParts {
        SelectedParts::new(
            items
                .iter()
                .map(|(t, c)| SelectedPart {
                    part_type: t,
                    candidate: c.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn color_rules() {
        assert_eq!(color_rule("body", "body_7.png"), ColorRule::Main);
        assert_eq!(color_rule("arms", "arms_S8.png"), ColorRule::Main);
        assert_eq!(color_rule("hair", "hair_S4.png"), ColorRule::Range(216, 270));
        assert_eq!(color_rule("mouth", "mouth_9.png"), ColorRule::Range(-18, 18));
        assert_eq!(color_rule("legs", "legs_S12.png"), ColorRule::Random);
        assert_eq!(color_rule("eyes", "eyes_1.png"), ColorRule::Uncolored);
    }

    #[test]
    fn color_rules_use_file_name_of_nested_candidates() {
        assert_eq!(color_rule("arms", "arms/arms_S8.png"), ColorRule::Main);
    }

    #[test]
    fn arguments_follow_rules() {
        let parts = selected(&[
            ("legs", "legs_S5.png"),
            ("hair", "hair_S6.png"),
            ("body", "body_2.png"),
            ("eyes", "eyes_1.png"),
        ]);
        let mut random = RandomSource::new();
        random.seed("monster");
        let colors = Monster::new()
            .additional_arguments("monster", 80, &parts, &mut random)
            .unwrap();

        assert_eq!(colors.len(), 4);
        let legs = colors[0].unwrap();
        let body = colors[2].unwrap();
        assert_eq!(legs, body, "same-color parts share the main color");

        let hair = colors[1].unwrap();
        assert!(hair.hue >= 342 || hair.hue <= 18, "reddish hue, got {}", hair.hue);
        assert!((25.0..=100.0).contains(&hair.saturation));

        assert_eq!(colors[3], None);
    }

    #[test]
    fn arguments_are_reproducible() {
        let parts = selected(&[("arms", "arms_3.png"), ("body", "body_1.png")]);
        let run = || {
            let mut random = RandomSource::new();
            random.seed("abc");
            Monster::new()
                .additional_arguments("abc", 80, &parts, &mut random)
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn render_recolors_only_inside_recorded_bounds() {
        let tmp = TempDir::new().unwrap();
        let gray = Rgba([128, 128, 128, 255]);
        write_png_part(tmp.path(), "body_1.png", SIZE, gray.0);
        let parts = selected(&[("body", "body_1.png")]);
        let colors = || {
            vec![Some(PartColor {
                hue: 240,
                saturation: 100.0,
            })]
        };

        let mut bounds = PartsDimensions::new();
        bounds.insert(
            "body_1.png".into(),
            Bounds {
                left: 10,
                top: 10,
                right: 19,
                bottom: 19,
            },
        );
        let bounded = Monster::with_bounds(bounds)
            .render(&parts, colors(), tmp.path())
            .unwrap();
        assert_ne!(*bounded.get_pixel(10, 10), gray);
        assert_ne!(*bounded.get_pixel(19, 19), gray);
        assert_eq!(*bounded.get_pixel(5, 5), gray);
        assert_eq!(*bounded.get_pixel(20, 15), gray);
        assert_eq!(*bounded.get_pixel(100, 100), gray);

        let full = Monster::new().render(&parts, colors(), tmp.path()).unwrap();
        assert_ne!(*full.get_pixel(5, 5), gray);
        assert_eq!(full.get_pixel(15, 15), bounded.get_pixel(15, 15));
    }
}
