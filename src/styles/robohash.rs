//! Robohash style: SVG robot assembled from fragment parts.
//!
//! Candidates are preloaded SVG fragments (the inventory strips the outer
//! `<svg>`). After part selection two more draws pick a foreground color and
//! a background color from fixed palettes. The template is a full-size
//! background rectangle followed by a group carrying the foreground fill,
//! with the fragments inside in part order. Fragments that set their own
//! `fill` keep it.
//!
//! Fragments are drawn on a 320 × 320 view box; the requested size only sets
//! the outer `width`/`height`.

use crate::generator::{GeneratorError, PartsStyle, SelectedParts};
use crate::inventory::PartFormat;
use crate::random::RandomSource;
use maud::{PreEscaped, html};
use std::path::Path;

pub const PART_TYPES: &[&str] = &["body", "face", "eyes", "mouth", "accessory"];

const VIEW_BOX: &str = "0 0 320 320";

const FOREGROUND_COLORS: &[&str] = &[
    "#e53935", "#d81b60", "#8e24aa", "#5e35b1", "#3949ab", "#1e88e5", "#039be5", "#00acc1",
    "#00897b", "#43a047", "#7cb342", "#c0ca33", "#fdd835", "#ffb300", "#fb8c00", "#f4511e",
];

const BACKGROUND_COLORS: &[&str] = &[
    "#ffebee", "#fce4ec", "#f3e5f5", "#ede7f6", "#e8eaf6", "#e3f2fd", "#e1f5fe", "#e0f7fa",
    "#e0f2f1", "#e8f5e9", "#f1f8e9", "#f9fbe7", "#fffde7", "#fff8e1", "#fff3e0", "#fbe9e7",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobohashArgs {
    pub foreground: &'static str,
    pub background: &'static str,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Robohash;

impl PartsStyle for Robohash {
    type Args = RobohashArgs;
    type Output = String;

    fn name(&self) -> &'static str {
        "robohash"
    }

    fn part_types(&self) -> &'static [&'static str] {
        PART_TYPES
    }

    fn format(&self) -> PartFormat {
        PartFormat::Svg
    }

    fn additional_arguments(
        &self,
        _seed: &str,
        size: u32,
        _parts: &SelectedParts,
        random: &mut RandomSource,
    ) -> Result<RobohashArgs, GeneratorError> {
        let foreground = FOREGROUND_COLORS[random.index(FOREGROUND_COLORS.len())];
        let background = BACKGROUND_COLORS[random.index(BACKGROUND_COLORS.len())];
        Ok(RobohashArgs {
            foreground,
            background,
            size,
        })
    }

    fn render(
        &self,
        parts: &SelectedParts,
        args: RobohashArgs,
        _parts_dir: &Path,
    ) -> Result<String, GeneratorError> {
        let markup = html! {
            svg xmlns="http://www.w3.org/2000/svg" viewBox=(VIEW_BOX)
                width=(args.size) height=(args.size) {
                rect width="320" height="320" fill=(args.background) {}
                g fill=(args.foreground) {
                    @for part in parts.iter() {
                        (PreEscaped(part.candidate.as_str()))
                    }
                }
            }
        };
        Ok(markup.into_string())
    }
}
