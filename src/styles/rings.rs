//! Rings style: three concentric rings of eight arc segments each.
//!
//! Per ring, in order from the outside in, the seeded source draws a segment
//! mask (`1..=255`, bit `n` lights segment `n`) and an HSL color. In mono
//! mode every ring reuses the first ring's color; the draws still happen, so
//! a seed gives the same segments in both modes.

use crate::color::{hsl_to_rgb, normalize_hue, to_hex};
use crate::generator::{Avatar, Generator, run_seeded};
use crate::random::RandomSource;
use maud::html;
use std::f64::consts::PI;
use std::fmt::Write;

const RING_COUNT: usize = 3;
const SEGMENTS: u32 = 8;
const OUTER_RADIUS: f64 = 42.0;
const RING_SPACING: f64 = 13.0;
const STROKE_WIDTH: f64 = 10.0;
const BACKGROUND: &str = "#eeeeee";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    /// Lit segments, one bit each.
    pub mask: u8,
    pub color: String,
}

/// Draw the rings for the currently seeded source.
pub fn draw_rings(random: &mut RandomSource, mono: bool) -> Vec<Ring> {
    let mut rings: Vec<Ring> = Vec::with_capacity(RING_COUNT);
    for _ in 0..RING_COUNT {
        let mask = random.get(1, 255) as u8;
        let hue = normalize_hue(random.get(0, 359));
        let saturation = random.get(45, 90) as f64;
        let lightness = random.get(35, 65) as f64;
        let color = match rings.first() {
            Some(first) if mono => first.color.clone(),
            _ => to_hex(hsl_to_rgb(hue, saturation, lightness)),
        };
        rings.push(Ring { mask, color });
    }
    rings
}

fn point(radius: f64, angle: f64) -> (f64, f64) {
    (50.0 + radius * angle.cos(), 50.0 + radius * angle.sin())
}

/// Arc subpaths for the lit segments of one ring.
fn ring_path(radius: f64, mask: u8) -> String {
    let step = 2.0 * PI / SEGMENTS as f64;
    let mut path = String::new();
    for segment in 0..SEGMENTS {
        if mask & (1 << segment) == 0 {
            continue;
        }
        let (x0, y0) = point(radius, segment as f64 * step);
        let (x1, y1) = point(radius, (segment + 1) as f64 * step);
        let _ = write!(path, "M{x0:.2},{y0:.2}A{radius},{radius} 0 0 1 {x1:.2},{y1:.2}");
    }
    path
}

/// Render rings as an SVG document on a 100 × 100 view box.
pub fn render(rings: &[Ring], size: u32) -> String {
    html! {
        svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100"
            width=(size) height=(size) {
            circle cx="50" cy="50" r="50" fill=(BACKGROUND) {}
            @for (i, ring) in rings.iter().enumerate() {
                path fill="none" stroke=(ring.color) stroke-width=(STROKE_WIDTH)
                    d=(ring_path(OUTER_RADIUS - i as f64 * RING_SPACING, ring.mask)) {}
            }
        }
    }
    .into_string()
}

/// Rings generator with its own random source.
#[derive(Debug, Clone, Default)]
pub struct Rings {
    mono: bool,
    random: RandomSource,
}

impl Rings {
    pub fn new(mono: bool) -> Self {
        Self {
            mono,
            random: RandomSource::new(),
        }
    }

    pub fn random(&mut self) -> &mut RandomSource {
        &mut self.random
    }
}

impl Generator for Rings {
    fn build(&mut self, seed: &str, size: u32) -> Option<Avatar> {
        let mono = self.mono;
        run_seeded(&mut self.random, "rings", seed, size, |random| {
            let rings = draw_rings(random, mono);
            Ok(Avatar::Svg(render(&rings, size)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: &str) -> RandomSource {
        let mut random = RandomSource::new();
        random.seed(seed);
        random
    }

    #[test]
    fn three_rings_with_nonempty_masks() {
        let rings = draw_rings(&mut seeded("ring"), false);
        assert_eq!(rings.len(), RING_COUNT);
        assert!(rings.iter().all(|r| r.mask != 0));
        assert!(rings.iter().all(|r| r.color.starts_with('#') && r.color.len() == 7));
    }

    #[test]
    fn mono_shares_first_color_and_keeps_masks() {
        let colored = draw_rings(&mut seeded("ring"), false);
        let mono = draw_rings(&mut seeded("ring"), true);
        assert!(mono.iter().all(|r| r.color == colored[0].color));
        let masks = |rings: &[Ring]| rings.iter().map(|r| r.mask).collect::<Vec<_>>();
        assert_eq!(masks(&mono), masks(&colored));
    }

    #[test]
    fn ring_path_has_one_arc_per_lit_segment() {
        assert_eq!(ring_path(10.0, 0b1010_0001).matches('A').count(), 3);
        assert_eq!(ring_path(10.0, 0xff).matches('M').count(), 8);
    }

    #[test]
    fn render_has_background_and_rings() {
        let rings = draw_rings(&mut seeded("abc"), false);
        let svg = render(&rings, 64);
        assert!(svg.contains(r#"width="64""#));
        assert!(svg.contains(r##"fill="#eeeeee""##));
        assert_eq!(svg.matches("<path").count(), RING_COUNT);
    }

    #[test]
    fn build_is_deterministic_and_resets() {
        let mut rings = Rings::new(false);
        let a = rings.build("someone", 80);
        assert!(a.is_some());
        assert_eq!(a, rings.build("someone", 80));
        assert_ne!(a, rings.build("someone else", 80));
        assert!(!rings.random().is_seeded());
    }
}
