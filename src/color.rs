//! Color transforms shared by the raster and vector styles.
//!
//! Hues are integer degrees. Saturation and lightness are percentages on a
//! `0.0..=100.0` scale; they stay floating point because recoloring keeps each
//! pixel's own (fractional) lightness.
//!
//! ## Recoloring gate
//!
//! Part images are drawn with black outlines, white highlights and transparent
//! surroundings. Only the pixels in between get tinted:
//!
//! | Check | Colorizable when |
//! |---|---|
//! | Lightness | `10 < l < 99` |
//! | Alpha (GD scale, 127 = transparent) | `alpha < 115` |
//!
//! The same gate decides which pixels count when precomputing part bounding
//! boxes, so both must stay in sync.

use image::Rgba;

/// Lower exclusive lightness bound for recoloring.
pub const MIN_LIGHTNESS: f64 = 10.0;

/// Upper exclusive lightness bound for recoloring.
pub const MAX_LIGHTNESS: f64 = 99.0;

/// Exclusive GD alpha bound for recoloring (0 = opaque, 127 = transparent).
pub const MAX_ALPHA: u8 = 115;

/// Map any hue (including negative ones) into `[0, 360)`.
pub fn normalize_hue(hue: i64) -> u16 {
    hue.rem_euclid(360) as u16
}

/// Convert HSL to 8-bit RGB.
///
/// `hue` is in degrees `[0, 360)`; `saturation` and `lightness` in `[0, 100]`.
pub fn hsl_to_rgb(hue: u16, saturation: f64, lightness: f64) -> [u8; 3] {
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        let v = channel(l);
        return [v, v, v];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = f64::from(hue % 360) / 360.0;

    [
        channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        channel(hue_to_rgb(p, q, h)),
        channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    ]
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// HSL lightness of an RGB triple, on a `0..=100` scale.
pub fn lightness(rgb: [u8; 3]) -> f64 {
    let max = rgb.iter().copied().max().unwrap_or(0);
    let min = rgb.iter().copied().min().unwrap_or(0);
    (f64::from(max) + f64::from(min)) / 2.0 / 255.0 * 100.0
}

/// Convert 8-bit alpha (255 = opaque) to the 7-bit GD scale (127 = transparent).
pub fn gd_alpha(alpha: u8) -> u8 {
    127 - (alpha >> 1)
}

/// Whether a pixel passes the recoloring gate.
pub fn is_colorizable(pixel: Rgba<u8>) -> bool {
    let [r, g, b, a] = pixel.0;
    let l = lightness([r, g, b]);
    l > MIN_LIGHTNESS && l < MAX_LIGHTNESS && gd_alpha(a) < MAX_ALPHA
}

/// Replace hue and saturation of a pixel, keeping its lightness and alpha.
pub fn recolor(pixel: Rgba<u8>, hue: u16, saturation: f64) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let [nr, ng, nb] = hsl_to_rgb(hue, saturation, lightness([r, g, b]));
    Rgba([nr, ng, nb, a])
}

/// Format an RGB triple as a `#rrggbb` string.
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Hue normalization
    // =========================================================================

    #[test]
    fn normalize_hue_known_values() {
        assert_eq!(normalize_hue(-1), 359);
        assert_eq!(normalize_hue(360), 0);
        assert_eq!(normalize_hue(-360), 0);
        assert_eq!(normalize_hue(0), 0);
        assert_eq!(normalize_hue(725), 5);
        assert_eq!(normalize_hue(-18), 342);
    }

    #[test]
    fn normalize_hue_is_idempotent_and_bounded() {
        for h in -1000..1000 {
            let n = normalize_hue(h);
            assert!(n < 360);
            assert_eq!(normalize_hue(i64::from(n)), n);
        }
    }

    // =========================================================================
    // HSL → RGB
    // =========================================================================

    #[test]
    fn hsl_black_and_white_fixed_points() {
        assert_eq!(hsl_to_rgb(0, 0.0, 0.0), [0, 0, 0]);
        for hue in [0, 90, 180, 270, 359] {
            for sat in [0.0, 25.0, 100.0] {
                assert_eq!(hsl_to_rgb(hue, sat, 100.0), [255, 255, 255]);
                assert_eq!(hsl_to_rgb(hue, sat, 0.0), [0, 0, 0]);
            }
        }
    }

    #[test]
    fn hsl_primary_colors() {
        assert_eq!(hsl_to_rgb(0, 100.0, 50.0), [255, 0, 0]);
        assert_eq!(hsl_to_rgb(120, 100.0, 50.0), [0, 255, 0]);
        assert_eq!(hsl_to_rgb(240, 100.0, 50.0), [0, 0, 255]);
    }

    #[test]
    fn hsl_gray_ignores_hue() {
        assert_eq!(hsl_to_rgb(0, 0.0, 50.0), hsl_to_rgb(200, 0.0, 50.0));
        assert_eq!(hsl_to_rgb(0, 0.0, 50.0), [128, 128, 128]);
    }

    #[test]
    fn recolor_preserves_lightness_roughly() {
        let px = Rgba([200, 100, 50, 255]);
        let before = lightness([200, 100, 50]);
        let out = recolor(px, 200, 80.0);
        let after = lightness([out[0], out[1], out[2]]);
        assert!((before - after).abs() < 1.0, "{before} vs {after}");
        assert_eq!(out[3], 255);
    }

    // =========================================================================
    // Gate
    // =========================================================================

    #[test]
    fn gd_alpha_mapping() {
        assert_eq!(gd_alpha(255), 0);
        assert_eq!(gd_alpha(0), 127);
        assert_eq!(gd_alpha(26), 114);
        assert_eq!(gd_alpha(24), 115);
    }

    #[test]
    fn gate_rejects_black_white_and_transparent() {
        assert!(!is_colorizable(Rgba([0, 0, 0, 255])));
        assert!(!is_colorizable(Rgba([255, 255, 255, 255])));
        assert!(!is_colorizable(Rgba([128, 64, 64, 0])));
        assert!(!is_colorizable(Rgba([128, 64, 64, 24])));
        assert!(is_colorizable(Rgba([128, 64, 64, 26])));
        assert!(is_colorizable(Rgba([128, 64, 64, 255])));
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(to_hex([255, 0, 16]), "#ff0010");
    }
}
