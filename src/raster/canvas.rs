//! Canvas operations used by the raster styles.
//!
//! Canvases are plain `RgbaImage`s owned by the build that created them. A
//! loaded part lives only inside [`combine_images`] (or inside the style's
//! render step when it needs recoloring first) and is dropped as soon as it
//! has been copied onto the base.

use super::RasterError;
use super::bounds::Bounds;
use crate::color;
use image::{ImageReader, Rgba, RgbaImage};
use std::path::Path;

/// Base fill of a fresh canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    White,
    Black,
    Transparent,
}

impl Background {
    fn pixel(self) -> Rgba<u8> {
        match self {
            Background::White => Rgba([255, 255, 255, 255]),
            Background::Black => Rgba([0, 0, 0, 255]),
            Background::Transparent => Rgba([0, 0, 0, 0]),
        }
    }
}

/// A layer to composite: either a part file or an already loaded canvas.
#[derive(Debug, Clone, Copy)]
pub enum Layer<'a> {
    /// Path relative to the parts directory.
    File(&'a str),
    Image(&'a RgbaImage),
}

/// Allocate a `size × size` canvas.
pub fn create_image(background: Background, size: u32) -> RgbaImage {
    RgbaImage::from_pixel(size, size, background.pixel())
}

/// Load and decode a part file relative to `parts_dir`.
pub fn load_part(parts_dir: &Path, file: &str) -> Result<RgbaImage, RasterError> {
    let path = parts_dir.join(file);
    let reader = ImageReader::open(&path).map_err(|e| RasterError::PartLoad {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    let img = reader.decode().map_err(|e| RasterError::PartLoad {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    Ok(img.to_rgba8())
}

/// Composite `layer` onto `base` at the origin with alpha blending.
///
/// A part file that cannot be loaded is an error: the inventory promised it.
pub fn combine_images(
    base: &mut RgbaImage,
    layer: Layer<'_>,
    parts_dir: &Path,
) -> Result<(), RasterError> {
    match layer {
        Layer::File(file) => {
            let part = load_part(parts_dir, file)?;
            image::imageops::overlay(base, &part, 0, 0);
        }
        Layer::Image(part) => image::imageops::overlay(base, part, 0, 0),
    }
    Ok(())
}

/// Replace hue and saturation of every gated pixel, keeping lightness and
/// alpha. With `bounds`, only pixels inside the (inclusive) box are visited.
pub fn colorize_image(image: &mut RgbaImage, hue: u16, saturation: f64, bounds: Option<Bounds>) {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return;
    }
    let region = bounds.unwrap_or(Bounds {
        left: 0,
        top: 0,
        right: width - 1,
        bottom: height - 1,
    });
    let left = region.left as usize;
    let top = region.top as usize;
    let columns = (region.right.min(width - 1) as usize + 1).saturating_sub(left);
    let rows = (region.bottom.min(height - 1) as usize + 1).saturating_sub(top);

    for row in image.rows_mut().skip(top).take(rows) {
        for pixel in row.skip(left).take(columns) {
            if color::is_colorizable(*pixel) {
                *pixel = color::recolor(*pixel, hue, saturation);
            }
        }
    }
}

/// Flood-fill the 4-connected region around `(x, y)` that shares the start
/// pixel's exact RGBA value with an opaque HSL color.
pub fn fill_image(
    image: &mut RgbaImage,
    hue: u16,
    saturation: f64,
    lightness: f64,
    x: u32,
    y: u32,
) {
    let (width, height) = image.dimensions();
    if x >= width || y >= height {
        return;
    }
    let [r, g, b] = color::hsl_to_rgb(hue, saturation, lightness);
    let fill = Rgba([r, g, b, 255]);
    let target = *image.get_pixel(x, y);
    if target == fill {
        return;
    }

    let mut stack = vec![(x, y)];
    while let Some((px, py)) = stack.pop() {
        if *image.get_pixel(px, py) != target {
            continue;
        }
        image.put_pixel(px, py, fill);
        if px > 0 {
            stack.push((px - 1, py));
        }
        if px + 1 < width {
            stack.push((px + 1, py));
        }
        if py > 0 {
            stack.push((px, py - 1));
        }
        if py + 1 < height {
            stack.push((px, py + 1));
        }
    }
}
