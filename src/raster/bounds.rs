//! Bounding boxes of the recolorable region of each part.
//!
//! Recoloring visits every pixel of a part, but most of a part is empty
//! space. [`get_parts_dimensions`] scans each part once and records the
//! smallest box containing every pixel that passes the recoloring gate
//! ([`color::is_colorizable`]). The table is computed offline (the
//! `dimensions` CLI command), saved as JSON, and loaded by styles that
//! recolor parts.
//!
//! ```json
//! { "arms_S8.png": { "left": 12, "top": 40, "right": 107, "bottom": 93 } }
//! ```

use super::RasterError;
use super::canvas::load_part;
use crate::color;
use crate::inventory::Parts;
use image::RgbaImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Bounds per part file (relative path).
pub type PartsDimensions = BTreeMap<String, Bounds>;

/// Smallest box containing all gated pixels, or `None` if there are none.
pub fn image_bounds(image: &RgbaImage) -> Option<Bounds> {
    let mut found: Option<Bounds> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if !color::is_colorizable(*pixel) {
            continue;
        }
        found = Some(match found {
            None => Bounds {
                left: x,
                top: y,
                right: x,
                bottom: y,
            },
            Some(b) => Bounds {
                left: b.left.min(x),
                top: b.top.min(y),
                right: b.right.max(x),
                bottom: b.bottom.max(y),
            },
        });
    }
    found
}

/// Compute bounds for every cataloged part file.
///
/// Parts without any recolorable pixel are left out of the table.
pub fn get_parts_dimensions(
    parts_dir: &Path,
    parts: &Parts,
) -> Result<PartsDimensions, RasterError> {
    let files: Vec<&String> = parts.values().flatten().collect();
    let measured: Vec<(String, Option<Bounds>)> = files
        .par_iter()
        .map(|file| {
            let image = load_part(parts_dir, file)?;
            Ok(((*file).clone(), image_bounds(&image)))
        })
        .collect::<Result<_, RasterError>>()?;

    Ok(measured
        .into_iter()
        .filter_map(|(file, bounds)| bounds.map(|b| (file, b)))
        .collect())
}

/// Load a bounds table saved as JSON.
pub fn load_parts_dimensions(path: &Path) -> Result<PartsDimensions, RasterError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
