//! Raster compositing in pure Rust on top of the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Canvas** | `image::RgbaImage::from_pixel` |
//! | **Load part** | `image::ImageReader` (PNG decoder) |
//! | **Composite** | `image::imageops::overlay` (alpha "over" blending) |
//! | **Recolor** | row iteration over the bounded region (`rows_mut`) |
//! | **Flood fill** | `get_pixel` / `put_pixel` on a work stack |
//! | **Resize → PNG** | Lanczos3 + `image::codecs::png::PngEncoder` |
//! | **Bounding boxes** | full pixel scan, parallelized with rayon |
//!
//! The module is split into:
//! - **Canvas**: canvas creation, part loading, compositing, recoloring, flood fill
//! - **Encode**: final resize and PNG encoding
//! - **Bounds**: the offline bounding-box table used to speed up recoloring

mod bounds;
mod canvas;
mod encode;

pub use bounds::{
    Bounds, PartsDimensions, get_parts_dimensions, image_bounds, load_parts_dimensions,
};
pub use canvas::{
    Background, Layer, colorize_image, combine_images, create_image, fill_image, load_part,
};
pub use encode::get_resized_image_data;

use std::path::PathBuf;
use thiserror::Error;

/// Largest avatar edge, in pixels, any generator will produce.
pub const MAX_SIZE: u32 = 1024;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to load part {path}: {reason}")]
    PartLoad { path: PathBuf, reason: String },
}
