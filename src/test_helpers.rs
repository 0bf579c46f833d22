//! Shared test utilities: synthetic part files.
//!
//! Real part sets are artwork that does not belong in the test suite, so
//! tests build tiny parts directories on the fly inside a `TempDir`.
//!
//! ```rust
//! let tmp = TempDir::new().unwrap();
//! write_png_part(tmp.path(), "body_1.png", 16, [200, 80, 80, 255]);
//! write_svg_part(tmp.path(), "eyes-0.svg", r#"<circle r="2"/>"#);
//! ```

use image::{ImageEncoder, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Encode an RGBA image as PNG at `dir/name`.
pub fn write_png_image(dir: &Path, name: &str, img: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(&path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
    path
}

/// Write a solid-color square part.
pub fn write_png_part(dir: &Path, name: &str, size: u32, rgba: [u8; 4]) -> PathBuf {
    write_png_image(dir, name, &RgbaImage::from_pixel(size, size, Rgba(rgba)))
}

/// Write a part that is transparent except for an opaque rectangle.
pub fn write_png_rect(
    dir: &Path,
    name: &str,
    size: u32,
    rect: (u32, u32, u32, u32),
    rgba: [u8; 4],
) -> PathBuf {
    let (x0, y0, x1, y1) = rect;
    let img = RgbaImage::from_fn(size, size, |x, y| {
        if x >= x0 && x <= x1 && y >= y0 && y <= y1 {
            Rgba(rgba)
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    write_png_image(dir, name, &img)
}

/// Write an SVG document wrapping `inner`.
pub fn write_svg_part(dir: &Path, name: &str, inner: &str) -> PathBuf {
    let path = dir.join(name);
    let doc = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 320 320\">\n{inner}\n</svg>\n"
    );
    std::fs::write(&path, doc).unwrap();
    path
}

/// Fill a directory with one solid part per type and `variants` variants.
pub fn populate_png_parts(dir: &Path, part_types: &[&str], variants: u32, size: u32) {
    for (t, part_type) in part_types.iter().enumerate() {
        for v in 0..variants {
            let shade = (40 + t as u32 * 30 + v * 7).min(250) as u8;
            write_png_rect(
                dir,
                &format!("{part_type}_{v}.png"),
                size,
                (v % size, t as u32 % size, size - 1, size - 1),
                [shade, 255 - shade, 128, 255],
            );
        }
    }
}

/// Decode PNG bytes back into an RGBA image.
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .unwrap()
        .to_rgba8()
}
