//! Final resize and PNG encoding.

use image::imageops::FilterType;
use image::{ImageEncoder, RgbaImage};
use super::MAX_SIZE;
use tracing::warn;

/// Resize the native canvas to `size × size` and encode it as PNG.
///
/// This is the last step before the bytes leave the pipeline, so failures
/// degrade to an empty buffer instead of an error.
pub fn get_resized_image_data(image: &RgbaImage, size: u32) -> Vec<u8> {
    if size == 0 || image.width() == 0 || image.height() == 0 {
        return Vec::new();
    }
    if size > MAX_SIZE {
        warn!(size, max = MAX_SIZE, "requested avatar size too large");
        return Vec::new();
    }

    let resized;
    let output = if image.dimensions() == (size, size) {
        image
    } else {
        resized = image::imageops::resize(image, size, size, FilterType::Lanczos3);
        &resized
    };

    let mut bytes = Vec::new();
    let encoded = image::codecs::png::PngEncoder::new(&mut bytes).write_image(
        output.as_raw(),
        output.width(),
        output.height(),
        image::ExtendedColorType::Rgba8,
    );
    match encoded {
        Ok(()) => bytes,
        Err(e) => {
            warn!(error = %e, size, "PNG encoding failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::decode_png;
    use image::Rgba;

    #[test]
    fn native_size_is_lossless() {
        let img = RgbaImage::from_fn(4, 4, |x, y| Rgba([x as u8 * 60, y as u8 * 60, 7, 255]));
        let bytes = get_resized_image_data(&img, 4);
        assert_eq!(decode_png(&bytes), img);
    }

    #[test]
    fn resizes_to_requested_size() {
        let img = RgbaImage::from_pixel(120, 120, Rgba([10, 20, 30, 255]));
        let bytes = get_resized_image_data(&img, 48);
        let decoded = decode_png(&bytes);
        assert_eq!(decoded.dimensions(), (48, 48));
        assert_eq!(*decoded.get_pixel(24, 24), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn png_signature() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let bytes = get_resized_image_data(&img, 2);
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn zero_size_yields_empty_output() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        assert!(get_resized_image_data(&img, 0).is_empty());
    }

    #[test]
    fn oversized_request_yields_empty_output() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        assert!(get_resized_image_data(&img, MAX_SIZE + 1).is_empty());
        assert!(get_resized_image_data(&img, u32::MAX).is_empty());
        assert!(!get_resized_image_data(&img, MAX_SIZE).is_empty());
    }

    #[test]
    fn encoding_is_deterministic() {
        let img = RgbaImage::from_fn(16, 16, |x, y| Rgba([x as u8, y as u8, 3, 255]));
        assert_eq!(
            get_resized_image_data(&img, 10),
            get_resized_image_data(&img, 10)
        );
    }
}
