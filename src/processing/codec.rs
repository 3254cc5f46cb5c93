//! # Image Codec Boundary
//!
//! The pipeline never touches an image library directly. It asks an
//! [`ImageCodec`] for an RGB [`PixelBuffer`] and hands the modified buffer
//! back for encoding. [`PngCodec`] is the implementation used by the
//! service: it reads anything the `image` crate understands and always
//! writes lossless PNG, so the hidden bits survive.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use super::error::{StegoError, StegoResult};
use super::pixels::PixelBuffer;

/// Decode/encode capability required by the steganography pipeline.
pub trait ImageCodec: Send + Sync {
    /// Decode compressed bytes into 3-channel RGB, whatever the source layout.
    fn decode_rgb(&self, bytes: &[u8]) -> StegoResult<PixelBuffer>;

    /// Encode an RGB buffer. Must be lossless.
    fn encode_rgb(&self, pixels: &PixelBuffer) -> StegoResult<Vec<u8>>;

    /// Media type of the encoded output.
    fn media_type(&self) -> &'static str;
}

/// `image`-crate backed codec that always emits PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn decode_rgb(&self, bytes: &[u8]) -> StegoResult<PixelBuffer> {
        let img = image::load_from_memory(bytes).map_err(StegoError::Decode)?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        PixelBuffer::new(width, height, rgb.into_raw())
    }

    fn encode_rgb(&self, pixels: &PixelBuffer) -> StegoResult<Vec<u8>> {
        let (width, height) = (pixels.width(), pixels.height());
        let img = RgbImage::from_raw(width, height, pixels.as_bytes().to_vec()).ok_or(
            StegoError::InvalidGeometry {
                width,
                height,
                len: pixels.as_bytes().len(),
            },
        )?;

        let mut output_bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)
            .map_err(StegoError::Encode)?;

        Ok(output_bytes)
    }

    fn media_type(&self) -> &'static str {
        "image/png"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn test_png_is_lossless() {
        let img = RgbImage::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 70, 0x55]));
        let pixels = PngCodec.decode_rgb(&png_bytes(&img)).unwrap();
        assert_eq!((pixels.width(), pixels.height()), (5, 3));
        assert_eq!(pixels.as_bytes(), img.as_raw().as_slice());

        let reencoded = PngCodec.encode_rgb(&pixels).unwrap();
        assert_eq!(PngCodec.decode_rgb(&reencoded).unwrap(), pixels);
    }

    #[test]
    fn test_alpha_is_dropped() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 128]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let pixels = PngCodec.decode_rgb(&bytes).unwrap();
        assert_eq!(pixels.as_bytes(), [10u8, 20, 30].repeat(4).as_slice());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(
            PngCodec.decode_rgb(b"definitely not an image"),
            Err(StegoError::Decode(_))
        ));
    }
}
