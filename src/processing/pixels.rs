//! Raw interleaved RGB pixel storage.

use super::error::{StegoError, StegoResult};
use super::spiral::Coordinate;

/// Channels per pixel (R, G, B; no alpha).
pub const CHANNELS: usize = 3;

/// Offset of the blue channel inside a pixel.
pub const BLUE: usize = 2;

/// A `width x height` image as `R,G,B` bytes, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGB bytes, checking that the length matches the geometry.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> StegoResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS));

        if expected != Some(data.len()) {
            return Err(StegoError::InvalidGeometry {
                width,
                height,
                len: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels, which is also the embedding capacity in bits.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn blue_index(&self, at: Coordinate) -> usize {
        (at.y as usize * self.width as usize + at.x as usize) * CHANNELS + BLUE
    }

    /// Low bit of the blue channel.
    pub fn blue_lsb(&self, at: Coordinate) -> bool {
        self.data[self.blue_index(at)] & 1 == 1
    }

    /// Overwrite the low bit of the blue channel, leaving every other bit alone.
    pub fn set_blue_lsb(&mut self, at: Coordinate, bit: bool) {
        let index = self.blue_index(at);
        self.data[index] = (self.data[index] & 0xFE) | u8::from(bit);
    }
}
