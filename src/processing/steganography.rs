//! # Spiral LSB Steganography
//!
//! Hides a payload in the least significant bit of the blue channel, one
//! bit per pixel, visiting pixels in [spiral order](super::spiral).
//!
//! ## Algorithm
//!
//! ### Embedding
//! 1. Frame the payload as `name || ":::SEP:::" || content`
//! 2. Expand it to bits (MSB first) and append an all-zero terminator byte
//! 3. Walk the spiral path; for each pixel clear the blue LSB and set it to
//!    the next bit
//! 4. Stop once the bits run out; every later pixel stays untouched
//! 5. Re-encode losslessly (PNG)
//!
//! ### Extraction
//! 1. Walk the same spiral path reading blue LSBs
//! 2. Group bits into bytes; the first all-zero byte ends the scan and is
//!    dropped
//! 3. Regroup into bytes and split at the first separator
//!
//! ### Capacity
//! One bit per pixel: a `W x H` carrier holds `W * H` bits including the
//! 8 terminator bits. What does not fit is either dropped (the default,
//! [`CapacityPolicy::Truncate`]) or rejected up front
//! ([`CapacityPolicy::Reject`]).
//!
//! The protocol has no escaping: a zero byte inside the content ends
//! extraction early.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::bitstream::{bytes_to_bits, terminator, BitString, TERMINATOR_BITS};
use super::codec::ImageCodec;
use super::error::{StegoError, StegoResult};
use super::framing::{frame, frame_with_end_marker, unframe, Payload};
use super::pixels::PixelBuffer;
use super::spiral::spiral_path;

/// What to do when the payload does not fit in the carrier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityPolicy {
    /// Write as many bits as fit and drop the rest.
    #[default]
    Truncate,
    /// Fail with [`StegoError::CapacityExceeded`] before touching any pixel.
    Reject,
}

/// Knobs for [`embed_payload_bytes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedOptions {
    pub capacity_policy: CapacityPolicy,
    /// Append the legacy `":::STEGO_END:::"` marker after the content.
    pub end_marker: bool,
}

/// How much of the bit stream made it into the carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbedReport {
    /// Payload bits plus the terminator.
    pub bits_requested: usize,
    pub bits_written: usize,
}

impl EmbedReport {
    pub fn truncated(&self) -> bool {
        self.bits_written < self.bits_requested
    }

    pub fn bits_dropped(&self) -> usize {
        self.bits_requested - self.bits_written
    }
}

/// Bits recovered from a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Everything read before the terminator, terminator excluded.
    pub bits: BitString,
    /// `false` when the path ran out before a zero byte was seen.
    pub terminated: bool,
}

/// Result of [`embed_payload_bytes`].
#[derive(Debug, Clone)]
pub struct EmbedOutput {
    /// Encoded carrier with the payload hidden in it.
    pub image: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub report: EmbedReport,
}

/// Bits needed to hide `payload_bits` including the terminator.
pub fn required_bits(payload_bits: usize) -> usize {
    payload_bits + TERMINATOR_BITS
}

/// Write `payload_bits` followed by the terminator into the carrier.
///
/// Only bit 0 of the blue channel of the first `bits_written` pixels along
/// the spiral is modified. Bits that do not fit are silently dropped.
pub fn embed_bits(pixels: &mut PixelBuffer, payload_bits: &BitString) -> EmbedReport {
    let data_with_stop = payload_bits.iter().chain(terminator());
    let path = spiral_path(pixels.width(), pixels.height());

    let mut bits_written = 0;
    for (at, bit) in path.zip(data_with_stop) {
        pixels.set_blue_lsb(at, bit);
        bits_written += 1;
    }

    EmbedReport {
        bits_requested: required_bits(payload_bits.len()),
        bits_written,
    }
}

/// Read blue LSBs along the spiral until the first all-zero byte.
pub fn extract_bits(pixels: &PixelBuffer) -> Extraction {
    let path = spiral_path(pixels.width(), pixels.height());
    let mut bits = BitString::with_capacity(path.len());
    let mut current_byte = 0u8;
    let mut bits_in_byte = 0;

    for at in path {
        let bit = pixels.blue_lsb(at);
        bits.push(bit);
        current_byte = (current_byte << 1) | u8::from(bit);
        bits_in_byte += 1;

        if bits_in_byte == 8 {
            if current_byte == 0 {
                bits.truncate(bits.len() - TERMINATOR_BITS);
                return Extraction {
                    bits,
                    terminated: true,
                };
            }
            current_byte = 0;
            bits_in_byte = 0;
        }
    }

    Extraction {
        bits,
        terminated: false,
    }
}

/// Decode the carrier, hide `payload` in it and re-encode.
///
/// # Errors
/// - [`StegoError::Decode`] if the carrier is not a readable image
/// - [`StegoError::CapacityExceeded`] if the payload does not fit and the
///   policy is [`CapacityPolicy::Reject`]
/// - [`StegoError::Encode`] if the result cannot be written
pub fn embed_payload_bytes(
    codec: &dyn ImageCodec,
    image_bytes: &[u8],
    payload: &Payload,
    options: EmbedOptions,
) -> StegoResult<EmbedOutput> {
    let mut pixels = codec.decode_rgb(image_bytes)?;

    let framed = if options.end_marker {
        frame_with_end_marker(payload)
    } else {
        frame(payload)
    };
    let payload_bits = bytes_to_bits(&framed);

    let required = required_bits(payload_bits.len());
    let available = pixels.pixel_count();
    if options.capacity_policy == CapacityPolicy::Reject && required > available {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }

    let report = embed_bits(&mut pixels, &payload_bits);
    if report.truncated() {
        warn!(
            "Payload truncated: {} of {} bits fit in a {}x{} carrier",
            report.bits_written,
            report.bits_requested,
            pixels.width(),
            pixels.height()
        );
    } else {
        debug!(
            "Embedded {} bits into {}x{} carrier",
            report.bits_written,
            pixels.width(),
            pixels.height()
        );
    }

    let image = codec.encode_rgb(&pixels)?;
    Ok(EmbedOutput {
        image,
        width: pixels.width(),
        height: pixels.height(),
        report,
    })
}

/// Decode the carrier and return every byte recovered before the
/// terminator, without unframing.
pub fn extract_raw_bytes(codec: &dyn ImageCodec, image_bytes: &[u8]) -> StegoResult<Vec<u8>> {
    let pixels = codec.decode_rgb(image_bytes)?;
    let extraction = extract_bits(&pixels);

    if !extraction.terminated {
        warn!(
            "No terminator found in {}x{} carrier; returning {} unterminated bits",
            pixels.width(),
            pixels.height(),
            extraction.bits.len()
        );
    }

    Ok(extraction.bits.to_bytes())
}

/// Decode the carrier and recover the named payload hidden in it.
///
/// # Errors
/// - [`StegoError::Decode`] if the carrier is not a readable image
/// - [`StegoError::FramingMismatch`] if the recovered bytes hold no separator
pub fn extract_payload_bytes(codec: &dyn ImageCodec, image_bytes: &[u8]) -> StegoResult<Payload> {
    let raw = extract_raw_bytes(codec, image_bytes)?;
    unframe(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::spiral::Coordinate;

    fn carrier(width: u32, height: u32) -> PixelBuffer {
        let data = (0..width * height * 3).map(|i| (i * 37 % 251) as u8).collect();
        PixelBuffer::new(width, height, data).unwrap()
    }

    #[test]
    fn test_exact_boundary_drops_terminator() {
        let mut pixels = carrier(4, 4);
        let bits: BitString = "0100100001101001".parse().unwrap();

        let report = embed_bits(&mut pixels, &bits);
        assert_eq!(report.bits_written, 16);
        assert_eq!(report.bits_dropped(), 8);

        let extraction = extract_bits(&pixels);
        assert!(!extraction.terminated);
        assert_eq!(extraction.bits, bits);
    }

    #[test]
    fn test_terminator_written_when_room() {
        let mut pixels = carrier(5, 5);
        let bits = bytes_to_bits(b"Hi");

        let report = embed_bits(&mut pixels, &bits);
        assert!(!report.truncated());
        assert_eq!(report.bits_written, 24);

        let extraction = extract_bits(&pixels);
        assert!(extraction.terminated);
        assert_eq!(extraction.bits.to_bytes(), b"Hi".to_vec());
    }

    #[test]
    fn test_only_blue_lsb_on_path_prefix_changes() {
        let pristine = carrier(6, 5);
        let mut pixels = pristine.clone();
        let bits = bytes_to_bits(&[0xff, 0x00]);
        let report = embed_bits(&mut pixels, &bits);

        let touched: Vec<Coordinate> = spiral_path(6, 5).take(report.bits_written).collect();
        for (i, (before, after)) in pristine
            .as_bytes()
            .iter()
            .zip(pixels.as_bytes())
            .enumerate()
        {
            let pixel = i / 3;
            let at = Coordinate::new((pixel % 6) as u32, (pixel / 6) as u32);
            if i % 3 == 2 && touched.contains(&at) {
                assert_eq!(before & 0xFE, after & 0xFE);
            } else {
                assert_eq!(before, after, "byte {i} changed");
            }
        }
    }

    #[test]
    fn test_early_zero_byte_stops_extraction() {
        let mut pixels = carrier(8, 8);
        embed_bits(&mut pixels, &bytes_to_bits(&[b'a', 0x00, b'b']));

        let extraction = extract_bits(&pixels);
        assert!(extraction.terminated);
        assert_eq!(extraction.bits.to_bytes(), b"a".to_vec());
    }

    #[test]
    fn test_empty_payload() {
        let mut pixels = carrier(3, 3);
        let report = embed_bits(&mut pixels, &BitString::new());
        assert_eq!(report.bits_written, 8);

        let extraction = extract_bits(&pixels);
        assert!(extraction.terminated);
        assert!(extraction.bits.is_empty());
    }

    #[test]
    fn test_partial_trailing_group_kept_in_bits() {
        // 3x3 = 9 pixels: one full byte then one dangling bit.
        let mut pixels = carrier(3, 3);
        let bits: BitString = "101010101".parse().unwrap();
        embed_bits(&mut pixels, &bits);

        let extraction = extract_bits(&pixels);
        assert!(!extraction.terminated);
        assert_eq!(extraction.bits.len(), 9);
        assert_eq!(extraction.bits.to_bytes(), vec![0b1010_1010]);
    }

    #[test]
    fn test_required_bits() {
        assert_eq!(required_bits(0), 8);
        assert_eq!(required_bits(16), 24);
    }
}
