//! # Steganography Errors
//!
//! Failure modes of the embed/extract pipeline. Capacity truncation and a
//! missing terminator are not errors: they are reported through
//! [`EmbedReport`](super::steganography::EmbedReport) and
//! [`Extraction`](super::steganography::Extraction) instead.

use thiserror::Error;

/// Errors raised by the codec boundary and the payload pipeline.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The carrier bytes are not an image the codec can read.
    #[error("could not decode carrier image: {0}")]
    Decode(#[source] image::ImageError),

    /// The modified pixel buffer could not be written back out.
    #[error("could not encode output image: {0}")]
    Encode(#[source] image::ImageError),

    /// A pixel buffer whose length disagrees with its dimensions.
    #[error("pixel buffer of {len} bytes does not match a {width}x{height} RGB image")]
    InvalidGeometry { width: u32, height: u32, len: usize },

    /// Only raised when the capacity policy is `reject`.
    #[error("payload needs {required} bits but the carrier only holds {available}")]
    CapacityExceeded { required: usize, available: usize },

    /// The separator between file name and content was not found.
    #[error("no payload separator found in recovered data")]
    FramingMismatch,
}

pub type StegoResult<T> = std::result::Result<T, StegoError>;
