//! # Image Processing and Steganography
//!
//! This module hides named payloads inside images and recovers them, using
//! blue-channel LSB substitution along a spiral pixel path.
//!
//! ## Modules
//!
//! - [`spiral`]: deterministic pixel visitation order
//! - [`bitstream`]: byte/bit conversion and the zero-byte terminator
//! - [`framing`]: `name:::SEP:::content` payload framing
//! - [`pixels`]: raw RGB pixel buffer
//! - [`codec`]: image decode/encode boundary
//! - [`steganography`]: embedder, extractor and the byte-level pipeline

pub mod bitstream;
pub mod codec;
pub mod error;
pub mod framing;
pub mod pixels;
pub mod spiral;
pub mod steganography;

// Re-export main functions for convenience
pub use codec::{ImageCodec, PngCodec};
pub use error::StegoError;
pub use framing::Payload;
pub use steganography::{
    embed_payload_bytes, extract_payload_bytes, extract_raw_bytes, CapacityPolicy, EmbedOptions,
};
