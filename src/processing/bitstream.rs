//! # Bit Stream Codec
//!
//! Converts bytes to an ordered bit sequence (most significant bit first)
//! and back. The zero byte doubles as the end-of-data sentinel.

use std::fmt;
use std::str::FromStr;

/// Number of bits in the terminator sentinel.
pub const TERMINATOR_BITS: usize = 8;

/// An ordered sequence of bits, MSB-first within each byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn truncate(&mut self, len: usize) {
        self.bits.truncate(len);
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Regroup into bytes; see [`bits_to_bytes`].
    pub fn to_bytes(&self) -> Vec<u8> {
        bits_to_bytes(&self.bits)
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Returned when parsing a textual bit string hits something other than
/// `'0'` or `'1'`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid bit character {found:?} at position {position}")]
pub struct ParseBitsError {
    pub position: usize,
    pub found: char,
}

impl FromStr for BitString {
    type Err = ParseBitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(ParseBitsError { position, found }),
            })
            .collect()
    }
}

/// Expand every byte into 8 bits, most significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> BitString {
    let mut bits = BitString::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits
}

/// Pack complete 8-bit groups back into bytes. A trailing partial group is
/// dropped.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|group| group.iter().fold(0u8, |byte, &bit| (byte << 1) | u8::from(bit)))
        .collect()
}

/// The all-zero byte appended after the payload on embed.
pub fn terminator() -> [bool; TERMINATOR_BITS] {
    [false; TERMINATOR_BITS]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first() {
        assert_eq!(bytes_to_bits(b"Hi").to_string(), "0100100001101001");
        assert_eq!(bytes_to_bits(&[0x80, 0x01]).to_string(), "1000000000000001");
    }

    #[test]
    fn test_partial_group_dropped() {
        let bits: BitString = "0100100001".parse().unwrap();
        assert_eq!(bits.to_bytes(), b"H".to_vec());

        let short: BitString = "1111111".parse().unwrap();
        assert!(short.to_bytes().is_empty());
    }

    #[test]
    fn test_bytes_survive_regrouping() {
        let data = [0x00, 0xff, 0x7f, 0xa5, b':', 0xc3, 0xa9];
        assert_eq!(bytes_to_bits(&data).to_bytes(), data.to_vec());
    }

    #[test]
    fn test_terminator_is_zero_byte() {
        assert_eq!(bits_to_bytes(&terminator()), vec![0u8]);
    }

    #[test]
    fn test_parse_rejects_other_characters() {
        let err = "01x1".parse::<BitString>().unwrap_err();
        assert_eq!(err, ParseBitsError { position: 2, found: 'x' });
    }

    #[test]
    fn test_empty() {
        assert!(bytes_to_bits(&[]).is_empty());
        assert!(bits_to_bytes(&[]).is_empty());
    }
}
