//! # Payload Framing
//!
//! A hidden payload is a named byte sequence serialized as
//! `name || ":::SEP:::" || content`. Older carriers may also end with the
//! `":::STEGO_END:::"` marker; it is only written when explicitly enabled
//! and is stripped again on the way out.

use super::error::{StegoError, StegoResult};

/// Delimiter between the file name and the content.
pub const SEPARATOR: &[u8] = b":::SEP:::";

/// Legacy trailing marker.
pub const END_MARKER: &[u8] = b":::STEGO_END:::";

/// A named secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub name: Vec<u8>,
    pub content: Vec<u8>,
}

impl Payload {
    pub fn new(name: impl Into<Vec<u8>>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// The name as text, with invalid UTF-8 replaced.
    pub fn file_name(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    /// Serialized length without the end marker.
    pub fn framed_len(&self) -> usize {
        self.name.len() + SEPARATOR.len() + self.content.len()
    }
}

/// `name || SEP || content`.
pub fn frame(payload: &Payload) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.framed_len());
    out.extend_from_slice(&payload.name);
    out.extend_from_slice(SEPARATOR);
    out.extend_from_slice(&payload.content);
    out
}

/// [`frame`] followed by [`END_MARKER`].
pub fn frame_with_end_marker(payload: &Payload) -> Vec<u8> {
    let mut out = frame(payload);
    out.extend_from_slice(END_MARKER);
    out
}

/// Split at the first separator. A single trailing [`END_MARKER`] is
/// removed from the content.
pub fn unframe(bytes: &[u8]) -> StegoResult<Payload> {
    let split = find(bytes, SEPARATOR).ok_or(StegoError::FramingMismatch)?;
    let name = &bytes[..split];
    let content = &bytes[split + SEPARATOR.len()..];
    let content = content.strip_suffix(END_MARKER).unwrap_or(content);
    Ok(Payload::new(name, content))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let framed = frame(&Payload::new("a.txt", "hello"));
        assert_eq!(framed, b"a.txt:::SEP:::hello".to_vec());
    }

    #[test]
    fn test_unframe_splits_at_first_separator() {
        let payload = unframe(b"n:::SEP:::x:::SEP:::y").unwrap();
        assert_eq!(payload.name, b"n".to_vec());
        assert_eq!(payload.content, b"x:::SEP:::y".to_vec());
    }

    #[test]
    fn test_unframe_empty_parts() {
        let payload = unframe(SEPARATOR).unwrap();
        assert!(payload.name.is_empty());
        assert!(payload.content.is_empty());
    }

    #[test]
    fn test_missing_separator() {
        assert!(matches!(
            unframe(b"no delimiter here"),
            Err(StegoError::FramingMismatch)
        ));
        assert!(matches!(unframe(b""), Err(StegoError::FramingMismatch)));
    }

    #[test]
    fn test_end_marker_stripped() {
        let payload = Payload::new("notes.md", vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(unframe(&frame_with_end_marker(&payload)).unwrap(), payload);
    }

    #[test]
    fn test_binary_content() {
        let payload = Payload::new("blob.bin", vec![0xff, 0x00, 0x3a, 0x80]);
        assert_eq!(unframe(&frame(&payload)).unwrap(), payload);
    }

    #[test]
    fn test_lossy_file_name() {
        let payload = Payload::new(vec![b'a', 0xff], "x");
        assert_eq!(payload.file_name(), "a\u{fffd}");
    }
}
