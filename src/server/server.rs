//! # Server Core - Steganography Service
//!
//! The core server component is responsible for ONE thing: hiding payloads
//! in images and getting them back out. It receives already-parsed uploads
//! and returns bytes.
//!
//! HTTP concerns (multipart parsing, status codes, CORS) are handled by
//! [`routes`](super::routes).

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::processing::codec::ImageCodec;
use crate::processing::framing::Payload;
use crate::processing::steganography::{self, EmbedOptions, EmbedOutput};

/// Core server component that embeds and extracts payloads.
///
/// Holds no per-request state; every call decodes its own pixel buffer and
/// walks a freshly computed path, so one instance is shared by all handlers.
#[derive(Clone)]
pub struct StegoCore {
    codec: Arc<dyn ImageCodec>,
    options: EmbedOptions,
}

impl StegoCore {
    /// Create a new core around an image codec.
    ///
    /// # Example
    /// ```ignore
    /// let core = StegoCore::new(Arc::new(PngCodec), EmbedOptions::default());
    /// ```
    pub fn new(codec: Arc<dyn ImageCodec>, options: EmbedOptions) -> Self {
        Self { codec, options }
    }

    /// Media type of the images produced by [`encode_image`](Self::encode_image).
    pub fn media_type(&self) -> &'static str {
        self.codec.media_type()
    }

    pub fn options(&self) -> EmbedOptions {
        self.options
    }

    /// Hide `payload` inside `image_data`.
    ///
    /// # Returns
    /// - `Ok(EmbedOutput)`: Encoded carrier plus a report of how many bits fit
    /// - `Err`: A [`StegoError`](crate::processing::StegoError) (bad image,
    ///   payload rejected by the capacity policy) or a failed blocking task
    pub async fn encode_image(
        &self,
        request_id: u64,
        image_data: Vec<u8>,
        payload: Payload,
    ) -> Result<EmbedOutput> {
        info!(
            "📷 Request #{} embedding '{}' ({} bytes) into {} byte carrier",
            request_id,
            payload.file_name(),
            payload.content.len(),
            image_data.len()
        );

        // Steganography is CPU-bound; keep it off the async workers
        let codec = Arc::clone(&self.codec);
        let options = self.options;
        let output = tokio::task::spawn_blocking(move || {
            steganography::embed_payload_bytes(codec.as_ref(), &image_data, &payload, options)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Embedding task panicked: {}", e))??;

        info!(
            "✅ Request #{} embedded {} bits into {}x{} carrier",
            request_id, output.report.bits_written, output.width, output.height
        );

        Ok(output)
    }

    /// Recover the named payload hidden in `image_data`.
    pub async fn decode_image(&self, request_id: u64, image_data: Vec<u8>) -> Result<Payload> {
        info!(
            "🔍 Request #{} extracting from {} byte carrier",
            request_id,
            image_data.len()
        );

        let codec = Arc::clone(&self.codec);
        let payload = tokio::task::spawn_blocking(move || {
            steganography::extract_payload_bytes(codec.as_ref(), &image_data)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Extraction task panicked: {}", e))??;

        info!(
            "✅ Request #{} recovered '{}' ({} bytes)",
            request_id,
            payload.file_name(),
            payload.content.len()
        );

        Ok(payload)
    }

    /// Recover every byte before the terminator, without unframing.
    pub async fn extract_raw(&self, request_id: u64, image_data: Vec<u8>) -> Result<Vec<u8>> {
        let codec = Arc::clone(&self.codec);
        let raw = tokio::task::spawn_blocking(move || {
            steganography::extract_raw_bytes(codec.as_ref(), &image_data)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Extraction task panicked: {}", e))??;

        info!("✅ Request #{} recovered {} raw bytes", request_id, raw.len());

        Ok(raw)
    }
}
