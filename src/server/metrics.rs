use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Request counters shared between handlers.
#[derive(Debug, Clone, Default)]
pub struct ServiceMetrics {
    encode_requests: Arc<AtomicU64>,
    decode_requests: Arc<AtomicU64>,
    failed_requests: Arc<AtomicU64>,
    truncated_embeds: Arc<AtomicU64>,
    bytes_embedded: Arc<AtomicU64>,
}

/// Point-in-time copy of [`ServiceMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub encode_requests: u64,
    pub decode_requests: u64,
    pub failed_requests: u64,
    pub truncated_embeds: u64,
    pub bytes_embedded: u64,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_encode_requests(&self) {
        self.encode_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_decode_requests(&self) {
        self.decode_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed_requests(&self) {
        self.failed_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_embed(&self, payload_bytes: usize, truncated: bool) {
        self.bytes_embedded
            .fetch_add(payload_bytes as u64, Ordering::Relaxed);
        if truncated {
            self.truncated_embeds.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            encode_requests: self.encode_requests.load(Ordering::Relaxed),
            decode_requests: self.decode_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            truncated_embeds: self.truncated_embeds.load(Ordering::Relaxed),
            bytes_embedded: self.bytes_embedded.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_shared_between_clones() {
        let metrics = ServiceMetrics::new();
        let handle = metrics.clone();

        handle.increment_encode_requests();
        handle.increment_encode_requests();
        handle.increment_decode_requests();
        handle.increment_failed_requests();
        handle.record_embed(10, false);
        handle.record_embed(5, true);

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                encode_requests: 2,
                decode_requests: 1,
                failed_requests: 1,
                truncated_embeds: 1,
                bytes_embedded: 15,
            }
        );
    }
}
