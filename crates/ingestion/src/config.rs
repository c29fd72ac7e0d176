//! Decoder metrics

use std::sync::atomic::{AtomicU64, Ordering};

use metrics::counter;

/// Ingestion metrics
///
/// Shared between a decoder and whoever reports on it; counters are also
/// forwarded to the global `metrics` recorder.
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Frames decoded
    pub frames_decoded: AtomicU64,

    /// Bytes read from the stream
    pub bytes_read: AtomicU64,

    /// Reads that returned "no data now"
    pub would_block: AtomicU64,

    /// Fatal decode or read errors
    pub decode_errors: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a decoded frame
    pub fn record_frame(&self) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
        counter!("sensorhud_frames_decoded_total").increment(1);
    }

    /// Record bytes consumed
    pub fn record_bytes(&self, n: usize) {
        self.bytes_read.fetch_add(n as u64, Ordering::Relaxed);
    }

    /// Record a would-block read
    pub fn record_would_block(&self) {
        self.would_block.fetch_add(1, Ordering::Relaxed);
        counter!("sensorhud_would_block_total").increment(1);
    }

    /// Record a decode error
    pub fn record_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
        counter!("sensorhud_decode_errors_total").increment(1);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            would_block: self.would_block.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Frames decoded
    pub frames_decoded: u64,

    /// Bytes read from the stream
    pub bytes_read: u64,

    /// Reads that returned "no data now"
    pub would_block: u64,

    /// Fatal decode or read errors
    pub decode_errors: u64,
}
