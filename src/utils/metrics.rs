//! Observability and Metrics
//!
//! Counters for header encode/decode activity, so a transport engine can see
//! how many headers it produced and how much malformed input it dropped.
//!
//! Uses atomic counters for thread-safe metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for header codec operations
#[derive(Debug)]
pub struct Metrics {
    /// Headers successfully encoded
    pub headers_encoded: AtomicU64,
    /// Headers successfully decoded
    pub headers_decoded: AtomicU64,
    /// Bytes written by successful encodes
    pub bytes_encoded: AtomicU64,
    /// Bytes consumed by successful decodes
    pub bytes_decoded: AtomicU64,
    /// Encodes refused (buffer too small, width mismatch)
    pub encode_errors: AtomicU64,
    /// Decodes rejected as malformed
    pub decode_errors: AtomicU64,
    /// Version negotiation headers decoded
    pub version_negotiation_decoded: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            headers_encoded: AtomicU64::new(0),
            headers_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            encode_errors: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            version_negotiation_decoded: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record an encoded header
    pub fn header_encoded(&self, byte_count: u64) {
        self.headers_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record a decoded header
    pub fn header_decoded(&self, byte_count: u64) {
        self.headers_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn encode_error(&self) {
        self.encode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn version_negotiation_decoded(&self) {
        self.version_negotiation_decoded
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            headers_encoded: self.headers_encoded.load(Ordering::Relaxed),
            headers_decoded: self.headers_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            encode_errors: self.encode_errors.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            version_negotiation_decoded: self.version_negotiation_decoded.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            headers_encoded = snapshot.headers_encoded,
            headers_decoded = snapshot.headers_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            encode_errors = snapshot.encode_errors,
            decode_errors = snapshot.decode_errors,
            version_negotiation_decoded = snapshot.version_negotiation_decoded,
            uptime_seconds = snapshot.uptime_seconds,
            "Header codec metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub headers_encoded: u64,
    pub headers_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub encode_errors: u64,
    pub decode_errors: u64,
    pub version_negotiation_decoded: u64,
    pub uptime_seconds: u64,
}

/// Global metrics instance
static METRICS: once_cell::sync::Lazy<Metrics> = once_cell::sync::Lazy::new(Metrics::new);

/// Get the global metrics instance
pub fn global_metrics() -> &'static Metrics {
    &METRICS
}
