//! Bridge counters
//!
//! - Counters only, monotonic
//! - Relaxed atomics; one registry per table share

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-table operation counters
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    rows_encoded: AtomicU64,
    rows_decoded: AtomicU64,
    encode_failures: AtomicU64,
    decode_failures: AtomicU64,
    filters_translated: AtomicU64,
    store_failures: AtomicU64,
    scratch_grows: AtomicU64,
}

impl BridgeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_rows_encoded(&self) {
        self.rows_encoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rows_decoded(&self) {
        self.rows_decoded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_encode_failures(&self) {
        self.encode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_decode_failures(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_filters_translated(&self) {
        self.filters_translated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_store_failures(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds scratch reallocations observed since the last report
    pub fn add_scratch_grows(&self, count: u64) {
        self.scratch_grows.fetch_add(count, Ordering::Relaxed);
    }

    /// Current values as a JSON object
    pub fn to_json(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"{{"rows_encoded":{},"rows_decoded":{},"encode_failures":{},"decode_failures":{},"filters_translated":{},"store_failures":{},"scratch_grows":{}}}"#,
            s.rows_encoded,
            s.rows_decoded,
            s.encode_failures,
            s.decode_failures,
            s.filters_translated,
            s.store_failures,
            s.scratch_grows,
        )
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rows_encoded: self.rows_encoded.load(Ordering::Relaxed),
            rows_decoded: self.rows_decoded.load(Ordering::Relaxed),
            encode_failures: self.encode_failures.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            filters_translated: self.filters_translated.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            scratch_grows: self.scratch_grows.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of the counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rows_encoded: u64,
    pub rows_decoded: u64,
    pub encode_failures: u64,
    pub decode_failures: u64,
    pub filters_translated: u64,
    pub store_failures: u64,
    pub scratch_grows: u64,
}
