use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide layout engine counters.
pub(crate) struct Metrics;

static LAYOUTS_COMPUTED: AtomicU64 = AtomicU64::new(0);
static RECORDS_DECODED: AtomicU64 = AtomicU64::new(0);
static RECORDS_ENCODED: AtomicU64 = AtomicU64::new(0);
static BYTES_DECODED: AtomicU64 = AtomicU64::new(0);
static BYTES_ENCODED: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

/// Direction of a completed marshaling pass.
#[derive(Clone, Copy)]
pub(crate) enum Direction {
    Decoded,
    Encoded,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_layout() {
        LAYOUTS_COMPUTED.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_bytes(direction: Direction, len: usize) {
        let len = u64::try_from(len).unwrap_or(u64::MAX);
        match direction {
            Direction::Decoded => {
                RECORDS_DECODED.fetch_add(1, Ordering::Relaxed);
                BYTES_DECODED.fetch_add(len, Ordering::Relaxed);
            }
            Direction::Encoded => {
                RECORDS_ENCODED.fetch_add(1, Ordering::Relaxed);
                BYTES_ENCODED.fetch_add(len, Ordering::Relaxed);
            }
        }
    }

    #[inline]
    pub(crate) fn record_error() {
        ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn totals() -> MetricsSnapshot {
        MetricsSnapshot {
            layouts_computed: LAYOUTS_COMPUTED.load(Ordering::Relaxed),
            records_decoded: RECORDS_DECODED.load(Ordering::Relaxed),
            records_encoded: RECORDS_ENCODED.load(Ordering::Relaxed),
            bytes_decoded: BYTES_DECODED.load(Ordering::Relaxed),
            bytes_encoded: BYTES_ENCODED.load(Ordering::Relaxed),
            total_errors: ERROR_COUNT.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the layout engine counters.
///
/// Counters are global and only ever grow; compare two snapshots to measure
/// a stretch of work.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Top-level layouts computed (cache misses included, hits excluded)
    pub layouts_computed: u64,
    /// Records decoded successfully
    pub records_decoded: u64,
    /// Records encoded successfully
    pub records_encoded: u64,
    /// Bytes consumed by successful decodes
    pub bytes_decoded: u64,
    /// Bytes produced by successful encodes
    pub bytes_encoded: u64,
    /// Failed layout, decode and encode calls
    pub total_errors: u64,
}

impl MetricsSnapshot {
    /// Average encoded record size in bytes.
    #[must_use]
    pub fn avg_record_size(&self) -> Option<u64> {
        let records = self.records_decoded + self.records_encoded;
        if records == 0 {
            return None;
        }
        Some((self.bytes_decoded + self.bytes_encoded) / records)
    }
}

/// Read the current layout engine counters.
#[must_use]
pub fn metrics_snapshot() -> MetricsSnapshot {
    Metrics::totals()
}
