//! Prometheus metrics for a hosted splitter.
//!
//! Each [`SplitterMetrics`] owns a dedicated [`Registry`], so independent
//! splitters in one process never share or collide on metric names.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use crate::SplitterError;

pub struct SplitterMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Splits that completed and disbursed.
    pub splits_total: IntCounter,
    /// Splits that failed (including aborted and rolled-back ones).
    pub splits_failed_total: IntCounter,
    /// Individual transfers issued by completed splits.
    pub transfers_total: IntCounter,
    /// Committed registry mutations.
    pub mutations_total: IntCounter,
    /// Registry mutations rejected by validation or authorization.
    pub mutations_rejected_total: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Current number of live recipient conditions.
    pub recipient_count: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Truncation remainder retained in the pool per split, in raw units.
    pub split_remainder: Histogram,
}

impl SplitterMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let splits_total = register_int_counter_with_registry!(
            Opts::new("splitter_splits_total", "Splits completed"),
            registry
        )
        .expect("failed to register splits_total counter");

        let splits_failed_total = register_int_counter_with_registry!(
            Opts::new("splitter_splits_failed_total", "Splits that failed or were aborted"),
            registry
        )
        .expect("failed to register splits_failed_total counter");

        let transfers_total = register_int_counter_with_registry!(
            Opts::new("splitter_transfers_total", "Transfers issued by completed splits"),
            registry
        )
        .expect("failed to register transfers_total counter");

        let mutations_total = register_int_counter_with_registry!(
            Opts::new("splitter_mutations_total", "Committed registry mutations"),
            registry
        )
        .expect("failed to register mutations_total counter");

        let mutations_rejected_total = register_int_counter_with_registry!(
            Opts::new(
                "splitter_mutations_rejected_total",
                "Registry mutations rejected by validation or authorization"
            ),
            registry
        )
        .expect("failed to register mutations_rejected_total counter");

        let recipient_count = register_int_gauge_with_registry!(
            Opts::new("splitter_recipient_count", "Live recipient conditions"),
            registry
        )
        .expect("failed to register recipient_count gauge");

        let split_remainder = register_histogram_with_registry!(
            HistogramOpts::new(
                "splitter_split_remainder",
                "Truncation remainder kept in the pool per split"
            )
            .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]),
            registry
        )
        .expect("failed to register split_remainder histogram");

        Self {
            registry,
            splits_total,
            splits_failed_total,
            transfers_total,
            mutations_total,
            mutations_rejected_total,
            recipient_count,
            split_remainder,
        }
    }

    /// Render every metric in the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, SplitterError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|e| SplitterError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| SplitterError::Metrics(e.to_string()))
    }
}

impl Default for SplitterMetrics {
    fn default() -> Self {
        Self::new()
    }
}
