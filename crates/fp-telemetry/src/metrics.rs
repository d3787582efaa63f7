//! Prometheus metrics for the adapter subsystems.
//!
//! All metrics follow the naming convention: `fp_<subsystem>_<metric>_<unit>`
//!
//! Counters work whether or not [`register_metrics`] has been called; only
//! the text exposition needs them registered.

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // SIGNATURE CODEC METRICS (fp-01)
    // =========================================================================

    /// Signature verifications by result
    pub static ref SIGNATURE_VERIFICATIONS: CounterVec = CounterVec::new(
        Opts::new("fp_codec_signature_verifications_total", "Typed-data signature verifications"),
        &["result"]  // result: valid/invalid/malformed
    ).expect("metric creation failed");

    // =========================================================================
    // LEG/PHASE METRICS (fp-02)
    // =========================================================================

    /// Requests rejected before any chain call
    pub static ref VALIDATION_REJECTIONS: CounterVec = CounterVec::new(
        Opts::new("fp_legphase_validation_rejections_total", "Requests rejected by leg/phase validation"),
        &["field"]  // field: asset/signer/source/destination/quantity
    ).expect("metric creation failed");

    // =========================================================================
    // SUBMISSION METRICS (fp-03)
    // =========================================================================

    /// Final submission outcomes
    pub static ref SUBMISSIONS: CounterVec = CounterVec::new(
        Opts::new("fp_submitter_submissions_total", "Transaction submissions by final outcome"),
        &["outcome"]  // outcome: accepted/reverted/rejected/exhausted
    ).expect("metric creation failed");

    /// Individual send attempts
    pub static ref SUBMIT_ATTEMPTS: Counter = Counter::new(
        "fp_submitter_attempts_total",
        "Individual send attempts including retries"
    ).expect("metric creation failed");

    /// Nonce cache resets
    pub static ref NONCE_RESETS: Counter = Counter::new(
        "fp_submitter_nonce_resets_total",
        "Times the signer nonce cache was discarded"
    ).expect("metric creation failed");

    /// End-to-end submission latency
    pub static ref SUBMIT_DURATION: Histogram = Histogram::with_opts(HistogramOpts::new(
        "fp_submitter_submit_duration_seconds",
        "Time from first attempt to final outcome"
    )).expect("metric creation failed");

    // =========================================================================
    // RECEIPT METRICS (fp-04, fp-05)
    // =========================================================================

    /// Receipt parse results
    pub static ref RECEIPTS_PARSED: CounterVec = CounterVec::new(
        Opts::new("fp_parser_receipts_total", "Mined transactions run through the receipt parser"),
        &["result"]  // result: parsed/no_receipt
    ).expect("metric creation failed");

    /// Terminal operation statuses observed
    pub static ref OPERATION_STATUSES: CounterVec = CounterVec::new(
        Opts::new("fp_status_terminal_total", "Terminal operation statuses and local timeouts"),
        &["status"]  // status: completed/failed/timeout
    ).expect("metric creation failed");
}

/// Handle proving the metrics were registered.
#[derive(Debug)]
pub struct MetricsHandle {
    registered: usize,
}

impl MetricsHandle {
    /// Number of collectors registered.
    pub fn registered(&self) -> usize {
        self.registered
    }
}

/// Register all metrics with the global registry.
///
/// A second call fails with [`TelemetryError::MetricsInit`].
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SIGNATURE_VERIFICATIONS.clone()),
        Box::new(VALIDATION_REJECTIONS.clone()),
        Box::new(SUBMISSIONS.clone()),
        Box::new(SUBMIT_ATTEMPTS.clone()),
        Box::new(NONCE_RESETS.clone()),
        Box::new(SUBMIT_DURATION.clone()),
        Box::new(RECEIPTS_PARSED.clone()),
        Box::new(OPERATION_STATUSES.clone()),
    ];
    let registered = metrics.len();

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle { registered })
}

/// Encode all registered metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
