//! # FinP2P Telemetry
//!
//! Structured logging and Prometheus metrics for the adapter subsystems.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fp_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FP_SERVICE_NAME` | `finp2p-evm-adapter` | Service name in logs |
//! | `FP_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `FP_JSON_LOGS` | `false` | JSON log lines |
//! | `FP_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]

mod config;
mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, MetricsHandle, NONCE_RESETS,
    OPERATION_STATUSES, RECEIPTS_PARSED, SIGNATURE_VERIFICATIONS, SUBMISSIONS, SUBMIT_ATTEMPTS,
    SUBMIT_DURATION, VALIDATION_REJECTIONS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed (usually: one is already set)
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    /// Metric registration or encoding failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
///
/// Calling this twice returns an error instead of panicking.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    tracing_setup::init_tracing(&config)?;
    Ok(TelemetryGuard {
        service_name: config.service_name,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry");
    }
}

/// Increment a counter, optionally selecting label values.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
