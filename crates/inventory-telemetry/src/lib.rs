//! # Inventory Telemetry
//!
//! Logging and metrics for the stockroom.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` fmt layer, plain or JSON, filtered by `EnvFilter`
//! - **Metrics**: Prometheus counters for mutations, rejections and unit flow
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inventory_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STOCKROOM_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `STOCKROOM_JSON_LOGS` | `false` | JSON formatted logs |
//! | `STOCKROOM_SERVICE_NAME` | `stockroom` | Service name on log lines |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{encode_metrics, register_metrics, MetricsHandle};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { metrics })
}

/// Keeps telemetry active.
pub struct TelemetryGuard {
    metrics: MetricsHandle,
}

impl TelemetryGuard {
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}
