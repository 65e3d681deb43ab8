//! Prometheus metrics for the stockroom.
//!
//! All metrics follow the naming convention: `stockroom_<metric>_<unit>`
//!
//! | Metric | Labels |
//! |--------|--------|
//! | `stockroom_mutations_total` | `operation` |
//! | `stockroom_rejections_total` | `operation`, `kind` |
//! | `stockroom_units_received_total` | |
//! | `stockroom_units_dispositioned_total` | `action` |
//! | `stockroom_bulk_quantity_delta_total` | `direction` |

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Committed mutations by operation
    pub static ref MUTATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("stockroom_mutations_total", "Committed inventory mutations"),
        &["operation"]
    ).expect("metric creation failed");

    /// Rejected operations by operation and error kind
    pub static ref REJECTIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("stockroom_rejections_total", "Rejected inventory operations"),
        &["operation", "kind"]
    ).expect("metric creation failed");

    /// Tracked units created at delivery intake
    pub static ref UNITS_RECEIVED: IntCounter = IntCounter::new(
        "stockroom_units_received_total",
        "Tracked units registered on deliveries"
    ).expect("metric creation failed");

    /// Damaged units resolved, by action
    pub static ref UNITS_DISPOSITIONED: IntCounterVec = IntCounterVec::new(
        Opts::new("stockroom_units_dispositioned_total", "Damaged units resolved"),
        &["action"]
    ).expect("metric creation failed");

    /// Absolute bulk quantity moved, split into in / out
    pub static ref BULK_QUANTITY_DELTA: IntCounterVec = IntCounterVec::new(
        Opts::new("stockroom_bulk_quantity_delta_total", "Bulk stock units moved"),
        &["direction"]
    ).expect("metric creation failed");
}

/// Handle to the registered metrics.
#[derive(Clone)]
pub struct MetricsHandle {
    registry: Registry,
}

impl MetricsHandle {
    /// Prometheus text exposition of every registered metric.
    pub fn encode(&self) -> Result<String, TelemetryError> {
        encode_registry(&self.registry)
    }
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(MUTATIONS.clone()),
        Box::new(REJECTIONS.clone()),
        Box::new(UNITS_RECEIVED.clone()),
        Box::new(UNITS_DISPOSITIONED.clone()),
        Box::new(BULK_QUANTITY_DELTA.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: REGISTRY.clone(),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    encode_registry(&REGISTRY)
}

fn encode_registry(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

// =============================================================================
// RECORDING HELPERS
// =============================================================================

pub fn record_mutation(operation: &str) {
    MUTATIONS.with_label_values(&[operation]).inc();
}

pub fn record_rejection(operation: &str, kind: &str) {
    REJECTIONS.with_label_values(&[operation, kind]).inc();
}

pub fn record_units_received(count: u64) {
    UNITS_RECEIVED.inc_by(count);
}

pub fn record_units_dispositioned(action: &str, count: u64) {
    UNITS_DISPOSITIONED.with_label_values(&[action]).inc_by(count);
}

pub fn record_bulk_delta(delta: i64) {
    let direction = if delta >= 0 { "in" } else { "out" };
    BULK_QUANTITY_DELTA
        .with_label_values(&[direction])
        .inc_by(delta.unsigned_abs());
}
