//! Prometheus metrics for observability.
//!
//! Counters for the issuance pipeline: jobs, certificates, notifications.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Bulk jobs accepted.
pub static JOBS_STARTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("certo_jobs_started_total", "Total bulk jobs accepted").unwrap()
});

/// Bulk jobs that reached Done.
pub static JOBS_COMPLETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "certo_jobs_completed_total",
        "Total bulk jobs completed (certificates issued)",
    )
    .unwrap()
});

/// Bulk jobs aborted, by stage.
pub static JOBS_ABORTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("certo_jobs_aborted_total", "Total bulk jobs aborted"),
        &["stage"],
    )
    .unwrap()
});

/// Certificates committed to the ledger.
pub static CERTIFICATES_ISSUED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "certo_certificates_issued_total",
        "Total certificates committed to the ledger",
    )
    .unwrap()
});

/// Notification emails delivered.
pub static NOTIFICATIONS_SENT_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "certo_notifications_sent_total",
        "Total notification emails delivered",
    )
    .unwrap()
});

/// Notification emails failed or without recipient.
pub static NOTIFICATIONS_FAILED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "certo_notifications_failed_total",
        "Total notification emails failed or skipped for missing recipient",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(JOBS_STARTED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(JOBS_COMPLETED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(JOBS_ABORTED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(CERTIFICATES_ISSUED_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(NOTIFICATIONS_SENT_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(NOTIFICATIONS_FAILED_TOTAL.clone()))
        .unwrap();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        JOBS_STARTED_TOTAL.inc();
        JOBS_ABORTED_TOTAL.with_label_values(&["committing"]).inc();

        let output = encode_metrics();
        assert!(output.contains("certo_jobs_started_total"));
        assert!(output.contains("certo_jobs_aborted_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }
}
