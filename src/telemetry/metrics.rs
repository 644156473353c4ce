//! Prometheus metrics

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusRecorder};

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Records checked by an audit
    AuditRecords,
    /// Records that failed verification
    AuditFailures,
    /// Lines that could not be parsed as a calculation
    AuditUnreadable,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Subsidy hidden by clamped platform fees in the last audit
    UnrecordedSubsidy,
}

fn counter_name(metric: CounterMetric) -> &'static str {
    match metric {
        CounterMetric::AuditRecords => "pricing_audit_records_total",
        CounterMetric::AuditFailures => "pricing_audit_failures_total",
        CounterMetric::AuditUnreadable => "pricing_audit_unreadable_total",
    }
}

fn gauge_name(metric: GaugeMetric) -> &'static str {
    match metric {
        GaugeMetric::UnrecordedSubsidy => "pricing_audit_unrecorded_subsidy",
    }
}

/// Increment a counter
pub fn increment(metric: CounterMetric, value: u64) {
    let metric_name = counter_name(metric);
    metrics::counter!(metric_name).increment(value);
    tracing::trace!(metric = metric_name, value, "Incrementing counter");
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = gauge_name(metric);
    metrics::gauge!(metric_name).set(value);
    tracing::trace!(metric = metric_name, value, "Setting gauge");
}

/// Build a Prometheus recorder without installing it globally
///
/// Run the work to be measured under [`metrics::with_local_recorder`], then
/// render the exposition text from `recorder.handle()`. No HTTP listener is
/// started.
pub fn build_prometheus_recorder() -> PrometheusRecorder {
    PrometheusBuilder::new().build_recorder()
}
