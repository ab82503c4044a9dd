//! Prometheus metrics

use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Lead handed to the sync worker
    LeadSubmitted,
    /// Form rejected by validation
    ValidationFailed,
    /// Lead accepted by the CRM
    LeadDelivered,
    /// Failed delivery attempt
    DeliveryFailed,
    /// Lead whose retry policy ran out
    LeadGivenUp,
    /// Pending-store read/write failure
    StorageError,
    /// Completed sweep pass
    SweepRun,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeMetric {
    /// Leads still pending after the last sweep
    PendingLeads,
}

/// Latency metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyMetric {
    /// One CRM webhook call
    CrmDelivery,
    /// One full sweep
    Sweep,
}

impl CounterMetric {
    pub fn name(self) -> &'static str {
        match self {
            CounterMetric::LeadSubmitted => "profit_leads_submitted_total",
            CounterMetric::ValidationFailed => "profit_lead_validation_failures_total",
            CounterMetric::LeadDelivered => "profit_leads_delivered_total",
            CounterMetric::DeliveryFailed => "profit_lead_delivery_failures_total",
            CounterMetric::LeadGivenUp => "profit_leads_given_up_total",
            CounterMetric::StorageError => "profit_lead_storage_errors_total",
            CounterMetric::SweepRun => "profit_sweeps_total",
        }
    }
}

impl GaugeMetric {
    pub fn name(self) -> &'static str {
        match self {
            GaugeMetric::PendingLeads => "profit_pending_leads",
        }
    }
}

impl LatencyMetric {
    pub fn name(self) -> &'static str {
        match self {
            LatencyMetric::CrmDelivery => "profit_crm_delivery_latency_ms",
            LatencyMetric::Sweep => "profit_sweep_duration_ms",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let value_ms = duration.as_secs_f64() * 1000.0;
    tracing::trace!(metric = metric.name(), value_ms, "Recording latency");
    ::metrics::histogram!(metric.name()).record(value_ms);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    ::metrics::gauge!(metric.name()).set(value);
}
