//! Observability: structured logging and in-memory metrics.
//!
//! Logging goes through `tracing` with a fixed target; the library never
//! installs a subscriber. Metrics flow through `MetricsEvent` and
//! `MetricsSink` only.

pub(crate) mod log;
pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport};
pub use sink::{
    MetricsEvent, MetricsSink, SynthesisKind, metrics_report, metrics_reset_all,
    with_metrics_sink,
};
