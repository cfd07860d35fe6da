//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Structured debug logging goes through `tracing` at the call sites and is
//! switched on per handle with `DbConfig::debug`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EventOps, EventPerf, EventState};
pub use sink::{
    ExecKind, MetricsEvent, MetricsSink, PlanKind, metrics_report, metrics_reset_all,
    with_metrics_sink,
};
