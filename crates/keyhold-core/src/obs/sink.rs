//! Metrics sink boundary.
//!
//! Executors and index maintenance never touch `obs::metrics` directly.
//! All instrumentation flows through `MetricsEvent` and `MetricsSink`.
use crate::{obs::metrics, traits::EntityKind};
use std::{cell::RefCell, marker::PhantomData, rc::Rc, time::Instant};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// ExecKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecKind {
    Load,
    Save,
    Update,
    Delete,
}

///
/// PlanKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlanKind {
    Equal,
    Range,
    FullScan,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ExecStart {
        kind: ExecKind,
        entity: &'static str,
    },
    ExecFinish {
        kind: ExecKind,
        entity: &'static str,
        rows_touched: u64,
        elapsed_micros: u64,
    },
    RowsScanned {
        entity: &'static str,
        rows_scanned: u64,
    },
    UniqueViolation {
        entity: &'static str,
    },
    IndexDelta {
        entity: &'static str,
        inserts: u64,
        removes: u64,
    },
    Plan {
        kind: PlanKind,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink writing into the thread-local metrics state.

pub(crate) struct GlobalMetricsSink;

impl GlobalMetricsSink {
    fn exec_start(kind: ExecKind, entity: &str) {
        metrics::with_state_mut(|m| {
            let entry = m.entities.entry(entity.to_string()).or_default();
            match kind {
                ExecKind::Load => {
                    m.ops.load_calls = m.ops.load_calls.saturating_add(1);
                    entry.load_calls = entry.load_calls.saturating_add(1);
                }
                ExecKind::Save => {
                    m.ops.save_calls = m.ops.save_calls.saturating_add(1);
                    entry.save_calls = entry.save_calls.saturating_add(1);
                }
                ExecKind::Update => {
                    m.ops.update_calls = m.ops.update_calls.saturating_add(1);
                    entry.update_calls = entry.update_calls.saturating_add(1);
                }
                ExecKind::Delete => {
                    m.ops.delete_calls = m.ops.delete_calls.saturating_add(1);
                    entry.delete_calls = entry.delete_calls.saturating_add(1);
                }
            }
        });
    }

    fn exec_finish(kind: ExecKind, entity: &str, rows: u64, micros: u64) {
        metrics::with_state_mut(|m| {
            let entry = m.entities.entry(entity.to_string()).or_default();
            match kind {
                ExecKind::Load => {
                    m.ops.rows_loaded = m.ops.rows_loaded.saturating_add(rows);
                    entry.rows_loaded = entry.rows_loaded.saturating_add(rows);
                    metrics::add_duration(
                        &mut m.perf.load_micros_total,
                        &mut m.perf.load_micros_max,
                        micros,
                    );
                }
                ExecKind::Save | ExecKind::Update | ExecKind::Delete => {
                    let (total, row) = match kind {
                        ExecKind::Save => (&mut m.ops.rows_saved, &mut entry.rows_saved),
                        ExecKind::Update => (&mut m.ops.rows_updated, &mut entry.rows_updated),
                        _ => (&mut m.ops.rows_deleted, &mut entry.rows_deleted),
                    };
                    *total = total.saturating_add(rows);
                    *row = row.saturating_add(rows);

                    metrics::add_duration(
                        &mut m.perf.write_micros_total,
                        &mut m.perf.write_micros_max,
                        micros,
                    );
                }
            }
        });
    }
}

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ExecStart { kind, entity } => Self::exec_start(kind, entity),

            MetricsEvent::ExecFinish {
                kind,
                entity,
                rows_touched,
                elapsed_micros,
            } => Self::exec_finish(kind, entity, rows_touched, elapsed_micros),

            MetricsEvent::RowsScanned {
                entity,
                rows_scanned,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_scanned = m.ops.rows_scanned.saturating_add(rows_scanned);
                    let entry = m.entities.entry(entity.to_string()).or_default();
                    entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
                });
            }

            MetricsEvent::UniqueViolation { entity } => {
                metrics::with_state_mut(|m| {
                    m.ops.unique_violations = m.ops.unique_violations.saturating_add(1);
                    let entry = m.entities.entry(entity.to_string()).or_default();
                    entry.unique_violations = entry.unique_violations.saturating_add(1);
                });
            }

            MetricsEvent::IndexDelta {
                entity,
                inserts,
                removes,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.index_inserts = m.ops.index_inserts.saturating_add(inserts);
                    m.ops.index_removes = m.ops.index_removes.saturating_add(removes);
                    let entry = m.entities.entry(entity.to_string()).or_default();
                    entry.index_inserts = entry.index_inserts.saturating_add(inserts);
                    entry.index_removes = entry.index_removes.saturating_add(removes);
                });
            }

            MetricsEvent::Plan { kind } => {
                metrics::with_state_mut(|m| match kind {
                    PlanKind::Equal => m.ops.plan_equal = m.ops.plan_equal.saturating_add(1),
                    PlanKind::Range => m.ops.plan_range = m.ops.plan_range.saturating_add(1),
                    PlanKind::FullScan => {
                        m.ops.plan_full_scan = m.ops.plan_full_scan.saturating_add(1);
                    }
                });
            }
        }
    }
}

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventState {
    metrics::with_state(Clone::clone)
}

/// Reset all metrics state (counters + perf).
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// The previous sink is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits start/finish metrics events for one executor call.
/// Finish accounting happens even on early return or unwind.

pub(crate) struct Span<E: EntityKind> {
    kind: ExecKind,
    start: Instant,
    rows: u64,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> Span<E> {
    #[must_use]
    pub(crate) fn new(kind: ExecKind) -> Self {
        record(MetricsEvent::ExecStart {
            kind,
            entity: E::MODEL.name,
        });

        Self {
            kind,
            start: Instant::now(),
            rows: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
    }
}

impl<E: EntityKind> Drop for Span<E> {
    fn drop(&mut self) {
        let elapsed = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);

        record(MetricsEvent::ExecFinish {
            kind: self.kind,
            entity: E::MODEL.name,
            rows_touched: self.rows,
            elapsed_micros: elapsed,
        });
    }
}

///
/// TESTS
///
