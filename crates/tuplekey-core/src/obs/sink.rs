//! Metrics sink boundary.
//!
//! Key services MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
//!
//! This module is the only bridge between key services and the
//! thread-local metrics state.
use crate::{
    key::{SelectorMode, SelectorShape},
    obs::metrics::{self, EventReport, bump},
};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = const { RefCell::new(None) };
}

///
/// SynthesisKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SynthesisKind {
    Constructor,
    Accessor,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    SelectorAccepted {
        shape: SelectorShape,
        mode: SelectorMode,
    },
    SelectorRejected {
        mode: SelectorMode,
    },
    /// A recognition attempt through `try_parse` that did not match.
    SelectorUnmatched {
        mode: SelectorMode,
    },
    Synthesized {
        kind: SynthesisKind,
    },
    SynthesisRejected {
        kind: SynthesisKind,
    },
    IndexDefined {
        mode: SelectorMode,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counter state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| {
            let ops = &mut m.ops;

            match event {
                MetricsEvent::SelectorAccepted { shape, mode } => {
                    bump_mode(ops, mode);
                    match shape {
                        SelectorShape::DirectConstruct => bump(&mut ops.selectors_direct),
                        SelectorShape::FactoryCall => bump(&mut ops.selectors_factory),
                    }
                }
                MetricsEvent::SelectorRejected { mode } => {
                    bump_mode(ops, mode);
                    bump(&mut ops.selectors_rejected);
                }
                MetricsEvent::SelectorUnmatched { mode } => {
                    bump_mode(ops, mode);
                    bump(&mut ops.selectors_unmatched);
                }
                MetricsEvent::Synthesized { kind } => match kind {
                    SynthesisKind::Constructor => bump(&mut ops.constructors_built),
                    SynthesisKind::Accessor => bump(&mut ops.accessors_built),
                },
                MetricsEvent::SynthesisRejected { kind } => match kind {
                    SynthesisKind::Constructor => bump(&mut ops.constructor_rejections),
                    SynthesisKind::Accessor => bump(&mut ops.accessor_rejections),
                },
                MetricsEvent::IndexDefined { mode } => match mode {
                    SelectorMode::Strict => bump(&mut ops.indexes_strict),
                    SelectorMode::Lenient => bump(&mut ops.indexes_lenient),
                },
            }
        });
    }
}

const fn bump_mode(ops: &mut metrics::EventOps, mode: SelectorMode) {
    match mode {
        SelectorMode::Strict => bump(&mut ops.strict_parses),
        SelectorMode::Lenient => bump(&mut ops.lenient_parses),
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a live `&dyn MetricsSink` in `with_metrics_sink`,
        //   which restores the previous slot on every exit, including unwind.
        // - `record` is synchronous and never stores `ptr` past this call.
        // - Only a shared reference is materialized, matching the original borrow.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's metrics counters.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset the current thread's metrics counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
///
/// Events recorded on this thread inside `f` go to `sink` instead of the
/// global counters. Overrides nest and are restored on unwind.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - The erased pointer is installed only for this dynamic scope and `Guard`
    //   restores the previous slot on all exits.
    // - `record` dereferences synchronously and never persists the pointer.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}
