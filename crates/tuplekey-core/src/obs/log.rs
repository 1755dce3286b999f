//! Logging conventions.
//!
//! All events use target "tuplekey" and carry an `event` field:
//!
//! - `event`: snake_case event name (required)
//! - `component`: subsystem, e.g. "selector", "synthesis", "index"
//! - `%` for Display, `?` for Debug formatting

/// Target for all tuplekey log events.
pub(crate) const TUPLEKEY_TARGET: &str = "tuplekey";

/// Debug-level log event.
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::obs::log::TUPLEKEY_TARGET, $($field)*)
    };
}

/// Trace-level log event.
macro_rules! log_trace {
    ($($field:tt)*) => {
        ::tracing::trace!(target: $crate::obs::log::TUPLEKEY_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_trace;
