use serde::Serialize;
use std::cell::RefCell;

///
/// EventState
/// Ephemeral, in-memory counters for selector and synthesis operations.
///

#[derive(Clone, Debug, Default, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Selector recognition
    pub strict_parses: u64,
    pub lenient_parses: u64,
    pub selectors_direct: u64,
    pub selectors_factory: u64,
    pub selectors_rejected: u64,
    pub selectors_unmatched: u64,

    // Synthesis
    pub constructors_built: u64,
    pub accessors_built: u64,
    pub constructor_rejections: u64,
    pub accessor_rejections: u64,

    // Index definitions, by the mode that recognized the selector
    pub indexes_strict: u64,
    pub indexes_lenient: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the counters.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport { ops: m.ops.clone() })
}

/// Saturating increment for a single counter.
pub(crate) const fn bump(counter: &mut u64) {
    *counter = counter.saturating_add(1);
}
