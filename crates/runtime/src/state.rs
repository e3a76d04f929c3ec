//! Process-scoped heap behind the C ABI
//!
//! Compiled programs are single threaded, so the heap lives in a thread-local
//! and is created lazily on first use. `pylite_init` only forces that
//! creation early so configuration warnings show up before any output.

use crate::config::RuntimeConfig;
use crate::logging;
use pylite_core::Heap;
use std::cell::RefCell;
use tracing::debug;

/// Heap plus the configuration it was built from
#[derive(Debug)]
pub struct RuntimeState {
    pub heap: Heap,
    pub config: RuntimeConfig,
}

impl RuntimeState {
    fn from_env() -> Self {
        logging::init();
        let config = RuntimeConfig::from_env();
        debug!(max_objects = ?config.max_objects, "initialising runtime heap");
        RuntimeState {
            heap: Heap::with_object_limit(config.max_objects),
            config,
        }
    }
}

thread_local! {
    static STATE: RefCell<Option<RuntimeState>> = const { RefCell::new(None) };
}

/// Run `f` against the thread's runtime state, creating it if needed
pub fn with_state<R>(f: impl FnOnce(&mut RuntimeState) -> R) -> R {
    STATE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let state = slot.get_or_insert_with(RuntimeState::from_env);
        f(state)
    })
}

/// Run `f` against the thread's heap, creating it if needed
pub fn with_heap<R>(f: impl FnOnce(&mut Heap) -> R) -> R {
    with_state(|state| f(&mut state.heap))
}

/// Create the runtime state now if it does not exist yet
pub fn ensure_state() {
    with_state(|_| ());
}

/// Drop the runtime state; the next access starts from an empty heap
pub fn take_state() -> Option<RuntimeState> {
    STATE.with(|cell| cell.borrow_mut().take())
}
