//! Program start and teardown
//!
//! Generated `main` calls `pylite_init` first and `pylite_clean_up` last.
//! Neither is strictly required: the heap is created on first use, and a
//! program that exits without cleaning up simply leaves the freeing to the OS.

use crate::report::emit_report;
use crate::state::{ensure_state, with_state};
use tracing::debug;

/// Counts freed by [`clean_up`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Released {
    pub strings: usize,
    pub lists: usize,
}

/// Report (if enabled), then free every pooled string and list
///
/// Handles issued before the call are stale afterwards. Calling it again
/// frees nothing.
pub fn clean_up() -> Released {
    with_state(|state| {
        emit_report(state.heap.stats(), &state.config);
        let (strings, lists) = state.heap.release_all();
        debug!(strings, lists, "runtime clean-up complete");
        Released { strings, lists }
    })
}

/// Set up logging, read configuration and create the heap
///
/// # Safety
/// Always safe to call
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_init() {
    ensure_state();
}

/// Bulk teardown at program exit
///
/// # Safety
/// Pointers obtained from `pylite_str_ptr` must not be used afterwards
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_clean_up() {
    clean_up();
}
