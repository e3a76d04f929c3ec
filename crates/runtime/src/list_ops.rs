//! List exports
//!
//! These functions are exported with C ABI for generated code to call. Lists
//! cross the boundary as packed handles (`u64`), elements as [`RawValue`].
//!
//! A list literal compiles to `pylite_list_init(n)` followed by exactly `n`
//! calls to `pylite_list_init_add`; every other operation requires the list
//! to be fully initialised.

use crate::fatal::OrFatal;
use crate::state::with_heap;
use pylite_core::{ListHandle, RawValue};

/// Allocate a list with `length` slots awaiting initial values
///
/// # Safety
/// Always safe to call; a negative length is a fatal error
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_list_init(length: i64) -> u64 {
    with_heap(|heap| heap.list_new_checked(length))
        .map(ListHandle::to_bits)
        .or_fatal()
}

/// Store the next initial value
///
/// # Safety
/// `list` must come from this runtime
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_list_init_add(list: u64, value: RawValue) {
    let list = ListHandle::from_bits(list);
    value
        .to_value()
        .and_then(|v| with_heap(|heap| heap.list_fill_next(list, v)))
        .or_fatal()
}

/// Append to an initialised list
///
/// # Safety
/// `list` must come from this runtime
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_list_add(list: u64, value: RawValue) {
    let list = ListHandle::from_bits(list);
    value
        .to_value()
        .and_then(|v| with_heap(|heap| heap.list_append(list, v)))
        .or_fatal()
}

/// Read element `index`
///
/// # Safety
/// `list` must come from this runtime
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_list_get(list: u64, index: i64) -> RawValue {
    let list = ListHandle::from_bits(list);
    with_heap(|heap| heap.list_get(list, index))
        .map(RawValue::from)
        .or_fatal()
}

/// New list holding copies of elements `start..=end`
///
/// # Safety
/// `list` must come from this runtime
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_list_slice(list: u64, start: i64, end: i64) -> u64 {
    let list = ListHandle::from_bits(list);
    with_heap(|heap| heap.list_slice(list, start, end))
        .map(ListHandle::to_bits)
        .or_fatal()
}

/// Logical length, counting slots not yet initialised
///
/// # Safety
/// `list` must come from this runtime
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_list_length(list: u64) -> i64 {
    let list = ListHandle::from_bits(list);
    with_heap(|heap| heap.list_len(list))
        .map(|n| n as i64)
        .or_fatal()
}
