//! String pool exports
//!
//! These functions are exported with C ABI for generated code to call. A
//! string crosses the boundary as its packed handle (`u64`); the bytes stay in
//! the pool until `pylite_clean_up`.

use crate::fatal::OrFatal;
use crate::state::with_heap;
use pylite_core::StrHandle;
use std::ffi::{CStr, c_char};

/// Copy a C string into the pool
///
/// A null pointer is pooled as the empty string.
///
/// # Safety
/// `s` must be null or a valid NUL-terminated C string
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_str_init(s: *const c_char) -> u64 {
    let bytes = if s.is_null() {
        &[][..]
    } else {
        unsafe { CStr::from_ptr(s) }.to_bytes()
    };
    with_heap(|heap| heap.create_str(bytes))
        .map(StrHandle::to_bits)
        .or_fatal()
}

/// Pool the concatenation of two pooled strings
///
/// # Safety
/// Both handles must come from this runtime
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_str_concat(a: u64, b: u64) -> u64 {
    let (a, b) = (StrHandle::from_bits(a), StrHandle::from_bits(b));
    with_heap(|heap| heap.concat_str(a, b))
        .map(StrHandle::to_bits)
        .or_fatal()
}

/// Borrow the NUL-terminated bytes of a pooled string
///
/// The pointer stays valid until `pylite_clean_up`.
///
/// # Safety
/// `handle` must come from this runtime
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pylite_str_ptr(handle: u64) -> *const c_char {
    with_heap(|heap| heap.str_ptr(StrHandle::from_bits(handle))).or_fatal()
}
