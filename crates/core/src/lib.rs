//! pylite Core: the value and container model behind compiled pylite programs
//!
//! This crate is pure Rust with no process-level side effects. Every fallible
//! operation returns [`RuntimeError`]; turning an error into a diagnostic and
//! an exit status is left to `pylite-runtime`.
//!
//! # Modules
//!
//! - `value`: `Value` sum type, `TypeTag`, and string/list handles
//! - `registry`: generation-stamped, append-only allocation logs
//! - `heap`: the `Heap` owning both logs, bulk teardown and statistics
//! - `string_pool`: pooled NUL-terminated strings (create, concat, read back)
//! - `list`: two-phase list container (fill-in, then append/get/slice)
//! - `raw`: `RawValue`, the `#[repr(C)]` form of a value at the ABI
//! - `error`: the `RuntimeError` taxonomy

pub mod error;
pub mod heap;
pub mod list;
pub mod raw;
pub mod registry;
pub mod string_pool;
pub mod value;

pub use error::{Result, RuntimeError};
pub use heap::{Heap, HeapStats};
pub use list::{List, ListState};
pub use raw::RawValue;
pub use registry::ObjectKind;
pub use string_pool::PoolString;
pub use value::{ListHandle, StrHandle, TypeTag, Value};
