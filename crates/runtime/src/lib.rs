//! pylite Runtime: the library linked into every compiled pylite program
//!
//! Generated code talks to the runtime only through the `pylite_*` C ABI.
//! Strings and lists cross that boundary as packed `u64` handles, scalars as
//! [`RawValue`]. The heap behind the handles lives in a thread-local and is
//! torn down in one step by `pylite_clean_up`.
//!
//! Any runtime error at the ABI prints `RUNTIME ERROR: <message>` to stdout and
//! exits with status 1 (see [`fatal`]).
//!
//! # Modules
//!
//! - `string_ops`, `list_ops`: string pool and list exports
//! - `io`: prompted typed input and typed print
//! - `lifecycle`: `pylite_init` / `pylite_clean_up`
//! - `config`, `logging`, `report`: environment-driven ambient behaviour
//! - `state`: the thread-local heap
//! - `fatal`: error-to-exit conversion

pub mod config;
pub mod fatal;
pub mod io;
pub mod lifecycle;
pub mod list_ops;
pub mod logging;
pub mod report;
pub mod state;
pub mod string_ops;

pub use pylite_core::{
    Heap, HeapStats, ListHandle, RawValue, RuntimeError, StrHandle, TypeTag, Value,
};

pub use config::RuntimeConfig;

// Lifecycle (exported for generated code)
pub use lifecycle::{pylite_clean_up as clean_up_op, pylite_init as init};

// String operations (exported for generated code)
pub use string_ops::{
    pylite_str_concat as str_concat, pylite_str_init as str_init, pylite_str_ptr as str_ptr,
};

// List operations (exported for generated code)
pub use list_ops::{
    pylite_list_add as list_add, pylite_list_get as list_get, pylite_list_init as list_init,
    pylite_list_init_add as list_init_add, pylite_list_length as list_length,
    pylite_list_slice as list_slice,
};

// I/O operations (exported for generated code)
pub use io::{
    pylite_input as input, pylite_input_default as input_default, pylite_print as print,
    pylite_print_bool as print_bool, pylite_print_char as print_char,
    pylite_print_float as print_float, pylite_print_int as print_int,
    pylite_print_str as print_str,
};
