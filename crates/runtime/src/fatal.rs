//! Fatal error path for the C ABI
//!
//! Generated code has no way to recover from a runtime error, so every
//! exported function funnels its `Result` through [`OrFatal::or_fatal`]. The
//! diagnostic goes to stdout, where the program's own output is, and the
//! process exits with status 1.

use pylite_core::RuntimeError;
use std::io::Write;
use tracing::error;

pub const EXIT_FAILURE: i32 = 1;

/// Diagnostic line printed for an unrecoverable error (no trailing newline)
pub fn diagnostic(err: &RuntimeError) -> String {
    format!("RUNTIME ERROR: {}", err)
}

/// Print the diagnostic and terminate the process
pub fn fatal(err: &RuntimeError) -> ! {
    error!(error = %err, "fatal runtime error");
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", diagnostic(err));
    let _ = stdout.flush();
    std::process::exit(EXIT_FAILURE)
}

/// Unwrap a runtime result or exit through [`fatal`]
pub trait OrFatal<T> {
    fn or_fatal(self) -> T;
}

impl<T> OrFatal<T> for pylite_core::Result<T> {
    fn or_fatal(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => fatal(&e),
        }
    }
}
