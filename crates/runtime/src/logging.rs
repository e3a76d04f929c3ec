//! Runtime logging
//!
//! Program output owns stdout, so runtime logs go to stderr. The filter comes
//! from `PYLITE_LOG` using the usual `tracing` directive syntax and defaults
//! to warnings only.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub const LOG_VAR: &str = "PYLITE_LOG";
const DEFAULT_FILTER: &str = "warn";

static LOGGING_INIT: Once = Once::new();

/// Build the filter from `PYLITE_LOG`, falling back to the default on
/// missing or malformed directives
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the stderr subscriber
///
/// Safe to call multiple times (idempotent via Once). If the host program
/// already installed a global subscriber, that one is left in place.
pub fn init() {
    LOGGING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
