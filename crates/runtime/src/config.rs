//! Runtime configuration
//!
//! Compiled programs take no runtime flags, so everything is read from the
//! environment once, when the runtime initialises.
//!
//! ## Configuration (Environment Variables)
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PYLITE_MAX_OBJECTS` | unset (unbounded) | Ceiling on live strings, and separately on live lists |
//! | `PYLITE_LOG` | `warn` | `tracing` filter directives for runtime logs (stderr) |
//! | `PYLITE_REPORT` | unset (off) | At-exit heap report, see `report` |
//!
//! ## Example
//!
//! ```bash
//! # Reproduce the classic fixed 256-entry allocation tables
//! PYLITE_MAX_OBJECTS=256 ./my-program
//!
//! # Trace every allocation
//! PYLITE_LOG=pylite=trace ./my-program
//! ```

use tracing::warn;

pub const MAX_OBJECTS_VAR: &str = "PYLITE_MAX_OBJECTS";

/// Heap-related settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Per-kind ceiling on registered objects; `None` means unbounded
    pub max_objects: Option<usize>,
}

impl RuntimeConfig {
    /// Load configuration from environment variables
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        Self {
            max_objects: parse_max_objects(std::env::var(MAX_OBJECTS_VAR).ok()),
        }
    }
}

/// `0` and unset both mean "no ceiling"
fn parse_max_objects(raw: Option<String>) -> Option<usize> {
    let raw = raw?;
    match raw.trim().parse::<usize>() {
        Ok(0) => None,
        Ok(n) => Some(n),
        Err(_) => {
            warn!(
                value = %raw,
                "{} is not a non-negative integer, ignoring", MAX_OBJECTS_VAR
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    // Helper to set or clear an env var; callers are #[serial]
    unsafe fn set_env(key: &str, value: Option<&str>) {
        // SAFETY: #[serial] keeps env-mutating tests from running concurrently
        unsafe {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }

    #[test]
    fn test_parse_max_objects() {
        assert_eq!(parse_max_objects(None), None);
        assert_eq!(parse_max_objects(Some("256".into())), Some(256));
        assert_eq!(parse_max_objects(Some(" 16 ".into())), Some(16));
        assert_eq!(parse_max_objects(Some("0".into())), None);
        assert_eq!(parse_max_objects(Some("-4".into())), None);
        assert_eq!(parse_max_objects(Some("lots".into())), None);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        let orig = std::env::var(MAX_OBJECTS_VAR).ok();

        unsafe { set_env(MAX_OBJECTS_VAR, Some("64")) };
        assert_eq!(RuntimeConfig::from_env().max_objects, Some(64));

        unsafe { set_env(MAX_OBJECTS_VAR, None) };
        assert_eq!(RuntimeConfig::from_env(), RuntimeConfig::default());

        unsafe { set_env(MAX_OBJECTS_VAR, orig.as_deref()) };
    }
}
