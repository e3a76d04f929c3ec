//! At-exit heap report for compiled pylite programs
//!
//! Dumps heap statistics just before teardown, controlled by `PYLITE_REPORT`:
//! - Unset or `0` → no report
//! - `1` → human-readable to stderr
//! - `json` → JSON to stderr
//! - `json:/path` → JSON to file
//!
//! JSON output needs the `report-json` feature (enabled by default); without
//! it the human format is used instead.

use crate::config::RuntimeConfig;
use pylite_core::HeapStats;
use serde::Serialize;
use std::io::Write;
use std::sync::OnceLock;
use tracing::warn;

pub const REPORT_VAR: &str = "PYLITE_REPORT";

/// Output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportFormat {
    Human,
    Json,
}

/// Output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportDestination {
    Stderr,
    File(String),
}

/// Parsed report configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub destination: ReportDestination,
}

impl ReportConfig {
    /// Parse from the `PYLITE_REPORT` environment variable
    pub fn from_env() -> Option<Self> {
        Self::parse(&std::env::var(REPORT_VAR).ok()?)
    }

    /// Process-wide setting, read from the environment on first use
    pub fn global() -> Option<&'static ReportConfig> {
        static CONFIG: OnceLock<Option<ReportConfig>> = OnceLock::new();
        CONFIG.get_or_init(Self::from_env).as_ref()
    }

    /// Parse a `PYLITE_REPORT` value; `None` means reporting is off
    pub fn parse(val: &str) -> Option<Self> {
        match val {
            "" | "0" => None,
            "1" => Some(ReportConfig {
                format: ReportFormat::Human,
                destination: ReportDestination::Stderr,
            }),
            "json" => Some(ReportConfig {
                format: ReportFormat::Json,
                destination: ReportDestination::Stderr,
            }),
            s if s.starts_with("json:") && s.len() > 5 => Some(ReportConfig {
                format: ReportFormat::Json,
                destination: ReportDestination::File(s[5..].to_string()),
            }),
            _ => {
                warn!(value = %val, "{} not recognized, ignoring", REPORT_VAR);
                None
            }
        }
    }
}

/// Everything the report prints
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    #[serde(flatten)]
    pub heap: HeapStats,
    /// Configured per-kind ceiling, `null` when unbounded
    pub max_objects: Option<usize>,
}

impl ReportData {
    pub fn new(heap: HeapStats, config: &RuntimeConfig) -> Self {
        ReportData {
            heap,
            max_objects: config.max_objects,
        }
    }
}

pub fn format_human(data: &ReportData) -> String {
    let limit = match data.max_objects {
        Some(n) => n.to_string(),
        None => "unbounded".to_string(),
    };
    let heap = &data.heap;

    let mut out = String::new();
    out.push_str("=== PYLITE REPORT ===\n");
    out.push_str(&format!("Strings live:      {}\n", heap.strings_live));
    out.push_str(&format!("Strings allocated: {}\n", heap.strings_allocated));
    out.push_str(&format!("String bytes:      {}\n", heap.string_bytes));
    out.push_str(&format!("Lists live:        {}\n", heap.lists_live));
    out.push_str(&format!("Lists allocated:   {}\n", heap.lists_allocated));
    out.push_str(&format!("List elements:     {}\n", heap.list_elements));
    out.push_str(&format!("Object limit:      {}\n", limit));
    out.push_str("=====================\n");
    out
}

#[cfg(feature = "report-json")]
pub fn format_json(data: &ReportData) -> String {
    let mut json = serde_json::to_string(data).unwrap_or_else(|_| "{}".to_string());
    json.push('\n');
    json
}

#[cfg(not(feature = "report-json"))]
pub fn format_json(data: &ReportData) -> String {
    warn!(
        "{}=json requires the 'report-json' feature, falling back to human format",
        REPORT_VAR
    );
    format_human(data)
}

pub fn render(config: &ReportConfig, data: &ReportData) -> String {
    match config.format {
        ReportFormat::Human => format_human(data),
        ReportFormat::Json => format_json(data),
    }
}

fn write_report(config: &ReportConfig, output: &str) {
    match &config.destination {
        ReportDestination::Stderr => {
            let _ = std::io::stderr().write_all(output.as_bytes());
        }
        ReportDestination::File(path) => match std::fs::File::create(path) {
            Ok(mut f) => {
                if let Err(e) = f.write_all(output.as_bytes()) {
                    warn!(path = %path, error = %e, "could not write report");
                }
            }
            Err(e) => {
                warn!(path = %path, error = %e, "could not create report file, using stderr");
                let _ = std::io::stderr().write_all(output.as_bytes());
            }
        },
    }
}

/// Emit the report if `PYLITE_REPORT` asks for one
pub fn emit_report(heap: HeapStats, config: &RuntimeConfig) {
    let Some(report) = ReportConfig::global() else {
        return;
    };
    let data = ReportData::new(heap, config);
    write_report(report, &render(report, &data));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReportData {
        ReportData {
            heap: HeapStats {
                strings_live: 3,
                lists_live: 2,
                strings_allocated: 3,
                lists_allocated: 2,
                string_bytes: 11,
                list_elements: 6,
                releases: 0,
            },
            max_objects: Some(256),
        }
    }

    #[test]
    fn test_config_parse_variants() {
        let test_cases = vec![
            ("", None),
            ("0", None),
            ("1", Some((ReportFormat::Human, ReportDestination::Stderr))),
            ("json", Some((ReportFormat::Json, ReportDestination::Stderr))),
            (
                "json:/tmp/report.json",
                Some((
                    ReportFormat::Json,
                    ReportDestination::File("/tmp/report.json".to_string()),
                )),
            ),
            ("json:", None),
            ("verbose", None),
        ];

        for (input, expected) in test_cases {
            let result = ReportConfig::parse(input).map(|c| (c.format, c.destination));
            assert_eq!(result, expected, "mismatch for input '{}'", input);
        }
    }

    #[test]
    fn test_global_config_is_read_once() {
        let first = ReportConfig::global().map(|c| c as *const ReportConfig);
        let second = ReportConfig::global().map(|c| c as *const ReportConfig);
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_human() {
        let output = format_human(&sample());
        assert!(output.starts_with("=== PYLITE REPORT ===\n"));
        assert!(output.contains("Strings live:      3\n"));
        assert!(output.contains("List elements:     6\n"));
        assert!(output.contains("Object limit:      256\n"));

        let unbounded = ReportData {
            max_objects: None,
            ..sample()
        };
        assert!(format_human(&unbounded).contains("Object limit:      unbounded"));
    }

    #[cfg(feature = "report-json")]
    #[test]
    fn test_format_json() {
        let output = format_json(&sample());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["strings_live"], 3);
        assert_eq!(parsed["list_elements"], 6);
        assert_eq!(parsed["max_objects"], 256);
        assert!(output.ends_with('\n'));
    }

    #[cfg(feature = "report-json")]
    #[test]
    fn test_report_to_file() {
        let path = std::env::temp_dir().join(format!("pylite-report-{}.json", std::process::id()));
        let config = ReportConfig {
            format: ReportFormat::Json,
            destination: ReportDestination::File(path.to_string_lossy().into_owned()),
        };
        write_report(&config, &render(&config, &sample()));

        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(written.contains("\"lists_allocated\":2"));
    }
}
