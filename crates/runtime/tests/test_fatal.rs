//! Tests for the fatal exit path of the C ABI
//!
//! A runtime error at the ABI ends the process, so each case runs in a child
//! process: this test binary re-executes itself with `PYLITE_FATAL_CASE` set,
//! and only `test_fatal_case_child` acts on it.

use pylite_runtime::{RawValue, Value, input_default, list_add, list_get, list_init};
use std::process::{Command, Output, Stdio};

const CASE_VAR: &str = "PYLITE_FATAL_CASE";

/// Entry point inside the child; a no-op in a normal test run
#[test]
fn test_fatal_case_child() {
    let Ok(case) = std::env::var(CASE_VAR) else {
        return;
    };
    unsafe {
        match case.as_str() {
            "index" => {
                let xs = list_init(0);
                list_get(xs, 0);
            }
            "append-before-ready" => {
                let xs = list_init(2);
                list_add(xs, RawValue::from(Value::Int(1)));
            }
            "input-eof" => {
                input_default(b'i' as std::ffi::c_char);
            }
            "huge-list" => {
                list_init(i64::MAX);
            }
            other => panic!("unknown case {}", other),
        }
    }
    panic!("case {} returned instead of exiting", case);
}

fn run_case(case: &str) -> Output {
    let exe = std::env::current_exe().unwrap();
    Command::new(exe)
        .args(["--exact", "test_fatal_case_child", "--nocapture", "--test-threads=1"])
        .env(CASE_VAR, case)
        .stdin(Stdio::null())
        .output()
        .unwrap()
}

fn assert_fatal(case: &str, diagnostic: &str) {
    let out = run_case(case);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        out.status.code(),
        Some(1),
        "case {}: stdout={:?} stderr={:?}",
        case,
        stdout,
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(
        stdout.lines().any(|line| line.ends_with(diagnostic)),
        "case {}: missing {:?} in {:?}",
        case,
        diagnostic,
        stdout
    );
}

#[test]
fn test_index_out_of_bounds_exits() {
    assert_fatal(
        "index",
        "RUNTIME ERROR: Index out of bounds. Trying to access 0, length is 0",
    );
}

#[test]
fn test_append_before_ready_exits() {
    assert_fatal(
        "append-before-ready",
        "RUNTIME ERROR: List initialization is not complete. Length is 2, uninitialized length is 2",
    );
}

#[test]
fn test_input_at_eof_exits() {
    let out = run_case("input-eof");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(out.status.code(), Some(1));
    // The diagnostic follows the prompt on the same line
    assert!(
        stdout.contains("Enter a number (expecting int): RUNTIME ERROR: Reaching unexpected EOF.\n"),
        "got {:?}",
        stdout
    );
}

#[test]
fn test_unallocatable_list_exits() {
    assert_fatal("huge-list", "RUNTIME ERROR: Out of memory for list");
}
