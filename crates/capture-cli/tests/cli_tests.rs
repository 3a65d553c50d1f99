//! End-to-end tests for the `capture` binary.
//!
//! Each test runs the built executable and checks its stdout and exit code.

use std::process::{Command, Output};

fn run_capture(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_capture"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run capture")
}

#[test]
fn test_no_arguments() {
    let output = run_capture(&[]);
    assert!(output.status.success());
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "42\n42\n42\n");
}

#[test]
fn test_lazy_launch() {
    let output = run_capture(&["--launch", "lazy"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "42\n42\n42\n");
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    let output = run_capture(&["-vvv"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "42\n42\n42\n");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("holder dropped"), "stderr was: {}", stderr);
}

#[test]
fn test_unknown_launch_policy() {
    let output = run_capture(&["--launch", "deferred"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
