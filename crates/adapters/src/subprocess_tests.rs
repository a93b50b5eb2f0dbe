// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn captures_output_of_successful_command() {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "echo out; echo err >&2"]);
    let output = run_with_timeout(cmd, Duration::from_secs(10), "echo").await.unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "out\n");
    assert_eq!(error_text(&output), "err");
}

#[tokio::test]
async fn nonzero_exit_is_still_ok() {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "echo only-stdout; exit 3"]);
    let output = run_with_timeout(cmd, Duration::from_secs(10), "exit").await.unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(error_text(&output), "only-stdout");
}

#[tokio::test]
async fn missing_program_names_description() {
    let cmd = Command::new("/nonexistent/cim-test-program");
    let err = run_with_timeout(cmd, Duration::from_secs(10), "probe").await.unwrap_err();
    assert!(err.starts_with("probe failed to run"), "{}", err);
}

#[tokio::test]
async fn slow_command_times_out() {
    let mut cmd = Command::new("sleep");
    cmd.arg("5");
    let err = run_with_timeout(cmd, Duration::from_millis(50), "sleeper").await.unwrap_err();
    assert_eq!(err, "sleeper timed out after 0s");
}

#[tokio::test]
async fn input_is_fed_on_stdin() {
    let cmd = Command::new("cat");
    let output = run_with_input(cmd, b"hello", Duration::from_secs(10), "cat").await.unwrap();
    assert_eq!(output.stdout, b"hello");
}
