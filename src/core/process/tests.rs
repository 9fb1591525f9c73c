// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::builder::{ProcessBuilder, ProcessFlags};
use crate::error::ProcessError;

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_echo() {
    let output = ProcessBuilder::new("echo")
        .arg("hello")
        .capture_output()
        .run()
        .await
        .expect("echo should succeed");

    assert!(output.success());
    insta::assert_snapshot!(output.stdout().trim(), @"hello");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_exit_code_allowed() {
    let output = ProcessBuilder::raw("exit 42")
        .flag(ProcessFlags::ALLOW_FAILURE)
        .run()
        .await
        .expect("process should complete");

    insta::assert_snapshot!(output.exit_code().to_string(), @"42");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_nonzero_exit_carries_output() {
    let err = ProcessBuilder::raw("echo first; echo second >&2; exit 3")
        .name("backend")
        .capture_output()
        .run()
        .await
        .expect_err("non-zero exit should fail");

    let Some(ProcessError::NonZeroExit {
        what, code, output, ..
    }) = err.downcast_ref::<ProcessError>()
    else {
        panic!("expected NonZeroExit, got {err:?}");
    };
    assert_eq!(what, "backend");
    assert_eq!(*code, 3);
    assert!(output.contains("first"), "combined output: {output}");
    assert!(output.contains("second"), "combined output: {output}");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_combined_keeps_both_streams() {
    let output = ProcessBuilder::raw("echo out; sleep 0.1; echo err >&2")
        .capture_output()
        .run()
        .await
        .expect("process should succeed");

    assert_eq!(output.stdout(), "out");
    assert_eq!(output.stderr(), "err");
    insta::assert_snapshot!(output.combined(), @r"
    out
    err
    ");
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_quiet_keeps_nothing() {
    let output = ProcessBuilder::new("echo")
        .arg("discarded")
        .quiet()
        .run()
        .await
        .expect("echo should succeed");

    assert!(output.stdout().is_empty());
    assert!(output.combined().is_empty());
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_cwd() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = ProcessBuilder::new("pwd")
        .cwd(dir.path())
        .capture_output()
        .run()
        .await
        .expect("pwd should succeed");

    let expected = dir.path().canonicalize().expect("canonicalize");
    let actual = std::path::Path::new(output.stdout().trim())
        .canonicalize()
        .expect("canonicalize");
    assert_eq!(actual, expected);
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_timeout() {
    let err = ProcessBuilder::new("sleep")
        .arg("5")
        .timeout(Duration::from_millis(100))
        .run()
        .await
        .expect_err("sleep should time out");

    assert!(
        matches!(
            err.downcast_ref::<ProcessError>(),
            Some(ProcessError::Timeout { .. })
        ),
        "expected Timeout, got {err:?}"
    );
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_process_cancellation() {
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let output = ProcessBuilder::new("sleep")
        .arg("5")
        .run_with_cancellation(token)
        .await
        .expect("cancelled run still returns output");

    assert!(output.is_interrupted());
}

#[tokio::test]
async fn test_process_already_cancelled_never_spawns() {
    let token = CancellationToken::new();
    token.cancel();

    let output = ProcessBuilder::new("nonexistent_program_12345")
        .run_with_cancellation(token)
        .await
        .expect("pre-cancelled run should not spawn");

    assert!(output.is_interrupted());
}

#[tokio::test]
async fn test_process_spawn_failure() {
    let err = ProcessBuilder::new("nonexistent_program_12345")
        .run()
        .await
        .expect_err("spawning a missing program should fail");

    assert!(matches!(
        err.downcast_ref::<ProcessError>(),
        Some(ProcessError::SpawnFailed { .. })
    ));
}

#[test]
fn test_command_line_quotes_spaces_and_empty() {
    let builder = ProcessBuilder::new("pyarmor").args(["config", "--runtime-path", "", "a b"]);
    insta::assert_snapshot!(builder.command_line(), @r#"pyarmor config --runtime-path "" "a b""#);
}

#[test]
fn test_display_name() {
    assert_eq!(ProcessBuilder::new("/usr/bin/python3").display_name(), "python3");
    assert_eq!(
        ProcessBuilder::new("python").name("setup").display_name(),
        "setup"
    );
}

#[test]
fn test_executable_lookup_not_found() {
    let program = "nonexistent_program_12345";

    assert!(ProcessBuilder::find(program).is_none());
}

#[cfg(not(windows))]
#[test]
fn test_executable_lookup_found() {
    let path = ProcessBuilder::find("sh").expect("sh should be in PATH");
    assert!(path.exists());
}
