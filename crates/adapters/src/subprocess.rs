// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess helpers with timeouts.

use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// `git` checkout and fetch operations
pub const GIT_TIMEOUT: Duration = Duration::from_secs(10 * 60);
/// Registry queries, login, pull and push
pub const REGISTRY_TIMEOUT: Duration = Duration::from_secs(15 * 60);
/// Image builds
pub const IMAGE_BUILD_TIMEOUT: Duration = Duration::from_secs(60 * 60);
/// Handing a message to the local mail transport
pub const MAIL_TIMEOUT: Duration = Duration::from_secs(30);

/// Run a command to completion, killing it if it outlives `timeout`.
///
/// Returns the captured output (whatever the exit status) or a message
/// naming `description` if the process could not run or timed out.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(format!("{} failed to run: {}", description, e)),
        Err(_) => Err(format!("{} timed out after {}s", description, timeout.as_secs())),
    }
}

/// Like [`run_with_timeout`], feeding `input` on stdin.
pub async fn run_with_input(
    mut cmd: Command,
    input: &[u8],
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped()).kill_on_drop(true);
    let run = async {
        let mut child = cmd.spawn().map_err(|e| format!("{} failed to run: {}", description, e))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input)
                .await
                .map_err(|e| format!("{} stdin write failed: {}", description, e))?;
        }
        child
            .wait_with_output()
            .await
            .map_err(|e| format!("{} failed to run: {}", description, e))
    };
    match tokio::time::timeout(timeout, run).await {
        Ok(result) => result,
        Err(_) => Err(format!("{} timed out after {}s", description, timeout.as_secs())),
    }
}

/// Trimmed stderr, falling back to stdout when stderr is empty.
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    } else {
        stderr.to_string()
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
