// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immediate retry for flaky network operations.

use std::fmt::Display;
use std::future::Future;

/// Attempts made before an operation's error becomes fatal.
pub const MAX_ATTEMPTS: u32 = 3;

/// Run `op` up to [`MAX_ATTEMPTS`] times with no delay in between,
/// returning the last error on exhaustion.
pub async fn with_retries<T, E, F, Fut>(what: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(operation = what, attempt, error = %e, "retrying");
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(operation = what, attempts = attempt, error = %e, "giving up");
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
