// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying the process exit code.
//!
//! Commands return `ExitError` rather than exiting, so `main()` owns
//! process termination.

use std::fmt;

/// One or more jobs failed, or the outcome analysis did.
pub const JOBS_FAILED: i32 = 1;
/// The run was aborted by the pre-flight check before any job started.
pub const PREFLIGHT_ABORT: i32 = 2;
/// Bad flags, environment or configuration files.
pub const CONFIG_ERROR: i32 = 3;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(CONFIG_ERROR, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
