// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commit status states reported to the code-review system.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitState {
    Pending,
    Success,
    Failure,
}

crate::simple_display! {
    CommitState {
        Pending => "pending",
        Success => "success",
        Failure => "failure",
    }
}

/// Hard limit on status descriptions imposed by the status API.
pub const MAX_DESCRIPTION_CHARS: usize = 140;

/// Truncate to [`MAX_DESCRIPTION_CHARS`] characters, marking the cut with `…`.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_CHARS {
        return description.to_string();
    }
    let mut out: String = description.chars().take(MAX_DESCRIPTION_CHARS - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
