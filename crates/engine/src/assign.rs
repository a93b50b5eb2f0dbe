// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pre-flight coverage check: every component needs a platform.

use crate::introspect::PreflightError;
use cim_core::BranchInfo;

/// Fail naming every component without a platform, in discovery order.
pub fn verify_full_coverage(branch: &BranchInfo) -> Result<(), PreflightError> {
    let missing = branch.unassigned();
    if missing.is_empty() {
        return Ok(());
    }
    Err(PreflightError::UnassignedComponents(missing.into_iter().map(String::from).collect()))
}

#[cfg(test)]
#[path = "assign_tests.rs"]
mod tests;
