// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{BranchInfo, JobKind, JobSpec, Platform, PlatformRegistry};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for discovery and dispatch types.
pub mod strategies {
    use proptest::prelude::*;

    /// Component names as the test driver prints them.
    pub fn arb_component() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{2,24}"
    }

    /// Up to `n` distinct component names.
    pub fn arb_components(n: usize) -> impl Strategy<Value = Vec<String>> {
        proptest::collection::btree_set(arb_component(), 0..n).prop_map(|s| s.into_iter().collect())
    }
}

// ── Factories ───────────────────────────────────────────────────────────

pub fn component_job(name: &str, platform: &str, component: &str) -> JobSpec {
    JobSpec::new(name, platform, JobKind::Component { component: component.to_string(), seed: 4 })
}

pub fn basic_job(name: &str, platform: &str) -> JobSpec {
    JobSpec::new(name, platform, JobKind::Basic { compiler: "gcc".to_string() })
}

/// Registry with two container platforms `P1`, `P2` (in that order).
#[allow(clippy::expect_used)]
pub fn two_platform_registry() -> PlatformRegistry {
    let p = |name: &str| {
        Platform::new(name, crate::OsFamily::LinuxContainer, crate::platform::CONTAINER_HOST_LABEL)
            .has_container_runtime(true)
    };
    PlatformRegistry::new(vec![p("P1"), p("P2")]).expect("distinct platform names")
}

pub fn branch_with(assignments: &[(&str, &str)]) -> BranchInfo {
    BranchInfo::from_assignments(assignments.iter().copied())
}
