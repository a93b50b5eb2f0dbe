// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! What the branch under test supports, discovered once per run.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Replacement requirements file for branches whose pinned dependencies
/// no longer install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementsOverride {
    pub filename: String,
    pub content: String,
}

/// Facts about the branch under test.
///
/// Built during introspection and read-only afterwards. Every key of
/// `component_platform_map` must carry a platform before the job graph is
/// built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub component_platform_map: IndexMap<String, Option<String>>,
    pub supports_pinned_requirements: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements_override: Option<RequirementsOverride>,
    /// Branch still builds in C89 mode (older toolchains supported)
    #[serde(default)]
    pub legacy_language_mode: bool,
}

impl BranchInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a complete component -> platform assignment.
    pub fn from_assignments<I, K, V>(assignments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            component_platform_map: assignments
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
            ..Self::default()
        }
    }

    /// Register components with no platform yet. Existing entries are kept.
    pub fn seed_components<I, S>(&mut self, components: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for component in components {
            self.component_platform_map.entry(component.into()).or_insert(None);
        }
    }

    /// Assign every still-unassigned known component in `available` to
    /// `platform`. First writer wins; unknown components are skipped.
    ///
    /// Returns the components this call assigned.
    pub fn assign_available<I, S>(&mut self, platform: &str, available: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut assigned = Vec::new();
        for component in available {
            let component = component.as_ref();
            match self.component_platform_map.get_mut(component) {
                Some(slot) if slot.is_none() => {
                    *slot = Some(platform.to_string());
                    assigned.push(component.to_string());
                }
                _ => {}
            }
        }
        assigned
    }

    /// Force a known component onto a platform, overwriting any assignment.
    ///
    /// Returns false if the branch does not have the component.
    pub fn force_assign(&mut self, component: &str, platform: &str) -> bool {
        match self.component_platform_map.get_mut(component) {
            Some(slot) => {
                *slot = Some(platform.to_string());
                true
            }
            None => false,
        }
    }

    pub fn has_component(&self, component: &str) -> bool {
        self.component_platform_map.contains_key(component)
    }

    pub fn platform_of(&self, component: &str) -> Option<&str> {
        self.component_platform_map.get(component).and_then(|p| p.as_deref())
    }

    /// Components with no platform, in discovery order.
    pub fn unassigned(&self) -> Vec<&str> {
        self.component_platform_map
            .iter()
            .filter(|(_, platform)| platform.is_none())
            .map(|(component, _)| component.as_str())
            .collect()
    }

    /// Assigned (component, platform) pairs, in discovery order.
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.component_platform_map
            .iter()
            .filter_map(|(c, p)| p.as_deref().map(|p| (c.as_str(), p)))
    }
}

#[cfg(test)]
#[path = "branch_tests.rs"]
mod tests;
