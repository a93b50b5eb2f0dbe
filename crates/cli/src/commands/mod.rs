// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

pub mod image_tag;
pub mod plan;
pub mod run;
pub mod windows_groups;

use crate::exit_error::ExitError;
use cim_core::PlatformRegistry;
use cim_engine::Conventions;
use std::path::Path;

/// The registry from a TOML file, or the built-in table.
pub fn load_platforms(path: Option<&Path>) -> Result<PlatformRegistry, ExitError> {
    match path {
        Some(path) => PlatformRegistry::load(path).map_err(|e| ExitError::config(e.to_string())),
        None => Ok(PlatformRegistry::builtin()),
    }
}

pub fn load_conventions(path: Option<&Path>) -> Result<Conventions, ExitError> {
    let Some(path) = path else {
        return Ok(Conventions::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| ExitError::config(format!("cannot read {}: {}", path.display(), e)))?;
    toml::from_str(&text)
        .map_err(|e| ExitError::config(format!("invalid conventions file {}: {}", path.display(), e)))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
