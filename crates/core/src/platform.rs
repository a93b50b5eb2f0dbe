// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution platforms and the static capability registry.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// OS family a platform belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OsFamily {
    LinuxContainer,
    #[serde(rename = "freebsd")]
    FreeBsd,
    Windows,
    BareMetalToolchain,
}

crate::simple_display! {
    OsFamily {
        LinuxContainer => "linux-container",
        FreeBsd => "freebsd",
        Windows => "windows",
        BareMetalToolchain => "bare-metal-toolchain",
    }
}

impl OsFamily {
    /// Whether the platform's default `make` is GNU make.
    pub fn has_gnu_make(self) -> bool {
        !matches!(self, OsFamily::FreeBsd)
    }
}

/// A named execution environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    pub family: OsFamily,
    /// Jobs run inside a container image built for this platform
    #[serde(default, rename = "container")]
    pub has_container_runtime: bool,
    /// OpenSSL / GnuTLS reference binaries are not installed
    #[serde(default)]
    pub lacks_reference_tls_tools: bool,
    /// Worker label a job on this platform must be scheduled on
    pub label: String,
}

impl Platform {
    pub fn new(name: impl Into<String>, family: OsFamily, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family,
            has_container_runtime: false,
            lacks_reference_tls_tools: false,
            label: label.into(),
        }
    }

    crate::setters! {
        set {
            has_container_runtime: bool,
            lacks_reference_tls_tools: bool,
        }
    }

    /// Platforms that take part in component discovery.
    pub fn runs_components(&self) -> bool {
        self.has_container_runtime
            && matches!(self.family, OsFamily::LinuxContainer | OsFamily::BareMetalToolchain)
    }
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to read platform file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid platform file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate platform: {0}")]
    Duplicate(String),
    #[error("platform registry is empty")]
    Empty,
}

/// All known platforms, in priority order.
///
/// Order matters: component discovery assigns ambiguous components to the
/// earliest platform that lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRegistry {
    platforms: Vec<Platform>,
}

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(rename = "platform")]
    platforms: Vec<Platform>,
}

pub const CONTAINER_HOST_LABEL: &str = "container-host";

impl PlatformRegistry {
    pub fn new(platforms: Vec<Platform>) -> Result<Self, PlatformError> {
        if platforms.is_empty() {
            return Err(PlatformError::Empty);
        }
        for (i, p) in platforms.iter().enumerate() {
            if platforms[..i].iter().any(|q| q.name == p.name) {
                return Err(PlatformError::Duplicate(p.name.clone()));
            }
        }
        Ok(Self { platforms })
    }

    /// The built-in platform table.
    pub fn builtin() -> Self {
        let ubuntu = |version: &str| {
            Platform::new(format!("ubuntu-{}", version), OsFamily::LinuxContainer, CONTAINER_HOST_LABEL)
                .has_container_runtime(true)
        };
        Self {
            platforms: vec![
                ubuntu("16.04"),
                ubuntu("18.04"),
                ubuntu("20.04"),
                ubuntu("22.04"),
                Platform::new("arm-compilers", OsFamily::BareMetalToolchain, CONTAINER_HOST_LABEL)
                    .has_container_runtime(true)
                    .lacks_reference_tls_tools(true),
                Platform::new("freebsd", OsFamily::FreeBsd, "freebsd").lacks_reference_tls_tools(true),
                Platform::new("windows", OsFamily::Windows, "windows"),
            ],
        }
    }

    /// Parse a registry from TOML (`[[platform]]` tables).
    pub fn from_toml(text: &str) -> Result<Self, PlatformError> {
        let file: RegistryFile = toml::from_str(text)?;
        Self::new(file.platforms)
    }

    pub fn load(path: &Path) -> Result<Self, PlatformError> {
        let text = std::fs::read_to_string(path).map_err(|source| PlatformError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn get(&self, name: &str) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        self.platforms.iter()
    }

    /// Priority-ordered platforms used for component discovery.
    pub fn component_platforms(&self) -> Vec<&Platform> {
        self.platforms.iter().filter(|p| p.runs_components()).collect()
    }

    pub fn by_family(&self, family: OsFamily) -> Vec<&Platform> {
        self.platforms.iter().filter(|p| p.family == family).collect()
    }

    pub fn first_of(&self, family: OsFamily) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.family == family)
    }
}

#[cfg(test)]
#[path = "platform_tests.rs"]
mod tests;
