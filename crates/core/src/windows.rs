// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Windows test matrix types.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildConfig {
    Release,
    Debug,
}

crate::simple_display! {
    BuildConfig {
        Release => "Release",
        Debug => "Debug",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arch {
    Win32,
    #[serde(rename = "x64")]
    X64,
}

crate::simple_display! {
    Arch {
        Win32 => "Win32",
        X64 => "x64",
    }
}

/// How the library is built on Windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildSystem {
    /// The solution files shipped in the source tree
    Shipped,
    Cmake,
}

crate::simple_display! {
    BuildSystem {
        Shipped => "shipped",
        Cmake => "cmake",
    }
}

/// Windows toolchain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toolchain {
    Mingw,
    /// Visual Studio by year, e.g. "2017"
    VisualStudio(String),
}

impl Toolchain {
    pub fn vs(version: impl Into<String>) -> Self {
        Toolchain::VisualStudio(version.into())
    }

    /// Short name used in job names.
    pub fn slug(&self) -> String {
        match self {
            Toolchain::Mingw => "mingw".to_string(),
            Toolchain::VisualStudio(v) => format!("vs{}", v),
        }
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slug())
    }
}

/// One combination of the Windows test matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowsTestConfig {
    pub toolchain: Toolchain,
    pub build_config: BuildConfig,
    pub arch: Arch,
    pub build_system: BuildSystem,
    pub retarget: bool,
}

impl WindowsTestConfig {
    /// The single configuration tested for mingw.
    pub fn mingw() -> Self {
        Self {
            toolchain: Toolchain::Mingw,
            build_config: BuildConfig::Release,
            arch: Arch::Win32,
            build_system: BuildSystem::Shipped,
            retarget: false,
        }
    }

    /// The slowest combination: debug build through a non-native build system.
    pub fn is_slow(&self) -> bool {
        self.build_config == BuildConfig::Debug && self.build_system == BuildSystem::Cmake
    }
}

impl fmt::Display for WindowsTestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.toolchain, self.build_config, self.arch, self.build_system)?;
        if self.retarget {
            f.write_str(" retarget")?;
        }
        Ok(())
    }
}

/// Configs executed serially on one Windows worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkGroup {
    pub name: String,
    pub configs: Vec<WindowsTestConfig>,
}

#[cfg(test)]
#[path = "windows_tests.rs"]
mod tests;
