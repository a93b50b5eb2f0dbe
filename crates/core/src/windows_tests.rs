// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    mingw  = { Toolchain::Mingw,         "mingw" },
    vs2010 = { Toolchain::vs("2010"),    "vs2010" },
    vs2017 = { Toolchain::vs("2017"),    "vs2017" },
)]
fn toolchain_slug(toolchain: Toolchain, expected: &str) {
    assert_eq!(toolchain.slug(), expected);
    assert_eq!(toolchain.to_string(), expected);
}

#[test]
fn mingw_config_is_degenerate_release_build() {
    let config = WindowsTestConfig::mingw();
    assert_eq!(config.build_config, BuildConfig::Release);
    assert!(!config.retarget);
    assert!(!config.is_slow());
    assert_eq!(config.to_string(), "mingw Release Win32 shipped");
}

#[test]
fn debug_cmake_is_slow() {
    let config = WindowsTestConfig {
        toolchain: Toolchain::vs("2015"),
        build_config: BuildConfig::Debug,
        arch: Arch::X64,
        build_system: BuildSystem::Cmake,
        retarget: true,
    };
    assert!(config.is_slow());
    assert_eq!(config.to_string(), "vs2015 Debug x64 cmake retarget");
}

#[test]
fn config_serializes_for_worker() {
    let json = serde_json::to_value(WindowsTestConfig::mingw()).unwrap();
    assert_eq!(json["toolchain"], "mingw");
    assert_eq!(json["arch"], "Win32");
    assert_eq!(json["build_system"], "shipped");

    let vs = WindowsTestConfig { toolchain: Toolchain::vs("2013"), ..WindowsTestConfig::mingw() };
    let json = serde_json::to_value(vs).unwrap();
    assert_eq!(json["toolchain"]["visual_studio"], "2013");
}
