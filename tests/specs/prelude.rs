// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fluent wrapper over `assert_cmd` for driving the binary.

pub use tempfile::TempDir;

/// Variables that change what the binary plans or prints.
const AMBIENT_VARS: &[&str] = &[
    "RUN_ALL_SH",
    "RUN_FREEBSD",
    "RUN_WINDOWS_TEST",
    "RUN_COVERAGE",
    "PUSH_COVERITY",
    "CIM_PLATFORMS",
    "CIM_LOG_FILE",
    "CIM_STATUS_REPO",
    "CIM_CHANGE_SHA",
    "COLOR",
    "RUST_LOG",
];

pub struct Cli {
    cmd: assert_cmd::Command,
}

/// The binary with a clean environment and colors off.
pub fn cli() -> Cli {
    let mut cmd = assert_cmd::Command::cargo_bin("cim").unwrap();
    for var in AMBIENT_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    Cli { cmd }
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    fn run(mut self) -> Output {
        let output = self.cmd.output().unwrap();
        Output {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn passes(self) -> Output {
        let output = self.run();
        assert_eq!(output.code, Some(0), "expected success, stderr:\n{}", output.stderr);
        output
    }

    pub fn exits_with(self, code: i32) -> Output {
        let output = self.run();
        assert_eq!(output.code, Some(code), "stdout:\n{}\nstderr:\n{}", output.stdout, output.stderr);
        output
    }
}

pub struct Output {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Output {
    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {:?}:\n{}", needle, self.stdout);
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(!self.stdout.contains(needle), "stdout has {:?}:\n{}", needle, self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {:?}:\n{}", needle, self.stderr);
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).unwrap()
    }
}

/// A scratch directory holding `files`.
pub fn scratch(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, content) in files {
        let path = dir.path().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
    dir
}
