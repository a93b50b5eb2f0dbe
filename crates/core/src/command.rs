// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured commands executed inside a job workspace.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder in a `PATH` value for the search path the worker already has.
pub const INHERITED_PATH: &str = "$PATH";

/// A program invocation: argv plus its declared environment.
///
/// Commands are never rendered to shell text for execution; `Display` is
/// for logs only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub env: IndexMap<String, String>,
    /// Working directory relative to the workspace root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), ..Self::default() }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Merge environment entries that the command does not already set.
    pub fn with_base_env(mut self, base: &IndexMap<String, String>) -> Self {
        let mut merged = base.clone();
        merged.extend(std::mem::take(&mut self.env));
        self.env = merged;
        self
    }

    crate::setters! {
        option {
            cwd: String,
        }
    }

    /// The environment to hand to the process, with [`INHERITED_PATH`] in
    /// `PATH` replaced by `inherited`.
    pub fn resolved_env(&self, inherited: &str) -> IndexMap<String, String> {
        self.env
            .iter()
            .map(|(key, value)| {
                let value = if key == "PATH" { value.replace(INHERITED_PATH, inherited) } else { value.clone() };
                (key.clone(), value)
            })
            .collect()
    }

    /// argv as a single vector (program first).
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str)).collect()
    }

    /// Whether this command's argv starts with `prefix`.
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        let argv = self.argv();
        argv.len() >= prefix.len() && argv.iter().zip(prefix).all(|(a, b)| a == b)
    }
}

fn quote(word: &str) -> String {
    if !word.is_empty()
        && word.chars().all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c))
    {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, quote(value))?;
        }
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
