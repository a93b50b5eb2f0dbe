// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test outcome records written by the test driver.
//!
//! One line per test case: `platform;configuration;suite;case;result;cause`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRow {
    pub platform: String,
    pub configuration: String,
    pub suite: String,
    pub case: String,
    pub result: String,
    pub cause: String,
}

impl OutcomeRow {
    /// Parse one line. Lines with fewer than five fields are rejected; the
    /// cause field may itself contain `;`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.trim_end_matches(['\r', '\n']).splitn(6, ';');
        let platform = fields.next()?.to_string();
        let configuration = fields.next()?.to_string();
        let suite = fields.next()?.to_string();
        let case = fields.next()?.to_string();
        let result = fields.next()?.to_string();
        let cause = fields.next().unwrap_or_default().to_string();
        Some(Self { platform, configuration, suite, case, result, cause })
    }
}

/// Result tallies across outcome rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub pass: usize,
    pub fail: usize,
    pub skip: usize,
    /// Rows with an unrecognized result field
    pub other: usize,
    /// Lines that are not outcome rows
    pub malformed: usize,
}

impl OutcomeCounts {
    pub fn tally(text: &str) -> Self {
        let mut counts = Self::default();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match OutcomeRow::parse(line) {
                Some(row) => match row.result.as_str() {
                    "PASS" => counts.pass += 1,
                    "FAIL" => counts.fail += 1,
                    "SKIP" => counts.skip += 1,
                    _ => counts.other += 1,
                },
                None => counts.malformed += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.pass + self.fail + self.skip + self.other
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
