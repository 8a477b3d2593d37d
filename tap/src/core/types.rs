//! Shared types describing a TAP run.
//!
//! These are plain data: the reader builds them, the reconciler arranges them
//! and the writer serializes them. None of them perform I/O.

use serde::{Deserialize, Serialize};

/// Declared inclusive range of test numbers, taken from a `1..N` line.
///
/// In current TAP `min` is effectively always 1; it is kept for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub min: u32,
    pub max: u32,
}

impl Plan {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// Passing status of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    Pass,
    Fail,
    Skip,
}

/// Outcome of a single test, as reported by one result line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Test number. Zero on the encoding side means "assign the next number".
    pub num: u32,
    pub result: TestResult,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Failures are expected for TODO tests; a TODO test that passes is a
    /// "bonus" worth surfacing to the user.
    #[serde(default)]
    pub todo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_reason: Option<String>,
    /// Diagnostic lines that preceded the result line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl Report {
    /// Bare report with no name, directive or diagnostics.
    pub fn new(num: u32, result: TestResult) -> Self {
        Self {
            num,
            result,
            name: String::new(),
            todo: false,
            skip_reason: None,
            todo_reason: None,
            diagnostics: Vec::new(),
        }
    }
}

/// Overall outcome of a test program.
///
/// If the reader that produced it returned an error the report may be
/// incomplete. `tests[i]` is the report for test number `i + 1`, or `None` when
/// that number was never reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub plan: Option<Plan>,
    pub tests: Vec<Option<Report>>,
}

impl RunReport {
    /// Reports that were actually observed, in test-number order.
    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.tests.iter().flatten()
    }
}
