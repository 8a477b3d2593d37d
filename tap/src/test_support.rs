//! Test-only helpers for constructing reports and driving the reader.

use crate::core::types::{Report, RunReport, TestResult};
use crate::error::TapError;
use crate::reader::read;

/// Passing report with no name.
pub fn pass(num: u32) -> Report {
    Report::new(num, TestResult::Pass)
}

/// Failing report with no name.
pub fn fail(num: u32) -> Report {
    Report::new(num, TestResult::Fail)
}

/// Skipped report with an optional reason.
pub fn skip(num: u32, reason: Option<&str>) -> Report {
    Report {
        skip_reason: reason.map(str::to_string),
        ..Report::new(num, TestResult::Skip)
    }
}

/// Mark `report` as TODO with an optional reason.
pub fn todo(report: Report, reason: Option<&str>) -> Report {
    Report {
        todo: true,
        todo_reason: reason.map(str::to_string),
        ..report
    }
}

/// Give `report` a name.
pub fn named(report: Report, name: &str) -> Report {
    Report {
        name: name.to_string(),
        ..report
    }
}

/// Attach diagnostic lines to `report`.
pub fn with_diagnostics(report: Report, lines: &[&str]) -> Report {
    Report {
        diagnostics: lines.iter().map(|line| line.to_string()).collect(),
        ..report
    }
}

/// Parse `input` to completion.
pub fn parse_str(input: &str) -> (RunReport, Result<(), TapError>) {
    read(input.as_bytes())
}
